use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which viewer shows the store page of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrowserChoice {
    /// Print the game card only, never open a page
    Console,
    /// The system default browser
    #[default]
    Default,
    Chrome,
    Firefox,
    Edge,
}

impl BrowserChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserChoice::Console => "console",
            BrowserChoice::Default => "default",
            BrowserChoice::Chrome => "chrome",
            BrowserChoice::Firefox => "firefox",
            BrowserChoice::Edge => "edge",
        }
    }

    /// Launcher name understood by `open::with` on the current platform.
    /// `None` means "let the OS decide".
    pub fn app_name(&self) -> Option<&'static str> {
        match self {
            BrowserChoice::Console | BrowserChoice::Default => None,
            BrowserChoice::Chrome => Some(if cfg!(target_os = "windows") {
                "chrome"
            } else if cfg!(target_os = "macos") {
                "Google Chrome"
            } else {
                "google-chrome"
            }),
            BrowserChoice::Firefox => Some("firefox"),
            BrowserChoice::Edge => Some(if cfg!(target_os = "windows") {
                "msedge"
            } else if cfg!(target_os = "macos") {
                "Microsoft Edge"
            } else {
                "microsoft-edge"
            }),
        }
    }
}
