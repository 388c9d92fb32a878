//! Collaborators that put the current game in front of the voter.
//!
//! A viewer only displays; it never decides. Its failures are reported to
//! the caller, which logs them and carries on with the vote.

use crate::errors::{AppError, AppResult};
use crate::models::{BrowserChoice, Item, Progress};
use crate::utils::colors::{GREY, RESET, color_for_optional_field};
use crate::utils::formatting::{bold, wrap};
use std::io::{self, Write};

/// Width of the game card, in columns.
const CARD_WIDTH: usize = 60;

pub trait Viewer {
    /// Display `item`. Returns once the page was handed to the browser (or the
    /// card printed); never waits for the vote itself.
    fn show(&mut self, item: &Item, progress: Option<Progress>) -> AppResult<()>;
}

/// Prints a text card for the game.
pub struct ConsoleViewer {
    /// Clear the terminal first, so the card always sits at the top.
    pub keep_on_top: bool,
}

impl ConsoleViewer {
    pub fn new(keep_on_top: bool) -> Self {
        Self { keep_on_top }
    }

    fn render(item: &Item, progress: Option<Progress>) -> String {
        let mut out = String::new();

        for line in wrap(&format!("Game: {}", item.name), CARD_WIDTH) {
            out.push_str(&bold(&line));
            out.push('\n');
        }

        let field = |label: &str, value: &str| {
            let color = color_for_optional_field(Some(value));
            let shown = if value.trim().is_empty() { "--" } else { value };
            format!("{label}: {color}{shown}{RESET}\n")
        };
        out.push_str(&field("Developer", &item.developer));
        out.push_str(&field("Release Date", &item.release_date));
        out.push_str(&format!("{GREY}{}{RESET}\n", item.source_url));

        if let Some(p) = progress {
            out.push_str(&format!("Progress: {}/{}\n", p.position, p.total));
        }

        out
    }
}

impl Viewer for ConsoleViewer {
    fn show(&mut self, item: &Item, progress: Option<Progress>) -> AppResult<()> {
        let mut stdout = io::stdout().lock();
        if self.keep_on_top {
            write!(stdout, "\x1b[2J\x1b[H")?;
        }
        writeln!(stdout)?;
        write!(stdout, "{}", Self::render(item, progress))?;
        stdout.flush()?;
        Ok(())
    }
}

/// Opens the store page in a browser, then prints the card.
pub struct BrowserViewer {
    pub browser: BrowserChoice,
    console: ConsoleViewer,
}

impl BrowserViewer {
    pub fn new(browser: BrowserChoice, keep_on_top: bool) -> Self {
        Self {
            browser,
            console: ConsoleViewer::new(keep_on_top),
        }
    }

    fn open_page(&self, url: &str) -> AppResult<()> {
        let result = match self.browser.app_name() {
            Some(app) => open::with_detached(url, app),
            None => open::that_detached(url),
        };

        result.map_err(|e| {
            AppError::Viewer(format!(
                "could not open {} in {}: {}",
                url,
                self.browser.as_str(),
                e
            ))
        })
    }
}

impl Viewer for BrowserViewer {
    fn show(&mut self, item: &Item, progress: Option<Progress>) -> AppResult<()> {
        // Card first: a page that fails to open must not hide the game.
        self.console.show(item, progress)?;
        self.open_page(&item.source_url)
    }
}

pub fn make_viewer(browser: BrowserChoice, keep_on_top: bool) -> Box<dyn Viewer> {
    match browser {
        BrowserChoice::Console => Box::new(ConsoleViewer::new(keep_on_top)),
        other => Box::new(BrowserViewer::new(other, keep_on_top)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_shows_fields_and_progress() {
        let item = Item {
            id: 1,
            name: "Hollow Knight".into(),
            developer: "Team Cherry".into(),
            release_date: "24 Feb, 2017".into(),
            source_url: "https://store.steampowered.com/app/367520".into(),
            batch_name: "indie2024".into(),
        };

        let card = ConsoleViewer::render(
            &item,
            Some(Progress {
                position: 2,
                total: 3,
            }),
        );

        assert!(card.contains("Game: Hollow Knight"));
        assert!(card.contains("Team Cherry"));
        assert!(card.contains("24 Feb, 2017"));
        assert!(card.contains("Progress: 2/3"));
    }

    #[test]
    fn card_marks_missing_developer() {
        let item = Item {
            id: 7,
            name: "Untitled".into(),
            developer: String::new(),
            release_date: String::new(),
            source_url: "https://store.steampowered.com/app/1".into(),
            batch_name: "b".into(),
        };

        let card = ConsoleViewer::render(&item, None);
        assert!(card.contains(&format!("Developer: {GREY}--")));
        assert!(!card.contains("Progress"));
    }
}
