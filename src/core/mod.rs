pub mod config;
pub mod export;
pub mod import;
pub mod log;
pub mod session;
pub mod wipe;
