//! hostconf: reads and edits ssh-style host configuration files, Include-aware
// (c) 2024 Ross Younger

mod cli;
pub use cli::cli;
pub mod config;
pub mod hosts;
/// Utilities
pub mod util;
