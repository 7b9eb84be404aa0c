// (c) 2024 Ross Younger
//! # Settings
//!
//! hostconf decides where host configuration lives from the following sources, in order:
//! 1. Command-line options
//! 2. Environment variables (`HOSTCONF_HOME`, `HOSTCONF_SSH_CONFIG`, `HOSTCONF_TELNET_CONFIG`)
//! 3. The user's settings file (`~/.hostconf.toml`)
//! 4. Hard-wired defaults
//!
//! Each option may appear in multiple places; the highest-priority source wins.
//!
//! ### Example
//!
//! ```toml
//! # Keep telnet hosts alongside other network kit
//! telnet_config = "/srv/netops/telnet_hosts"
//! ```
//!
//! With no settings at all, the root config files are `~/.ssh/config` and `~/.telnet/config`.

mod manager;
pub use manager::{Manager, Settings, SettingsOverrides};
