//! Connection protocols
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The protocols whose host configuration we manage.
///
/// Each has its own root config file under the user's home directory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Secure shell
    #[default]
    Ssh,
    /// Telnet
    Telnet,
}

impl Protocol {
    /// Location of the root config file, relative to the home directory
    #[must_use]
    pub fn relative_root(self) -> &'static Path {
        match self {
            Protocol::Ssh => Path::new(".ssh/config"),
            Protocol::Telnet => Path::new(".telnet/config"),
        }
    }

    /// The root config file under the given home directory
    #[must_use]
    pub fn root_under(self, home: &Path) -> PathBuf {
        home.join(self.relative_root())
    }

    /// The port used when an entry does not specify one
    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Ssh => 22,
            Protocol::Telnet => 23,
        }
    }
}
