// (c) 2024 Ross Younger
//! # Host configuration engine
//!
//! Reads and edits ssh-style host configuration files.
//!
//! ## File format
//!
//! This is the textual `Key Value` format of OpenSSH's `ssh_config`, supporting comments.
//! Only a handful of directives are understood:
//!
//! * `Host` starts a block for one or more aliases. Aliases containing `*`, `?` or `!` are
//!   patterns; they are read over but never become entries.
//! * `HostName`, `Port`, `User`, `HostKeyAlgorithms`, `KexAlgorithms` and `MACs` are
//!   recorded for every alias of the current block.
//! * `Include` reads other files (with `~` expansion and glob wildcards; relative paths are
//!   relative to the including file) at the point of the directive. Includes may nest up to
//!   [`MAX_INCLUDE_DEPTH`] levels deep.
//!
//! Everything else is ignored.
//!
//! ### Example
//!
//! ```text
//! Include conf.d/*.conf
//!
//! Host devbox build   # shared machine
//!     HostName 10.0.0.5
//!     Port 2222
//!
//! Host *
//!     ServerAliveInterval 30
//! ```
//!
//! ## Editing
//!
//! Edits are structural: a file is split into `Host` blocks, and only the blocks being
//! changed are rewritten. Comments, indentation, unrelated directives and blocks shared with
//! other aliases survive untouched. Edits to an existing alias land in the file which
//! declares it, which may be an included file; new aliases always go to the root file.
//!
//! There is no locking; concurrent edits to the same file by other programs may be lost.

mod editor;
mod entry;
mod errors;
mod header;
mod includes;
mod parser;
mod protocol;
mod store;
mod text;

pub use editor::{add_host_entry, remove_host_entry, update_host_entry};
pub use entry::{HostEntry, Spec, SshOptions};
pub use errors::{HostsError, Result};
pub use parser::{parse_config_recursively, Diagnostic, ParsedConfig, Parser, MAX_INCLUDE_DEPTH};
pub use protocol::Protocol;
pub use store::{find_host_entry, ConfigStore};
pub use text::is_simple_alias;
