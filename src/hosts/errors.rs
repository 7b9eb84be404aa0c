//! Error taxonomy for the host configuration engine
// (c) 2024 Ross Younger

use std::path::PathBuf;

/// Everything that can go wrong while reading or editing a host configuration tree
#[derive(Debug, thiserror::Error)]
pub enum HostsError {
    /// The alias is not declared in the file or tree we looked in
    #[error("host `{alias}` not found in {}", .path.display())]
    HostNotFound {
        /// The alias we were looking for
        alias: String,
        /// The file (or tree root) that was searched
        path: PathBuf,
    },
    /// The file does not exist
    #[error("{} does not exist", .0.display())]
    MissingFile(PathBuf),
    /// A mutation was requested without an alias
    #[error("an alias is required")]
    MissingAlias,
    /// The alias is a pattern (contains `*`, `?` or `!`) and cannot be edited
    #[error("`{0}` is a pattern, not a simple alias")]
    PatternAlias(String),
    /// The alias is already declared
    #[error("host `{alias}` already exists in {}", .path.display())]
    DuplicateAlias {
        /// The conflicting alias
        alias: String,
        /// The file that already declares it
        path: PathBuf,
    },
    /// Includes were nested too deeply
    #[error("too many nested includes (limit {limit}) at {}", .path.display())]
    IncludeDepth {
        /// The file that would have exceeded the limit
        path: PathBuf,
        /// The depth limit in force
        limit: u8,
    },
    /// An `Include` argument could not be expanded
    #[error("bad include pattern `{pattern}`: {reason}")]
    BadIncludePattern {
        /// The argument as written in the file
        pattern: String,
        /// What went wrong
        reason: String,
    },
    /// The user's home directory could not be determined
    #[error("could not determine home directory")]
    NoHomeDirectory,
    /// Any other I/O failure
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What we were doing, e.g. "reading"
        action: &'static str,
        /// The file concerned
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
}

impl HostsError {
    /// Is this a "not found" condition, either of a file or of an alias?
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HostNotFound { .. } | Self::MissingFile(_))
    }

    /// Converts an I/O error, turning `NotFound` into [`HostsError::MissingFile`]
    pub(crate) fn io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile(path.to_path_buf())
        } else {
            Self::Io {
                action,
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result alias for this module
pub type Result<T> = std::result::Result<T, HostsError>;

#[cfg(test)]
mod test {
    use super::HostsError;
    use assertables::assert_contains;
    use std::path::Path;

    #[test]
    fn not_found_conditions() {
        let p = Path::new("/nonexistent/config");
        let e = HostsError::io(
            "reading",
            p,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(e, HostsError::MissingFile(_)));
        assert!(e.is_not_found());

        let e = HostsError::HostNotFound {
            alias: "devbox".into(),
            path: p.into(),
        };
        assert!(e.is_not_found());
        assert_contains!(e.to_string(), "host `devbox` not found in /nonexistent/config");

        let e = HostsError::io(
            "writing",
            p,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(!e.is_not_found());
        assert_contains!(e.to_string(), "writing /nonexistent/config");
    }
}
