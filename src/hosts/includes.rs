//! Include directive logic
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};

use super::{
    errors::{HostsError, Result},
    text::expand_tilde,
};

/// Wildcard matching and ~ expansion for Include directives.
///
/// Relative paths are resolved against `base_dir`, the directory of the including file.
/// Matches are returned in the order the glob engine yields them (sorted by name).
pub(super) fn find_include_files(
    arg: &str,
    base_dir: &Path,
    home: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let path = expand_tilde(arg, home)?;
    let pattern = if path.is_absolute() {
        path
    } else {
        // the including file's directory is literal text, not part of the pattern
        Path::new(&Pattern::escape(&base_dir.to_string_lossy())).join(path)
    };

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_leading_dot: true,
        require_literal_separator: true,
    };
    let matches =
        glob_with(pattern.to_string_lossy().as_ref(), options).map_err(|e| {
            HostsError::BadIncludePattern {
                pattern: arg.to_owned(),
                reason: e.to_string(),
            }
        })?;
    Ok(matches.flatten().filter(|p| p.is_file()).collect())
}

///////////////////////////////////////////////////////////////////////////////////////
