//! Line-level text helpers
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use super::errors::{HostsError, Result};

/// Characters which make a `Host` argument a pattern rather than a concrete alias
const PATTERN_CHARS: &[char] = &['*', '?', '!'];

/// Reads a file as a list of lines, with CRLF and lone CR normalised to LF.
///
/// A trailing newline does not produce an extra empty line; an empty file produces no lines.
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| HostsError::io("reading", path, e))?;
    Ok(split_lines(&content))
}

pub(crate) fn split_lines(content: &str) -> Vec<String> {
    let normalised = content.replace("\r\n", "\n").replace('\r', "\n");
    if normalised.is_empty() {
        return Vec::new();
    }
    normalised
        .strip_suffix('\n')
        .unwrap_or(&normalised)
        .split('\n')
        .map(str::to_owned)
        .collect()
}

/// Writes out a list of lines, each terminated by `\n`.
///
/// This is a whole-file rewrite; it is not atomic.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| HostsError::io("writing", path, e))
}

/// Removes any `#` comment from the line
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// Splits a line into whitespace-delimited fields, ignoring any comment
pub(crate) fn fields(line: &str) -> Vec<&str> {
    strip_comment(line).split_whitespace().collect()
}

/// Is this a concrete alias, as opposed to a pattern?
#[must_use]
pub fn is_simple_alias(alias: &str) -> bool {
    !alias.is_empty() && !alias.contains(PATTERN_CHARS)
}

/// `~` expansion.
///
/// `~` and `~/...` resolve against `home` where one was given; `~user/...` is handed to the OS.
pub(crate) fn expand_tilde(arg: &str, home: Option<&Path>) -> Result<PathBuf> {
    if !arg.starts_with('~') {
        return Ok(PathBuf::from(arg));
    }
    if let Some(home) = home {
        if arg == "~" {
            return Ok(home.to_path_buf());
        }
        if let Some(rest) = arg.strip_prefix("~/") {
            return Ok(home.join(rest));
        }
    }
    expanduser::expanduser(arg).map_err(|e| HostsError::BadIncludePattern {
        pattern: arg.to_owned(),
        reason: e.to_string(),
    })
}

///////////////////////////////////////////////////////////////////////////////////////
