//! Structural editing of `Host` blocks within a single file.
//!
//! A file is treated as a sequence of blocks: a `Host` header together with every line up to
//! the next header, or a single line outside any host block. Blocks which are not being edited
//! are written back exactly as they were read.
// (c) 2024 Ross Younger

use std::path::Path;

use tracing::info;

use super::{
    entry::{render_block, Spec, SshOptions},
    errors::{HostsError, Result},
    header::HostHeader,
    text::{is_simple_alias, read_lines, write_lines},
};

#[derive(Debug)]
enum Block<'a> {
    /// A line outside any host block
    Line(&'a str),
    Host {
        header: HostHeader,
        raw_header: &'a str,
        body: Vec<&'a str>,
    },
}

fn split_blocks(lines: &[String]) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    for line in lines {
        if let Some(header) = HostHeader::parse(line) {
            blocks.push(Block::Host {
                header,
                raw_header: line,
                body: Vec::new(),
            });
        } else if let Some(Block::Host { body, .. }) = blocks.last_mut() {
            body.push(line);
        } else {
            blocks.push(Block::Line(line));
        }
    }
    blocks
}

/// Does any `Host` header in these lines name the alias?
fn alias_in_lines(lines: &[String], alias: &str) -> bool {
    lines
        .iter()
        .filter_map(|l| HostHeader::parse(l))
        .any(|h| h.contains(alias))
}

/// Removes an alias from every header which names it.
///
/// A header left with no aliases takes its whole block with it.
/// Returns the new lines, and whether the alias was found at all.
fn remove_alias_from_lines(lines: &[String], alias: &str) -> (Vec<String>, bool) {
    let mut output = Vec::with_capacity(lines.len());
    let mut found = false;
    for block in split_blocks(lines) {
        match block {
            Block::Line(line) => output.push(line.to_owned()),
            Block::Host {
                mut header,
                raw_header,
                body,
            } => {
                if !header.contains(alias) {
                    output.push(raw_header.to_owned());
                } else {
                    found = true;
                    header.aliases.retain(|a| a != alias);
                    if header.aliases.is_empty() {
                        continue;
                    }
                    output.push(header.render());
                }
                output.extend(body.into_iter().map(str::to_owned));
            }
        }
    }
    (output, found)
}

/// Appends a new block, separated from any preceding content by exactly one blank line,
/// and followed by one blank line.
fn append_block(lines: &mut Vec<String>, spec: &Spec, options: &SshOptions) {
    if lines.last().is_some_and(|l| !l.trim().is_empty()) {
        lines.push(String::new());
    }
    lines.extend(render_block(spec, options));
    lines.push(String::new());
}

pub(super) fn check_alias(alias: &str) -> Result<()> {
    if alias.is_empty() {
        Err(HostsError::MissingAlias)
    } else if !is_simple_alias(alias) {
        Err(HostsError::PatternAlias(alias.to_owned()))
    } else {
        Ok(())
    }
}

/// Reads a file for editing. A file which does not exist reads as empty.
fn read_for_edit(path: &Path) -> Result<Vec<String>> {
    match read_lines(path) {
        Err(HostsError::MissingFile(_)) => Ok(Vec::new()),
        other => other,
    }
}

///////////////////////////////////////////////////////////////////////////////////////

/// Appends a new host block to a file, creating the file (and its parent directories) if needed.
///
/// # Errors
/// * [`HostsError::MissingAlias`] / [`HostsError::PatternAlias`] if the alias is not a simple alias
/// * [`HostsError::DuplicateAlias`] if the file already declares the alias; the file is not touched
pub fn add_host_entry<P: AsRef<Path>>(path: P, spec: &Spec, options: &SshOptions) -> Result<()> {
    let path = path.as_ref();
    let spec = spec.normalize();
    let options = options.normalize();
    check_alias(&spec.alias)?;

    let mut lines = read_for_edit(path)?;
    if alias_in_lines(&lines, &spec.alias) {
        return Err(HostsError::DuplicateAlias {
            alias: spec.alias,
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HostsError::io("creating", parent, e))?;
    }
    append_block(&mut lines, &spec, &options);
    write_lines(path, &lines)?;
    info!("added host {} to {}", spec.alias, path.display());
    Ok(())
}

/// Replaces the block for `old_alias` with a freshly generated one, which may carry a new alias.
///
/// If `old_alias` shares its header with other aliases, only it is removed from the header;
/// the others keep their block. The regenerated block is appended at the end of the file,
/// so the original field order and any comments within the old block are not kept.
///
/// # Errors
/// * [`HostsError::MissingAlias`] / [`HostsError::PatternAlias`] if either alias is not simple
/// * [`HostsError::HostNotFound`] if the file does not declare `old_alias`
/// * [`HostsError::DuplicateAlias`] if the new alias is declared by another block in the file
pub fn update_host_entry<P: AsRef<Path>>(
    path: P,
    old_alias: &str,
    spec: &Spec,
    options: &SshOptions,
) -> Result<()> {
    let path = path.as_ref();
    let old_alias = old_alias.trim();
    let spec = spec.normalize();
    let options = options.normalize();
    check_alias(old_alias)?;
    check_alias(&spec.alias)?;

    let lines = read_for_edit(path)?;
    let (mut lines, found) = remove_alias_from_lines(&lines, old_alias);
    if !found {
        return Err(HostsError::HostNotFound {
            alias: old_alias.to_owned(),
            path: path.to_path_buf(),
        });
    }
    if alias_in_lines(&lines, &spec.alias) {
        return Err(HostsError::DuplicateAlias {
            alias: spec.alias,
            path: path.to_path_buf(),
        });
    }
    append_block(&mut lines, &spec, &options);
    write_lines(path, &lines)?;
    if old_alias == spec.alias {
        info!("updated host {old_alias} in {}", path.display());
    } else {
        info!("renamed host {old_alias} to {} in {}", spec.alias, path.display());
    }
    Ok(())
}

/// Removes an alias from a file, dropping its block if no other alias shares it.
///
/// # Errors
/// [`HostsError::HostNotFound`] if the file does not declare the alias
pub fn remove_host_entry<P: AsRef<Path>>(path: P, alias: &str) -> Result<()> {
    let path = path.as_ref();
    let alias = alias.trim();
    check_alias(alias)?;

    let lines = read_for_edit(path)?;
    let (lines, found) = remove_alias_from_lines(&lines, alias);
    if !found {
        return Err(HostsError::HostNotFound {
            alias: alias.to_owned(),
            path: path.to_path_buf(),
        });
    }
    write_lines(path, &lines)?;
    info!("removed host {alias} from {}", path.display());
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////
