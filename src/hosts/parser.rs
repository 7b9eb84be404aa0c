//! Recursive config file parsing
// (c) 2024 Ross Younger

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::{
    entry::HostEntry,
    errors::{HostsError, Result},
    includes::find_include_files,
    text::{fields, is_simple_alias, read_lines},
};

/// How deeply `Include` directives may nest. The root file is depth 0.
pub const MAX_INCLUDE_DEPTH: u8 = 5;

#[derive(Debug, PartialEq)]
/// A parsed line we read from a config file
enum Line<'a> {
    Empty,
    Host(Vec<&'a str>),
    Include(Vec<&'a str>),
    Generic {
        keyword: String, /*lowercase!*/
        value: String,
    },
}

fn parse_line(line: &str) -> Line<'_> {
    let tokens = fields(line);
    let Some((keyword, args)) = tokens.split_first() else {
        return Line::Empty;
    };
    let keyword = keyword.to_lowercase();
    match keyword.as_str() {
        "host" => Line::Host(args.to_vec()),
        "include" => Line::Include(args.to_vec()),
        _ => Line::Generic {
            keyword,
            value: args.join(" "),
        },
    }
}

/// Something odd we skipped over while reading a config tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file in which the problem was found
    pub file: PathBuf,
    /// What happened
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// The output of parsing a config tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConfig {
    /// Entries, in file-encounter order
    pub entries: Vec<HostEntry>,
    /// Problems which were skipped over
    pub diagnostics: Vec<Diagnostic>,
}

/// Entries in the order their aliases were first seen, with lookup by alias
#[derive(Debug, Default)]
struct OrderedEntries {
    entries: Vec<HostEntry>,
    index: HashMap<String, usize>,
}

impl OrderedEntries {
    fn position_or_insert(&mut self, alias: &str, source: &Path) -> usize {
        if let Some(&i) = self.index.get(alias) {
            return i;
        }
        let i = self.entries.len();
        self.entries.push(HostEntry::new(alias, source.to_path_buf()));
        let _ = self.index.insert(alias.to_owned(), i);
        i
    }
}

///////////////////////////////////////////////////////////////////////////////////////

/// The business end of reading a config tree.
///
/// # Note
/// You can only use this struct once. If you want to re-parse, create a fresh `Parser`.
#[derive(Debug)]
pub struct Parser {
    home: Option<PathBuf>,
    depth_limit: u8,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            home: None,
            depth_limit: MAX_INCLUDE_DEPTH,
            diagnostics: Vec::new(),
        }
    }
}

impl Parser {
    /// Creates a parser which resolves `~` via the operating system
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser which resolves `~` and `~/...` against the given home directory
    #[must_use]
    pub fn with_home<P: Into<PathBuf>>(home: P) -> Self {
        Self {
            home: Some(home.into()),
            ..Self::default()
        }
    }

    /// Parses a config tree.
    ///
    /// Included files are read where their `Include` directive appears; their entries come
    /// before the including file's own entries.
    /// Failures within includes are recorded as diagnostics and do not abort the parse.
    ///
    /// # Errors
    /// [`HostsError::MissingFile`] if `path` does not exist; [`HostsError::Io`] if it cannot be read.
    pub fn parse<P: AsRef<Path>>(mut self, path: P) -> Result<ParsedConfig> {
        let path = path.as_ref();
        let path = std::path::absolute(path).map_err(|e| HostsError::io("resolving", path, e))?;
        // a relative home must not be taken relative to the including file
        if let Some(home) = self.home.take() {
            self.home = Some(
                std::path::absolute(&home).map_err(|e| HostsError::io("resolving", &home, e))?,
            );
        }
        let entries = self.parse_file(&path, 0)?;
        Ok(ParsedConfig {
            entries,
            diagnostics: self.diagnostics,
        })
    }

    fn note(&mut self, file: &Path, error: &HostsError) {
        warn!("skipping include in {}: {error}", file.display());
        self.diagnostics.push(Diagnostic {
            file: file.to_path_buf(),
            message: error.to_string(),
        });
    }

    fn parse_file(&mut self, path: &Path, depth: u8) -> Result<Vec<HostEntry>> {
        if depth > self.depth_limit {
            return Err(HostsError::IncludeDepth {
                path: path.to_path_buf(),
                limit: self.depth_limit,
            });
        }
        let lines = read_lines(path)?;
        debug!("parsing {} (depth {depth})", path.display());

        let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let mut output = Vec::new();
        let mut local = OrderedEntries::default();
        // indices into `local` of the aliases named by the most recent Host line
        let mut current = Vec::<usize>::new();

        for line in &lines {
            match parse_line(line) {
                Line::Empty => (),
                Line::Include(args) => {
                    for arg in args {
                        self.follow_include(arg, path, base_dir, depth, &mut output);
                    }
                }
                Line::Host(args) => {
                    current.clear();
                    for alias in args.into_iter().filter(|a| is_simple_alias(a)) {
                        current.push(local.position_or_insert(alias, path));
                    }
                }
                Line::Generic { keyword, value } => {
                    for &i in &current {
                        // unrecognised directives are ignored
                        let _ = local.entries[i].set_directive(&keyword, &value);
                    }
                }
            }
        }

        output.extend(local.entries.iter().map(HostEntry::normalize));
        Ok(output)
    }

    fn follow_include(
        &mut self,
        arg: &str,
        including: &Path,
        base_dir: &Path,
        depth: u8,
        output: &mut Vec<HostEntry>,
    ) {
        let files = match find_include_files(arg, base_dir, self.home.as_deref()) {
            Ok(f) => f,
            Err(e) => {
                self.note(including, &e);
                return;
            }
        };
        for file in files {
            debug!("following include {} from {}", file.display(), including.display());
            match self.parse_file(&file, depth + 1) {
                Ok(mut entries) => output.append(&mut entries),
                Err(e) => self.note(including, &e),
            }
        }
    }
}

/// Parses a config tree, discarding diagnostics.
///
/// `~` in `Include` directives is resolved via the operating system.
pub fn parse_config_recursively<P: AsRef<Path>>(path: P) -> Result<Vec<HostEntry>> {
    Ok(Parser::new().parse(path)?.entries)
}

///////////////////////////////////////////////////////////////////////////////////////
