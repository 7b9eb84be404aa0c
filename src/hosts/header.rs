//! `Host` header line codec
// (c) 2024 Ross Younger

use super::text::fields;

/// A `Host` line, taken apart so it can be put back together without disturbing its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HostHeader {
    /// The exact leading whitespace
    pub indent: String,
    /// Alias tokens, in the order written
    pub aliases: Vec<String>,
    /// Trailing comment including its `#`, or empty
    pub comment: String,
}

impl HostHeader {
    /// Parses a raw line.
    ///
    /// Returns None for blank lines, for lines that are not `Host` directives,
    /// and for `Host` lines with no aliases.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let body = line.trim_start();
        let indent = &line[..line.len() - body.len()];

        let (directive, comment) = match body.find('#') {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => (body, ""),
        };
        let tokens = fields(directive);
        let (keyword, aliases) = tokens.split_first()?;
        if !keyword.eq_ignore_ascii_case("host") || aliases.is_empty() {
            return None;
        }
        Some(Self {
            indent: indent.to_owned(),
            aliases: aliases.iter().map(|s| (*s).to_owned()).collect(),
            comment: comment.to_owned(),
        })
    }

    /// Does this header declare the given alias?
    pub(crate) fn contains(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// Reconstructs the line
    pub(crate) fn render(&self) -> String {
        let mut line = format!("{}Host {}", self.indent, self.aliases.join(" "));
        if !self.comment.is_empty() {
            line.push(' ');
            line.push_str(&self.comment);
        }
        line
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::assert_eq_as_result;

    use super::HostHeader;

    fn header(indent: &str, aliases: &[&str], comment: &str) -> Option<HostHeader> {
        Some(HostHeader {
            indent: indent.into(),
            aliases: aliases.iter().map(|s| (*s).into()).collect(),
            comment: comment.into(),
        })
    }

    #[test]
    fn header_parsing() -> Result<()> {
        for (input, expected) in [
            ("", None),
            ("   ", None),
            ("# Host commented", None),
            ("HostName 10.0.0.1", None),
            ("Host", None),
            ("Host # only a comment", None),
            ("Host a", header("", &["a"], "")),
            ("hOsT a b", header("", &["a", "b"], "")),
            ("\t  Host a\tb  ", header("\t  ", &["a", "b"], "")),
            ("Host a # the box\r\n", header("", &["a"], "# the box")),
            ("  Host a b #x#y", header("  ", &["a", "b"], "#x#y")),
            ("Host *.corp !bad", header("", &["*.corp", "!bad"], "")),
        ] {
            let msg = || format!("input {input:?} failed");
            assert_eq_as_result!(HostHeader::parse(input), expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        Ok(())
    }

    #[test]
    fn render_preserves_layout() {
        let mut h = HostHeader::parse("    Host one two three   # shared box").unwrap();
        assert_eq!(h.render(), "    Host one two three # shared box");
        h.aliases.retain(|a| a != "two");
        assert_eq!(h.render(), "    Host one three # shared box");

        let h = HostHeader::parse("Host solo").unwrap();
        assert_eq!(h.render(), "Host solo");
        assert!(h.contains("solo"));
        assert!(!h.contains("Solo"));
    }
}
