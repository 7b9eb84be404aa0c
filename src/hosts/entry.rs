//! Host entry data model
// (c) 2024 Ross Younger

use std::path::PathBuf;

use serde::Serialize;

/// Indent used for directives in blocks we write
const BLOCK_INDENT: &str = "    ";

/// A host's connection fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Spec {
    /// The `Host` token which names this entry
    pub alias: String,
    /// `HostName`
    pub host_name: String,
    /// `Port`, as written (not validated here)
    pub port: String,
    /// `User`
    pub user: String,
}

/// Algorithm selections. These are stored verbatim and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SshOptions {
    /// `HostKeyAlgorithms`
    pub host_key_algorithms: String,
    /// `KexAlgorithms`
    pub kex_algorithms: String,
    /// `MACs`
    pub macs: String,
}

/// One addressable host, as read from a configuration tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    /// Connection fields
    #[serde(flatten)]
    pub spec: Spec,
    /// Algorithm options; omitted from output when all blank
    #[serde(skip_serializing_if = "SshOptions::is_empty")]
    pub options: SshOptions,
    /// The file whose `Host` block declared this alias
    pub source_path: PathBuf,
}

impl Spec {
    /// Convenience constructor
    #[must_use]
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with every field whitespace-trimmed
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self {
            alias: self.alias.trim().into(),
            host_name: self.host_name.trim().into(),
            port: self.port.trim().into(),
            user: self.user.trim().into(),
        }
    }
}

impl SshOptions {
    /// True if no option is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host_key_algorithms.is_empty() && self.kex_algorithms.is_empty() && self.macs.is_empty()
    }

    /// Returns a copy with every field whitespace-trimmed
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self {
            host_key_algorithms: self.host_key_algorithms.trim().into(),
            kex_algorithms: self.kex_algorithms.trim().into(),
            macs: self.macs.trim().into(),
        }
    }
}

impl HostEntry {
    pub(crate) fn new(alias: &str, source_path: PathBuf) -> Self {
        Self {
            spec: Spec::new(alias),
            options: SshOptions::default(),
            source_path,
        }
    }

    /// The entry's alias
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.spec.alias
    }

    /// Returns a copy with all fields whitespace-trimmed
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self {
            spec: self.spec.normalize(),
            options: self.options.normalize(),
            source_path: self.source_path.clone(),
        }
    }

    /// Applies a directive to this entry.
    ///
    /// `keyword` must be lowercase. Returns false if the keyword is not one we understand.
    pub(crate) fn set_directive(&mut self, keyword: &str, value: &str) -> bool {
        let field = match keyword {
            "hostname" => &mut self.spec.host_name,
            "port" => &mut self.spec.port,
            "user" => &mut self.spec.user,
            "hostkeyalgorithms" => &mut self.options.host_key_algorithms,
            "kexalgorithms" => &mut self.options.kex_algorithms,
            "macs" => &mut self.options.macs,
            _ => return false,
        };
        value.trim().clone_into(field);
        true
    }
}

/// Generates the lines of a fresh `Host` block.
///
/// Only non-empty fields are written. Inputs are expected to be normalised already.
pub(crate) fn render_block(spec: &Spec, options: &SshOptions) -> Vec<String> {
    let mut lines = vec![format!("Host {}", spec.alias)];
    for (keyword, value) in [
        ("HostName", &spec.host_name),
        ("User", &spec.user),
        ("Port", &spec.port),
        ("HostKeyAlgorithms", &options.host_key_algorithms),
        ("KexAlgorithms", &options.kex_algorithms),
        ("MACs", &options.macs),
    ] {
        if !value.is_empty() {
            lines.push(format!("{BLOCK_INDENT}{keyword} {value}"));
        }
    }
    lines
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{render_block, HostEntry, Spec, SshOptions};

    #[test]
    fn normalization_trims_everything() {
        let spec = Spec {
            alias: "  box ".into(),
            host_name: "\t10.0.0.1".into(),
            port: " 22".into(),
            user: "root  ".into(),
        };
        let opts = SshOptions {
            host_key_algorithms: " ssh-ed25519 ".into(),
            kex_algorithms: String::new(),
            macs: "hmac-sha2-256\t".into(),
        };
        assert_eq!(
            spec.normalize(),
            Spec {
                alias: "box".into(),
                host_name: "10.0.0.1".into(),
                port: "22".into(),
                user: "root".into(),
            }
        );
        let opts = opts.normalize();
        assert_eq!(opts.host_key_algorithms, "ssh-ed25519");
        assert_eq!(opts.macs, "hmac-sha2-256");
        assert!(!opts.is_empty());
        assert!(SshOptions::default().is_empty());
    }

    #[test]
    fn directive_setter() {
        let mut e = HostEntry::new("box", PathBuf::from("/tmp/config"));
        assert!(e.set_directive("hostname", " 10.1.1.1 "));
        assert!(e.set_directive("port", "2222"));
        assert!(e.set_directive("user", "admin"));
        assert!(e.set_directive("kexalgorithms", "curve25519-sha256"));
        assert!(!e.set_directive("identityfile", "~/.ssh/id_ed25519"));
        assert_eq!(e.spec.host_name, "10.1.1.1");
        assert_eq!(e.spec.port, "2222");
        assert_eq!(e.spec.user, "admin");
        assert_eq!(e.options.kex_algorithms, "curve25519-sha256");
        assert_eq!(e.alias(), "box");
    }

    #[test]
    fn block_rendering() {
        let spec = Spec {
            alias: "krabby".into(),
            host_name: "10.0.0.147".into(),
            ..Spec::default()
        };
        assert_eq!(
            render_block(&spec, &SshOptions::default()),
            vec!["Host krabby", "    HostName 10.0.0.147"]
        );

        let spec = Spec {
            alias: "full".into(),
            host_name: "h".into(),
            port: "2200".into(),
            user: "u".into(),
        };
        let opts = SshOptions {
            host_key_algorithms: "a,b".into(),
            kex_algorithms: "c".into(),
            macs: "d".into(),
        };
        assert_eq!(
            render_block(&spec, &opts),
            vec![
                "Host full",
                "    HostName h",
                "    User u",
                "    Port 2200",
                "    HostKeyAlgorithms a,b",
                "    KexAlgorithms c",
                "    MACs d",
            ]
        );
    }
}
