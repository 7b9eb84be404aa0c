//! Include-aware host operations against a protocol's config tree
// (c) 2024 Ross Younger

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use super::{
    editor::{add_host_entry, check_alias, remove_host_entry, update_host_entry},
    entry::{HostEntry, Spec, SshOptions},
    errors::{HostsError, Result},
    parser::{ParsedConfig, Parser},
    protocol::Protocol,
};

/// Parses a tree, treating a missing root as an empty tree
fn parse_tree(parser: Parser, root: &Path) -> Result<ParsedConfig> {
    match parser.parse(root) {
        Err(HostsError::MissingFile(path)) => {
            debug!("config file {} not present", path.display());
            Ok(ParsedConfig::default())
        }
        other => other,
    }
}

fn find_in(parser: Parser, root: &Path, alias: &str) -> Result<Option<HostEntry>> {
    Ok(parse_tree(parser, root)?
        .entries
        .into_iter()
        .find(|e| e.alias() == alias))
}

/// Looks up an alias in the tree rooted at `root`.
///
/// The returned entry's `source_path` is the file which declares the alias.
/// An absent alias, or an absent root file, is `Ok(None)`.
pub fn find_host_entry<P: AsRef<Path>>(root: P, alias: &str) -> Result<Option<HostEntry>> {
    find_in(Parser::new(), root.as_ref(), alias.trim())
}

///////////////////////////////////////////////////////////////////////////////////////

/// Entry point for reading and editing host configuration, one tree per [`Protocol`].
///
/// Root file locations derive from a home directory given at construction;
/// each protocol's root may be overridden individually.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    home: PathBuf,
    roots: HashMap<Protocol, PathBuf>,
}

impl ConfigStore {
    /// Creates a store rooted in the given home directory
    #[must_use]
    pub fn new<P: Into<PathBuf>>(home: P) -> Self {
        Self {
            home: home.into(),
            roots: HashMap::new(),
        }
    }

    /// Creates a store rooted in the current user's home directory
    pub fn for_current_user() -> Result<Self> {
        dirs::home_dir()
            .map(Self::new)
            .ok_or(HostsError::NoHomeDirectory)
    }

    /// Overrides the root config file for a protocol
    #[must_use]
    pub fn with_root<P: Into<PathBuf>>(mut self, protocol: Protocol, path: P) -> Self {
        let _ = self.roots.insert(protocol, path.into());
        self
    }

    /// The home directory in use
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    fn parser(&self) -> Parser {
        Parser::with_home(&self.home)
    }

    /// The root config file for a protocol.
    ///
    /// This is a path construction only; the file may not exist.
    #[must_use]
    pub fn config_path_for_protocol(&self, protocol: Protocol) -> PathBuf {
        let path = self
            .roots
            .get(&protocol)
            .cloned()
            .unwrap_or_else(|| protocol.root_under(&self.home));
        trace!("{protocol} root config is {}", path.display());
        path
    }

    /// The file an alias would be saved to: the file declaring it if it exists, otherwise the root.
    pub fn config_path_for_alias(&self, protocol: Protocol, alias: &str) -> Result<PathBuf> {
        Ok(match self.find_host_entry(protocol, alias)? {
            Some(entry) => entry.source_path,
            None => self.config_path_for_protocol(protocol),
        })
    }

    /// Parses a protocol's whole tree, with diagnostics. A missing root yields an empty result.
    pub fn parse(&self, protocol: Protocol) -> Result<ParsedConfig> {
        parse_tree(self.parser(), &self.config_path_for_protocol(protocol))
    }

    /// All addressable entries in a protocol's tree, in file-encounter order
    pub fn list_hosts(&self, protocol: Protocol) -> Result<Vec<HostEntry>> {
        Ok(self.parse(protocol)?.entries)
    }

    /// Looks up an alias in a protocol's tree
    pub fn find_host_entry(&self, protocol: Protocol, alias: &str) -> Result<Option<HostEntry>> {
        find_in(
            self.parser(),
            &self.config_path_for_protocol(protocol),
            alias.trim(),
        )
    }

    /// Adds a new entry to the protocol's root file.
    ///
    /// # Errors
    /// [`HostsError::DuplicateAlias`] if the alias is already declared anywhere in the tree,
    /// plus those of [`add_host_entry`].
    pub fn add_host_to_root_config(
        &self,
        protocol: Protocol,
        spec: &Spec,
        options: &SshOptions,
    ) -> Result<()> {
        let root = self.config_path_for_protocol(protocol);
        if let Some(existing) = self.find_host_entry(protocol, &spec.alias)? {
            return Err(HostsError::DuplicateAlias {
                alias: existing.spec.alias,
                path: existing.source_path,
            });
        }
        add_host_entry(root, spec, options)
    }

    /// Rewrites an entry in whichever file declares it.
    ///
    /// # Errors
    /// * [`HostsError::MissingAlias`] or [`HostsError::PatternAlias`] if `old_alias` is not a simple alias
    /// * [`HostsError::HostNotFound`] if the tree does not declare `old_alias`
    /// * [`HostsError::DuplicateAlias`] if renaming onto an alias declared anywhere in the tree
    /// * those of [`update_host_entry`]
    pub fn update_host_in_config(
        &self,
        protocol: Protocol,
        old_alias: &str,
        spec: &Spec,
        options: &SshOptions,
    ) -> Result<()> {
        let old_alias = old_alias.trim();
        let source = self.source_of(protocol, old_alias)?;
        let new_alias = spec.alias.trim();
        if new_alias != old_alias {
            if let Some(existing) = self.find_host_entry(protocol, new_alias)? {
                return Err(HostsError::DuplicateAlias {
                    alias: existing.spec.alias,
                    path: existing.source_path,
                });
            }
        }
        update_host_entry(source, old_alias, spec, options)
    }

    /// Removes an entry from whichever file declares it.
    ///
    /// # Errors
    /// * [`HostsError::MissingAlias`] or [`HostsError::PatternAlias`] if `alias` is not a simple alias
    /// * [`HostsError::HostNotFound`] if the tree does not declare the alias
    pub fn remove_host_from_config(&self, protocol: Protocol, alias: &str) -> Result<()> {
        let alias = alias.trim();
        let source = self.source_of(protocol, alias)?;
        remove_host_entry(source, alias)
    }

    fn source_of(&self, protocol: Protocol, alias: &str) -> Result<PathBuf> {
        check_alias(alias)?;
        self.find_host_entry(protocol, alias)?
            .map(|e| e.source_path)
            .ok_or_else(|| HostsError::HostNotFound {
                alias: alias.to_owned(),
                path: self.config_path_for_protocol(protocol),
            })
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::path::Path;

    use assertables::assert_contains;

    use super::{find_host_entry, ConfigStore};
    use crate::hosts::{HostsError, Protocol, Spec, SshOptions};

    /// A home directory with an ssh tree split across two files
    fn make_home() -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        let ssh = home.path().join(".ssh");
        std::fs::create_dir_all(ssh.join("conf.d")).unwrap();
        std::fs::write(
            ssh.join("config"),
            "Include ~/.ssh/conf.d/*.conf\n\nHost rootbox\n    HostName 10.0.0.1\n",
        )
        .unwrap();
        std::fs::write(
            ssh.join("conf.d/work.conf"),
            "# work machines\nHost build ci\n    HostName 10.1.0.1\n    User jenkins\n",
        )
        .unwrap();
        home
    }

    fn spec(alias: &str, host_name: &str) -> Spec {
        Spec {
            alias: alias.into(),
            host_name: host_name.into(),
            ..Spec::default()
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn paths() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let root = home.path().join(".ssh/config");
        let work = home.path().join(".ssh/conf.d/work.conf");

        assert_eq!(store.config_path_for_protocol(Protocol::Ssh), root);
        assert_eq!(
            store.config_path_for_protocol(Protocol::Telnet),
            home.path().join(".telnet/config")
        );
        assert_eq!(store.config_path_for_alias(Protocol::Ssh, "ci").unwrap(), work);
        assert_eq!(store.config_path_for_alias(Protocol::Ssh, "rootbox").unwrap(), root);
        assert_eq!(store.config_path_for_alias(Protocol::Ssh, "unknown").unwrap(), root);

        let store = store.with_root(Protocol::Telnet, "/srv/telnet.conf");
        assert_eq!(
            store.config_path_for_protocol(Protocol::Telnet),
            Path::new("/srv/telnet.conf")
        );
    }

    #[test]
    fn find_and_list() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let hosts = store.list_hosts(Protocol::Ssh).unwrap();
        let aliases: Vec<_> = hosts.iter().map(|h| h.alias()).collect();
        assert_eq!(aliases, vec!["build", "ci", "rootbox"]);

        let ci = store.find_host_entry(Protocol::Ssh, "ci").unwrap().unwrap();
        assert_eq!(ci.spec.user, "jenkins");
        assert_eq!(ci.source_path, home.path().join(".ssh/conf.d/work.conf"));
        assert!(store.find_host_entry(Protocol::Ssh, "nope").unwrap().is_none());

        // the free function has no injected home, so give it a tree without ~ includes
        let telnet = home.path().join("plain");
        std::fs::write(&telnet, "Host router\n    Port 2323\n").unwrap();
        let router = find_host_entry(&telnet, " router ").unwrap().unwrap();
        assert_eq!(router.spec.port, "2323");
    }

    #[test]
    fn missing_root_is_empty() {
        let home = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(home.path());
        assert!(store.list_hosts(Protocol::Telnet).unwrap().is_empty());
        assert!(store.find_host_entry(Protocol::Telnet, "x").unwrap().is_none());
        assert!(find_host_entry(home.path().join("absent"), "x").unwrap().is_none());

        let err = store.remove_host_from_config(Protocol::Telnet, "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn add_goes_to_root_and_creates_directories() {
        let home = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(home.path());
        store
            .add_host_to_root_config(Protocol::Telnet, &spec("switch", "10.2.0.1"), &SshOptions::default())
            .unwrap();
        assert_eq!(
            read(&home.path().join(".telnet/config")),
            "Host switch\n    HostName 10.2.0.1\n\n"
        );
    }

    #[test]
    fn add_rejects_alias_from_include() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let root = home.path().join(".ssh/config");
        let before = read(&root);
        let err = store
            .add_host_to_root_config(Protocol::Ssh, &spec("build", "x"), &SshOptions::default())
            .unwrap_err();
        assert!(matches!(err, HostsError::DuplicateAlias { .. }));
        assert_contains!(err.to_string(), "work.conf");
        assert_eq!(read(&root), before);
    }

    #[test]
    fn update_lands_in_declaring_file() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let root = home.path().join(".ssh/config");
        let work = home.path().join(".ssh/conf.d/work.conf");
        let root_before = read(&root);

        let new = Spec {
            alias: "ci".into(),
            host_name: "10.1.0.2".into(),
            user: "jenkins".into(),
            ..Spec::default()
        };
        store
            .update_host_in_config(Protocol::Ssh, "ci", &new, &SshOptions::default())
            .unwrap();

        assert_eq!(read(&root), root_before);
        assert_eq!(
            read(&work),
            "# work machines\nHost build\n    HostName 10.1.0.1\n    User jenkins\n\nHost ci\n    HostName 10.1.0.2\n    User jenkins\n\n"
        );
        let build = store.find_host_entry(Protocol::Ssh, "build").unwrap().unwrap();
        assert_eq!(build.spec.host_name, "10.1.0.1");
    }

    #[test]
    fn rename_across_files_is_rejected() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let work = home.path().join(".ssh/conf.d/work.conf");
        let before = read(&work);
        let err = store
            .update_host_in_config(Protocol::Ssh, "ci", &spec("rootbox", "x"), &SshOptions::default())
            .unwrap_err();
        assert!(matches!(err, HostsError::DuplicateAlias { .. }));
        assert_eq!(read(&work), before);

        let err = store
            .update_host_in_config(Protocol::Ssh, "ghost", &spec("ghost", "x"), &SshOptions::default())
            .unwrap_err();
        assert!(matches!(err, HostsError::HostNotFound { .. }));
    }

    #[test]
    fn relative_home_resolves_tilde_includes() {
        let cwd = std::env::current_dir().unwrap();
        let home = tempfile::Builder::new()
            .prefix("hostconf-home")
            .tempdir_in(&cwd)
            .unwrap();
        let relative = home.path().strip_prefix(&cwd).unwrap();
        assert!(relative.is_relative());
        let ssh = home.path().join(".ssh");
        std::fs::create_dir(&ssh).unwrap();
        std::fs::write(ssh.join("config"), "Include ~/.ssh/extra\nHost main\n").unwrap();
        std::fs::write(ssh.join("extra"), "Host extra\n").unwrap();

        let store = ConfigStore::new(relative);
        let parsed = store.parse(Protocol::Ssh).unwrap();
        let aliases: Vec<_> = parsed.entries.iter().map(|h| h.alias()).collect();
        assert_eq!(aliases, vec!["extra", "main"]);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn pattern_alias_is_rejected_before_lookup() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        for alias in ["*", "web?"] {
            let err = store.remove_host_from_config(Protocol::Ssh, alias).unwrap_err();
            assert!(matches!(err, HostsError::PatternAlias(_)));
            let err = store
                .update_host_in_config(Protocol::Ssh, alias, &spec("web", "x"), &SshOptions::default())
                .unwrap_err();
            assert!(matches!(err, HostsError::PatternAlias(_)));
        }
    }

    #[test]
    fn remove_from_included_file() {
        let home = make_home();
        let store = ConfigStore::new(home.path());
        let work = home.path().join(".ssh/conf.d/work.conf");

        store.remove_host_from_config(Protocol::Ssh, "build").unwrap();
        assert_eq!(
            read(&work),
            "# work machines\nHost ci\n    HostName 10.1.0.1\n    User jenkins\n"
        );
        let ci = store.find_host_entry(Protocol::Ssh, "ci").unwrap().unwrap();
        assert_eq!(ci.spec.host_name, "10.1.0.1");

        let err = store.remove_host_from_config(Protocol::Ssh, "build").unwrap_err();
        assert!(matches!(err, HostsError::HostNotFound { .. }));
        let err = store.remove_host_from_config(Protocol::Ssh, " ").unwrap_err();
        assert!(matches!(err, HostsError::MissingAlias));
    }
}
