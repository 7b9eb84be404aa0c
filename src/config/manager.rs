//! Settings file wrangling
// (c) 2024 Ross Younger

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::Value,
    Figment, Metadata, Provider,
};
use serde::{Deserialize, Serialize};
use tabled::{settings::style::Style, Table, Tabled};
use tracing::trace;

use crate::hosts::{ConfigStore, HostsError, Protocol};

// PATHS /////////////////////////////////////////////////////////////////////////////////////////////////////

const BASE_CONFIG_FILENAME: &str = "hostconf.toml";
const ENV_PREFIX: &str = "HOSTCONF_";

fn user_config_path() -> Option<PathBuf> {
    // ~/.<filename> for now
    let mut d = dirs::home_dir()?;
    d.push(format!(".{BASE_CONFIG_FILENAME}"));
    Some(d)
}

// SETTINGS ////////////////////////////////////////////////////////////////////////////////////////////////

/// Where to find things.
///
/// **Note:** The implementation of `default()` returns the hard-wired defaults,
/// which leave everything to be derived from the current user's home directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// The home directory under which root config files live
    pub home: Option<PathBuf>,
    /// Overrides the root ssh config file
    pub ssh_config: Option<PathBuf>,
    /// Overrides the root telnet config file
    pub telnet_config: Option<PathBuf>,
}

impl Settings {
    const FIELD_NAMES: &'static [&'static str] = &["home", "ssh_config", "telnet_config"];

    fn system_default() -> Self {
        Self {
            home: dirs::home_dir(),
            ..Self::default()
        }
    }

    /// Builds the host store these settings describe
    pub fn store(&self) -> Result<ConfigStore, HostsError> {
        let mut store = match &self.home {
            Some(home) => ConfigStore::new(home),
            None => ConfigStore::for_current_user()?,
        };
        if let Some(p) = &self.ssh_config {
            store = store.with_root(Protocol::Ssh, p);
        }
        if let Some(p) = &self.telnet_config {
            store = store.with_root(Protocol::Telnet, p);
        }
        Ok(store)
    }
}

/// Overrides from the command line. Fields left as `None` do not override anything.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    /// Home directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    /// Root ssh config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_config: Option<PathBuf>,
    /// Root telnet config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telnet_config: Option<PathBuf>,
}

// CONFIG MANAGER /////////////////////////////////////////////////////////////////////////////////////////////

/// Processes and merges all possible settings sources, in increasing order of priority:
/// hard-wired defaults, the user's settings file, `HOSTCONF_*` environment variables,
/// then whatever the caller merges in (usually command-line options).
#[derive(Debug, Default)]
pub struct Manager {
    /// Configuration data
    data: Figment,
}

impl Manager {
    /// Initialises this structure, reading the user's settings file and the environment.
    #[must_use]
    pub fn new() -> Self {
        let mut data = Figment::new().merge(Serialized::defaults(Settings::system_default()));
        match user_config_path() {
            Some(path) if path.exists() => data = data.merge(Toml::file(path)),
            Some(path) => trace!("settings file {} not present", path.display()),
            None => trace!("no home directory, so no settings file"),
        }
        // N.B. This may leave data in a fused-error state, if a data file isn't parseable.
        Self {
            data: data.merge(Env::prefixed(ENV_PREFIX)),
        }
    }

    /// Testing/internal constructor, does not read files or environment
    #[must_use]
    pub fn without_files() -> Self {
        Self {
            data: Figment::new().merge(Serialized::defaults(Settings::system_default())),
        }
    }

    /// Returns the list of settings files we might read
    #[must_use]
    pub fn config_files() -> Vec<String> {
        user_config_path()
            .into_iter()
            .map(|p| p.to_string_lossy().into())
            .collect()
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in command-line overrides
    pub fn merge_overrides(&mut self, overrides: &SettingsOverrides) {
        self.merge_provider(Serialized::defaults(overrides));
    }

    /// Merges in a data set from a TOML file
    pub fn merge_toml_file<T>(&mut self, toml: T)
    where
        T: AsRef<Path>,
    {
        self.merge_provider(Toml::file_exact(toml.as_ref()));
    }

    /// Extracts the merged settings
    pub fn get(&self) -> Result<Settings, figment::Error> {
        self.data.extract::<Settings>()
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct PrettySetting {
    field: String,
    value: String,
    source: String,
}

impl PrettySetting {
    fn render_source(meta: Option<&Metadata>) -> String {
        meta.map_or_else(String::new, |m| {
            m.source
                .as_ref()
                .map_or_else(|| m.name.to_string(), figment::Source::to_string)
        })
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) => s.to_string(),
            Value::Empty(_tag, _) => "<unset>".into(),
            other => format!("{other:?}"),
        }
    }
}

impl Display for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields = Vec::<PrettySetting>::new();
        for field in Settings::FIELD_NAMES {
            let (value, source) = match self.data.find_value(field) {
                Ok(v) => (
                    PrettySetting::render_value(&v),
                    PrettySetting::render_source(self.data.find_metadata(field)),
                ),
                Err(_) => ("<unset>".into(), String::new()),
            };
            fields.push(PrettySetting {
                field: (*field).into(),
                value,
                source,
            });
        }
        write!(f, "{}", Table::new(fields).with(Style::sharp()))
    }
}

///////////////////////////////////////////////////////////////////////////////////////
