// hostconf command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    config::SettingsOverrides,
    hosts::{Protocol, Spec, SshOptions},
};

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about,
    before_help = "e.g.   hostconf add devbox --hostname 10.0.0.5 --port 2222",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    /// Which protocol's host configuration to operate on
    #[arg(short = 'p', long, value_enum, default_value_t = Protocol::Ssh, global = true)]
    pub protocol: Protocol,

    // LOCATIONS ===========================================================================
    /// Home directory under which the root config files live [default: your home directory]
    #[arg(long, value_name("DIR"), global = true, help_heading("Locations"))]
    pub home: Option<PathBuf>,
    /// Root ssh config file [default: ~/.ssh/config]
    #[arg(long, value_name("FILE"), global = true, help_heading("Locations"))]
    pub ssh_config: Option<PathBuf>,
    /// Root telnet config file [default: ~/.telnet/config]
    #[arg(long, value_name("FILE"), global = true, help_heading("Locations"))]
    pub telnet_config: Option<PathBuf>,

    // DEBUG ===============================================================================
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=hostconf=trace` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, global = true, conflicts_with("quiet"), help_heading("Debug"))]
    pub debug: bool,
    /// Quiet mode; reports only errors
    #[arg(short, long, action, global = true, help_heading("Debug"))]
    pub quiet: bool,
    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, global = true, help_heading("Debug"), value_name("FILE"))]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    pub(crate) fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            home: self.home.clone(),
            ssh_config: self.ssh_config.clone(),
            telnet_config: self.telnet_config.clone(),
        }
    }

    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub(crate) enum Command {
    /// Lists the hosts in the configuration tree
    List {
        /// Outputs JSON
        #[arg(long)]
        json: bool,
    },
    /// Shows a single host
    Show {
        /// The host alias
        alias: String,
        /// Outputs JSON
        #[arg(long)]
        json: bool,
    },
    /// Adds a host to the root config file
    Add {
        /// The new host alias
        alias: String,
        #[command(flatten)]
        fields: HostFields,
    },
    /// Edits a host in whichever file declares it.
    ///
    /// Fields not given keep their current values. The host's block is regenerated, so any
    /// comments inside it are lost and it moves to the end of its file.
    Update {
        /// The current host alias
        alias: String,
        /// Renames the host
        #[arg(long, value_name("NEW_ALIAS"))]
        rename: Option<String>,
        #[command(flatten)]
        fields: HostFields,
    },
    /// Removes a host from whichever file declares it
    Remove {
        /// The host alias
        alias: String,
    },
    /// Shows the file a host would be saved to (or the root config file, if no alias is given)
    Path {
        /// The host alias
        alias: Option<String>,
    },
    /// Shows the active settings and where each came from
    Settings,
}

/// Host fields which may be given on the command line
#[derive(Debug, Args, Clone, Default)]
pub(crate) struct HostFields {
    /// The real host name or address to connect to
    #[arg(long, value_name("HOST"))]
    pub hostname: Option<String>,
    /// The port to connect to
    #[arg(long, value_parser = port_or_empty)]
    pub port: Option<String>,
    /// The user to log in as
    #[arg(long)]
    pub user: Option<String>,
    /// Host key algorithms (comma-separated)
    #[arg(long, value_name("LIST"), help_heading("SSH options"))]
    pub host_key_algorithms: Option<String>,
    /// Key exchange algorithms (comma-separated)
    #[arg(long, value_name("LIST"), help_heading("SSH options"))]
    pub kex_algorithms: Option<String>,
    /// MAC algorithms (comma-separated)
    #[arg(long, value_name("LIST"), help_heading("SSH options"))]
    pub macs: Option<String>,
}

/// A port number, or an empty string to clear the port
fn port_or_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Ok(String::new());
    }
    match s.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p.to_string()),
        _ => Err(format!("`{s}` is not a port number in the range 1-65535")),
    }
}

impl HostFields {
    /// Overwrites whichever fields were given. An empty string clears a field.
    pub(crate) fn apply(&self, spec: &mut Spec, options: &mut SshOptions) {
        fn set(target: &mut String, value: Option<&String>) {
            if let Some(v) = value {
                v.clone_into(target);
            }
        }
        set(&mut spec.host_name, self.hostname.as_ref());
        set(&mut spec.port, self.port.as_ref());
        set(&mut spec.user, self.user.as_ref());
        set(&mut options.host_key_algorithms, self.host_key_algorithms.as_ref());
        set(&mut options.kex_algorithms, self.kex_algorithms.as_ref());
        set(&mut options.macs, self.macs.as_ref());
    }
}
