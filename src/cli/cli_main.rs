// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use anstream::{eprintln, println};
use anyhow::Context as _;
use clap::Parser as _;
use tabled::{settings::style::Style, Table, Tabled};

use super::{
    args::{CliArgs, Command},
    styles::{DIM, WARNING},
};
use crate::{
    config::Manager,
    hosts::{ConfigStore, HostEntry, HostsError, Protocol, Spec, SshOptions},
    util::setup_tracing,
};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    setup_tracing(args.trace_level(), args.log_file.as_deref())
        .inspect_err(|e| eprintln!("{e:?}"))?;

    Ok(match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    })
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let mut manager = Manager::new();
    manager.merge_overrides(&args.overrides());
    if matches!(args.command, Command::Settings) {
        println!("{manager}");
        return Ok(());
    }
    let settings = manager.get().context("reading settings")?;
    let store = settings.store()?;
    let protocol = args.protocol;

    match &args.command {
        Command::List { json } => list(&store, protocol, *json)?,
        Command::Show { alias, json } => {
            let entry = lookup(&store, protocol, alias)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                print_table(&[entry], protocol);
            }
        }
        Command::Add { alias, fields } => {
            let mut spec = Spec::new(alias);
            let mut options = SshOptions::default();
            fields.apply(&mut spec, &mut options);
            store.add_host_to_root_config(protocol, &spec, &options)?;
            println!(
                "Added {alias} to {}",
                store.config_path_for_protocol(protocol).display()
            );
        }
        Command::Update {
            alias,
            rename,
            fields,
        } => {
            let existing = lookup(&store, protocol, alias)?;
            let HostEntry {
                mut spec,
                mut options,
                source_path,
            } = existing;
            if let Some(new_alias) = rename {
                new_alias.clone_into(&mut spec.alias);
            }
            fields.apply(&mut spec, &mut options);
            store.update_host_in_config(protocol, alias, &spec, &options)?;
            println!("Saved {} to {}", spec.alias.trim(), source_path.display());
        }
        Command::Remove { alias } => {
            let path = store.config_path_for_alias(protocol, alias)?;
            store.remove_host_from_config(protocol, alias)?;
            println!("Removed {alias} from {}", path.display());
        }
        Command::Path { alias } => {
            let path = match alias {
                Some(a) => store.config_path_for_alias(protocol, a)?,
                None => store.config_path_for_protocol(protocol),
            };
            println!("{}", path.display());
        }
        Command::Settings => unreachable!("handled above"),
    }
    Ok(())
}

fn lookup(store: &ConfigStore, protocol: Protocol, alias: &str) -> anyhow::Result<HostEntry> {
    Ok(store
        .find_host_entry(protocol, alias)?
        .ok_or_else(|| HostsError::HostNotFound {
            alias: alias.to_owned(),
            path: store.config_path_for_protocol(protocol),
        })?)
}

fn list(store: &ConfigStore, protocol: Protocol, json: bool) -> anyhow::Result<()> {
    let parsed = store.parse(protocol)?;
    for d in &parsed.diagnostics {
        eprintln!("{WARNING}warning:{WARNING:#} {d}");
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.entries)?);
    } else if parsed.entries.is_empty() {
        println!(
            "{DIM}no hosts in {}{DIM:#}",
            store.config_path_for_protocol(protocol).display()
        );
    } else {
        print_table(&parsed.entries, protocol);
    }
    Ok(())
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct HostRow {
    alias: String,
    hostname: String,
    port: String,
    user: String,
    source: String,
}

impl HostRow {
    fn new(entry: &HostEntry, protocol: Protocol) -> Self {
        let port = if entry.spec.port.is_empty() {
            format!("({})", protocol.default_port())
        } else {
            entry.spec.port.clone()
        };
        Self {
            alias: entry.spec.alias.clone(),
            hostname: entry.spec.host_name.clone(),
            port,
            user: entry.spec.user.clone(),
            source: entry.source_path.display().to_string(),
        }
    }
}

fn print_table(entries: &[HostEntry], protocol: Protocol) {
    let rows = entries.iter().map(|e| HostRow::new(e, protocol));
    println!("{}", Table::new(rows).with(Style::sharp()));
}
