//! tokenctl - inspect and edit the token store from the command line
//!
//! Refresh tokens use the backend configured in the settings file; key ids are
//! always read from and written to the OS keychain.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use token_store::{SecretKind, SettingsManager, StorageKind};
use tokenctl::{
    log_filter, print_secret, print_status, storage_kind_name, transient_notice, Kind,
    KindOfStorage, Stores,
};

/// Token store command-line tool
#[derive(Parser, Debug)]
#[command(name = "tokenctl")]
#[command(version)]
#[command(about = "Inspect and edit namespaced refresh tokens and key ids")]
struct Args {
    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, env = "TOKENCTL_SETTINGS_DIR")]
    settings_dir: Option<PathBuf>,

    /// Override the keychain service name for this invocation
    #[arg(long)]
    service: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored value (exit code 1 when absent)
    Get { kind: Kind, namespace: String },
    /// Store a value; prompts when no value is given, reads stdin with "-"
    Set {
        kind: Kind,
        namespace: String,
        value: Option<String>,
    },
    /// Remove a stored value
    Del { kind: Kind, namespace: String },
    /// Show settings and backend information
    Status,
    /// Edit the settings file
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Set the keychain service name
    SetService { name: String },
    /// Choose the refresh token backend
    SetKind { kind: KindOfStorage },
    /// Restore defaults
    Reset,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(env_directives.as_deref(), args.verbose))
        .init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let mut manager = match &args.settings_dir {
        Some(dir) => SettingsManager::new(dir),
        None => SettingsManager::open_default(),
    }
    .context("Failed to load settings")?;
    debug!("Using settings file {:?}", manager.path());

    let mut settings = manager.get().clone();
    if let Some(service) = args.service {
        settings.service_name = service;
    }

    match args.command {
        Command::Get { kind, namespace } => {
            let stores = Stores::open(&settings);
            print_secret(&stores, kind.into(), &namespace, &mut std::io::stdout().lock())
        }
        Command::Set {
            kind,
            namespace,
            value,
        } => {
            let kind = SecretKind::from(kind);
            let value = read_value(value)?;
            Stores::open(&settings).set(kind, &namespace, &value)?;
            if let Some(notice) = transient_notice(&settings, kind) {
                eprintln!("{}", notice);
            }
            Ok(true)
        }
        Command::Del { kind, namespace } => {
            Stores::open(&settings).del(kind.into(), &namespace)?;
            Ok(true)
        }
        Command::Status => {
            let stores = Stores::open(&settings);
            print_status(&manager, &stores, &mut std::io::stdout().lock())?;
            Ok(true)
        }
        Command::Settings(SettingsCommand::SetService { name }) => {
            manager.set_service_name(&name)?;
            println!("service name set to {}", name);
            Ok(true)
        }
        Command::Settings(SettingsCommand::SetKind { kind }) => {
            let kind = StorageKind::from(kind);
            manager.set_storage_kind(kind)?;
            println!("storage kind set to {}", storage_kind_name(kind));
            Ok(true)
        }
        Command::Settings(SettingsCommand::Reset) => {
            manager.reset()?;
            println!("settings reset to defaults");
            Ok(true)
        }
    }
}

/// Resolve the value to store from the argument, stdin or a hidden prompt
fn read_value(value: Option<String>) -> Result<String> {
    let value = match value.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read value from stdin")?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
        Some(v) => v.to_string(),
        None => rpassword::prompt_password("Value: ").context("Failed to read value")?,
    };
    if value.is_empty() {
        bail!("Refusing to store an empty value");
    }
    Ok(value)
}
