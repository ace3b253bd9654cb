//! Command-line value types and logging setup

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use token_store::{SecretKind, StorageKind};

/// Secret kind as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    RefreshToken,
    AnonymousKeyId,
    BiometricKeyId,
}

impl From<Kind> for SecretKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::RefreshToken => SecretKind::RefreshToken,
            Kind::AnonymousKeyId => SecretKind::AnonymousKeyId,
            Kind::BiometricKeyId => SecretKind::BiometricKeyId,
        }
    }
}

/// Refresh token backend as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindOfStorage {
    Transient,
    Persistent,
}

impl From<KindOfStorage> for StorageKind {
    fn from(kind: KindOfStorage) -> Self {
        match kind {
            KindOfStorage::Transient => StorageKind::Transient,
            KindOfStorage::Persistent => StorageKind::Persistent,
        }
    }
}

/// Build the log filter. Directives from `RUST_LOG` win; otherwise the level
/// is `info`, or `debug` with `--verbose`.
pub fn log_filter(env_directives: Option<&str>, verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}
