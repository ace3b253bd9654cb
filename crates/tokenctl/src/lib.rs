//! # tokenctl
//!
//! Command-line access to the token store: inspect, write and remove refresh
//! tokens and key ids for a namespace.

pub mod cli;
pub mod commands;

pub use cli::{log_filter, Kind, KindOfStorage};
pub use commands::{print_secret, print_status, storage_kind_name, transient_notice, Stores};
