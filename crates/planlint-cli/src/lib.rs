//! # Planlint CLI
//!
//! The `planlint` binary: argument parsing, logging setup, and the
//! subcommands over [`planlint_core::Planlint`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use commands::{load_config, run, Outcome};
