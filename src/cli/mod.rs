//! cli
//!
//! Command-line interface layer for nodetend.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve the repository root from flag, environment and config
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that drive [`crate::reconcile`]; all repository access flows
//! through the [`crate::repo`] doorway.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load().context("Failed to load configuration")?;
    let quiet = cli.quiet || config.global.quiet.unwrap_or(false);

    let ctx = commands::Context {
        root: config
            .repository_root(cli.repo.as_deref())
            .context("Failed to resolve the repository root")?,
        verbosity: Verbosity::from_flags(quiet, cli.debug),
    };

    // Dispatch to command handler
    commands::dispatch(cli.command, &ctx)
}
