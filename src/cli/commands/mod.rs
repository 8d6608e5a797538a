//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Opens the repository and drives the reconcile/cache layer
//! 3. Formats and displays output
//!
//! Handlers never touch storage directly; everything goes through the
//! repository doorway.

mod cache;
mod completion;
mod reconcile;
mod workspaces;

// Re-export command functions for testing and direct invocation
pub use cache::flush_cache;
pub use completion::completion;
pub use reconcile::reconcile;
pub use workspaces::workspaces;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::args::{CacheAction, Command};
use crate::ui::output::Verbosity;

/// Resolved invocation context shared by all handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Content repository root.
    pub root: PathBuf,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Reconcile {
            workspace,
            node_type,
            dry_run,
        } => reconcile(ctx, workspace.as_deref(), node_type.as_deref(), dry_run),
        Command::Workspaces => workspaces(ctx),
        Command::Cache {
            action: CacheAction::Flush,
        } => flush_cache(ctx),
        Command::Completion { shell } => completion(shell),
    }
}
