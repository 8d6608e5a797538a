//! workspaces command - List the repository's workspaces

use anyhow::{Context as _, Result};

use crate::cli::commands::Context;
use crate::repo::{FileRepository, WorkspaceStore};
use crate::ui::output;

/// List all workspaces known to the repository.
pub fn workspaces(ctx: &Context) -> Result<()> {
    let repo = FileRepository::open(&ctx.root)
        .with_context(|| format!("Failed to open repository at {}", ctx.root.display()))?;

    let all = repo.find_all().context("Failed to enumerate workspaces")?;
    if all.is_empty() {
        output::print("No workspaces found.", ctx.verbosity);
        return Ok(());
    }

    for workspace in all {
        println!("{}", workspace.name());
    }

    Ok(())
}
