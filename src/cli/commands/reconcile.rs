//! reconcile command - Create missing auto-created child nodes

use anyhow::{Context as _, Result};

use crate::cli::commands::Context;
use crate::core::lock::RunLock;
use crate::core::types::{NodeTypeName, WorkspaceName};
use crate::reconcile::RunDriver;
use crate::repo::FileRepository;
use crate::ui::output;

/// Create missing child nodes across one or all workspaces.
///
/// Non-dry runs take the repository's run lock so only one mutating
/// maintenance run executes at a time; dry runs read freely.
pub fn reconcile(
    ctx: &Context,
    workspace: Option<&str>,
    node_type: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let workspace = workspace
        .map(WorkspaceName::new)
        .transpose()
        .context("Invalid workspace name")?;
    let node_type = node_type
        .map(NodeTypeName::new)
        .transpose()
        .context("Invalid node type name")?;

    let repo = FileRepository::open(&ctx.root)
        .with_context(|| format!("Failed to open repository at {}", ctx.root.display()))?;

    let _lock = if dry_run {
        None
    } else {
        Some(RunLock::acquire(&ctx.root).context("Cannot start maintenance run")?)
    };

    let driver = RunDriver::new(repo.registry(), &repo, &repo);
    let runs = match &workspace {
        Some(name) => vec![driver.run_workspace(name, node_type.as_ref(), dry_run)?],
        None => driver.run_all(node_type.as_ref(), dry_run)?,
    };

    for run in &runs {
        output::print(run.heading(), ctx.verbosity);
        // The report is the command's product; print it even when quiet
        println!("{}", run.report.render());
        output::debug(
            format!(
                "workspace {}: created={} errors={}",
                run.workspace,
                run.report.created(),
                run.report.errors()
            ),
            ctx.verbosity,
        );
    }

    Ok(())
}
