//! cache command - Content cache operations

use anyhow::{Context as _, Result};

use crate::cli::commands::Context;
use crate::repo::{CacheStore, FileRepository};
use crate::ui::output;

/// Flush the full content cache.
pub fn flush_cache(ctx: &Context) -> Result<()> {
    let repo = FileRepository::open(&ctx.root)
        .with_context(|| format!("Failed to open repository at {}", ctx.root.display()))?;

    let removed = repo
        .cache()
        .flush()
        .context("Failed to flush the content cache")?;

    output::debug(format!("{} cache entries removed", removed), ctx.verbosity);
    output::print("The content cache was flushed.", ctx.verbosity);

    Ok(())
}
