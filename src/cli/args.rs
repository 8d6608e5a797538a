//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <path>`: Content repository root
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// nodetend - audit and repair auto-created child nodes in content repositories
#[derive(Parser, Debug)]
#[command(name = "nodetend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content repository root (default: $NODETEND_REPO, config, then cwd)
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing auto-created child nodes
    #[command(
        name = "reconcile",
        long_about = "Create missing auto-created child nodes.\n\n\
            Walks the content nodes of a workspace, compares each node's \
            children against the child slots its node type mandates, and \
            creates whatever is missing. With --dry-run the gaps are only \
            reported.\n\n\
            Individual creation failures never abort the run; they are \
            counted and listed in the report.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Report gaps everywhere without touching anything
    nt reconcile --dry-run

    # Repair a single workspace
    nt reconcile --workspace live

    # Repair one type (and its subtypes) across all workspaces
    nt reconcile --node-type acme:page"
    )]
    Reconcile {
        /// Only process this workspace (default: all workspaces)
        #[arg(long, value_name = "NAME")]
        workspace: Option<String>,

        /// Only process this node type and its subtypes
        #[arg(long = "node-type", value_name = "TYPE")]
        node_type: Option<String>,

        /// Report what would be created without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// List the repository's workspaces
    #[command(name = "workspaces")]
    Workspaces,

    /// Content cache operations
    #[command(name = "cache")]
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Flush the full content cache
    Flush,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
