//! reconcile::report
//!
//! Structured run reports.
//!
//! # Design
//!
//! A [`RunReport`] accumulates what a reconciliation pass did: how many
//! child nodes were created (or, on a dry run, would be created), how many
//! creation attempts failed, and the ordered human-readable lines describing
//! each event. Counters only increase; the increment-only API makes that an
//! interface property rather than a convention.
//!
//! Rendering is pure concatenation: the reconciler produces finished line
//! text, the report just joins it.

/// Accumulated result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    created: u64,
    errors: u64,
    lines: Vec<String>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children created, or detected as missing on a dry run.
    ///
    /// The same counter serves both modes: a dry run counts what it *would*
    /// create.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Number of failed creation attempts.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// The report lines, in traversal order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when nothing was created and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.created == 0 && self.errors == 0
    }

    /// Append a line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Count one created (or would-create) child.
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    /// Count one failed creation attempt.
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Fold another report into this one: counters add, lines concatenate.
    pub fn merge(&mut self, other: RunReport) {
        self.created += other.created;
        self.errors += other.errors;
        self.lines.extend(other.lines);
    }

    /// Render the report as one newline-joined block.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
