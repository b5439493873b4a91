//! Merge diagnostics: counts describing the input graph and the result.
//!
//! Collected by every [`LineMerger`](crate::LineMerger) and serializable
//! so front ends can print or export them.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Counts collected while adding input and merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Linear components seen by `add`, including skipped ones.
    pub input_lines: usize,
    /// Components dropped because they had fewer than two distinct points.
    pub degenerate_lines: usize,
    /// Nodes in the merge graph.
    pub node_count: usize,
    /// Edges in the merge graph (inserted lines).
    pub edge_count: usize,
    /// Output lines, `None` until the merge has run.
    pub merged_lines: Option<usize>,
    /// Output lines that form closed rings, `None` until the merge has run.
    pub closed_lines: Option<usize>,
}

impl MergeStats {
    /// Render a human-readable summary table.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Line merge\n{}", "=".repeat(40));
        let _ = writeln!(out, "{:<24} {:>12}", "Input lines", self.input_lines);
        let _ = writeln!(out, "{:<24} {:>12}", "Degenerate (skipped)", self.degenerate_lines);
        let _ = writeln!(out, "{:<24} {:>12}", "Graph nodes", self.node_count);
        let _ = writeln!(out, "{:<24} {:>12}", "Graph edges", self.edge_count);
        match (self.merged_lines, self.closed_lines) {
            (Some(merged), Some(closed)) => {
                let _ = writeln!(out, "{:<24} {:>12}", "Merged lines", merged);
                let _ = writeln!(out, "{:<24} {:>12}", "Closed rings", closed);
            }
            _ => {
                let _ = writeln!(out, "{:<24} {:>12}", "Merged lines", "(pending)");
            }
        }
        out
    }
}
