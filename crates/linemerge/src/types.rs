//! Shared types for the line merger: configuration and errors.

use serde::{Deserialize, Serialize};

/// Re-export the geometry types the merger consumes and produces so
/// downstream crates can build input without depending on `geo` directly.
pub use geo::{Coord, Geometry, LineString};

/// Configuration for a [`LineMerger`](crate::LineMerger).
///
/// The defaults reproduce classic undirected merging: any two lines that
/// meet at a node of degree 2 are joined, reversing one of them if needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Only join lines whose stored directions agree at the shared node.
    ///
    /// In directed mode a node where two lines both start (or both end)
    /// is treated as an endpoint, and output lines never traverse an
    /// input line against its coordinate order.
    #[serde(default)]
    pub directed: bool,
}

impl MergeConfig {
    /// Default value for [`directed`](Self::directed).
    pub const DEFAULT_DIRECTED: bool = false;

    /// Configuration for direction-preserving merging.
    #[must_use]
    pub const fn directed() -> Self {
        Self { directed: true }
    }
}

/// Errors that can occur while building or merging the line graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MergeError {
    /// Input was added after the merge already ran.
    ///
    /// A merger computes its result exactly once; start a new
    /// [`LineMerger`](crate::LineMerger) to merge a different input set.
    #[error("cannot add geometry after the merge has been computed")]
    AlreadyMerged,

    /// An input coordinate was NaN or infinite.
    #[error("input coordinate ({x}, {y}) is not finite")]
    NonFiniteCoordinate {
        /// Horizontal component as supplied.
        x: f64,
        /// Vertical component as supplied.
        y: f64,
    },

    /// A node left over for the isolated-loop phase did not have degree 2.
    ///
    /// Indicates a corrupted graph; continuing could loop forever.
    #[error("node at ({x}, {y}) has degree {degree} but only degree-2 nodes may remain unprocessed")]
    UnexpectedDegree {
        /// Node x coordinate.
        x: f64,
        /// Node y coordinate.
        y: f64,
        /// Number of outgoing directed edges at the node.
        degree: usize,
    },

    /// Edge-string construction reached an edge that was already consumed.
    #[error("edge string revisited an already consumed edge")]
    EdgeRevisited,
}
