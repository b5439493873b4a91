//! Edge strings: maximal runs of directed edges that become one output line.
//!
//! An [`EdgeString`] is grown only by [`EdgeString::build`], which follows
//! [`LineMergeGraph::next`] from a starting directed edge until it reaches
//! an endpoint/branch node or arrives back at the start.

use geo::{Coord, LineString};

use crate::graph::{DirectedEdgeId, LineMergeGraph};
use crate::types::MergeError;

/// An ordered sequence of directed edges tracing one continuous path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeString {
    directed_edges: Vec<DirectedEdgeId>,
    closed: bool,
}

impl EdgeString {
    /// Walk the graph from `start`, consuming every edge on the way.
    ///
    /// Stops when the current directed edge has no continuation (open
    /// path) or its continuation is `start` again (ring).
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::EdgeRevisited`] if the walk reaches an edge
    /// that is already consumed, including `start` itself.
    pub fn build(
        graph: &mut LineMergeGraph,
        start: DirectedEdgeId,
        directed: bool,
    ) -> Result<Self, MergeError> {
        let mut directed_edges = Vec::new();
        let mut current = start;
        loop {
            let edge = graph.directed_edge(current).edge();
            if graph.edge(edge).is_consumed() {
                return Err(MergeError::EdgeRevisited);
            }
            directed_edges.push(current);
            graph.set_edge_consumed(edge, true);

            match graph.next(current, directed) {
                None => {
                    return Ok(Self {
                        directed_edges,
                        closed: false,
                    });
                }
                Some(next) if next == start => {
                    return Ok(Self {
                        directed_edges,
                        closed: true,
                    });
                }
                Some(next) => current = next,
            }
        }
    }

    /// Directed edges in traversal order.
    #[must_use]
    pub fn directed_edges(&self) -> &[DirectedEdgeId] {
        &self.directed_edges
    }

    /// Number of input lines joined into this string.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directed_edges.len()
    }

    /// Always `false` for strings produced by [`build`](Self::build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directed_edges.is_empty()
    }

    /// Whether the walk returned to its starting directed edge.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Concatenate the coordinates of every directed edge.
    ///
    /// The shared coordinate at each junction is emitted once. If more
    /// edges were walked against their stored orientation than along it,
    /// the result is reversed so it follows the majority input direction.
    #[must_use]
    pub fn to_line_string(&self, graph: &LineMergeGraph) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        let mut forward = 0_usize;
        let mut reverse = 0_usize;

        for &directed_edge in &self.directed_edges {
            if graph.directed_edge(directed_edge).edge_direction() {
                forward += 1;
            } else {
                reverse += 1;
            }
            for coord in graph.directed_coords(directed_edge) {
                if coords.last() != Some(&coord) {
                    coords.push(coord);
                }
            }
        }

        if reverse > forward {
            coords.reverse();
        }
        LineString::new(coords)
    }
}
