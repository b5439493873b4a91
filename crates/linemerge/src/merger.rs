//! The line merger: turns input linework into maximal simple paths.
//!
//! # Algorithm
//!
//! 1. **Obvious start nodes:** every node that is not a pass-through node
//!    (degree other than 2) must be the start, end, or branch point of
//!    every line touching it. Build one edge string per unconsumed
//!    outgoing directed edge at each such node.
//!
//! 2. **Isolated loops:** whatever remains unprocessed lies on rings made
//!    purely of degree-2 nodes. Each such ring is walked once from the
//!    first of its nodes in enumeration order.
//!
//! Every edge ends up in exactly one edge string; each edge string
//! becomes one output [`LineString`].

use std::ops::ControlFlow;

use geo::{Geometry, LineString};

use crate::decompose::for_each_linear_component;
use crate::diagnostics::MergeStats;
use crate::edge_string::EdgeString;
use crate::graph::{LineMergeGraph, NodeId};
use crate::types::{MergeConfig, MergeError};

/// Merges linework that is connected end to end.
///
/// Feed geometry with [`add`](Self::add), then read the result with
/// [`merged_lines`](Self::merged_lines). The merge runs once; afterwards
/// further input is rejected and repeated reads return the cached lines.
///
/// # Examples
///
/// ```
/// use linemerge::{Geometry, LineMerger, LineString};
///
/// let mut merger = LineMerger::new();
/// for points in [
///     vec![(0.0, 0.0), (1.0, 0.0)],
///     vec![(1.0, 0.0), (2.0, 0.0)],
///     vec![(2.0, 0.0), (3.0, 0.0)],
/// ] {
///     merger.add(&Geometry::LineString(LineString::from(points))).unwrap();
/// }
/// let merged = merger.merged_lines().unwrap();
/// assert_eq!(merged.len(), 1);
/// assert_eq!(
///     merged[0],
///     LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineMerger {
    config: MergeConfig,
    graph: LineMergeGraph,
    edge_strings: Vec<EdgeString>,
    merged: Option<Vec<LineString<f64>>>,
    input_lines: usize,
    degenerate_lines: usize,
}

impl LineMerger {
    /// Create a merger with the default (undirected) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with an explicit configuration.
    #[must_use]
    pub fn with_config(config: MergeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration this merger was created with.
    #[must_use]
    pub const fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Add the linework of a geometry. May be called any number of times
    /// before the merge.
    ///
    /// Line strings, segments, polygon rings, and the members of multi
    /// geometries and collections are inserted; points are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::AlreadyMerged`] once the merge has run, or
    /// [`MergeError::NonFiniteCoordinate`] for NaN/infinite input. On a
    /// coordinate error, components preceding the bad one stay inserted.
    pub fn add(&mut self, geometry: &Geometry<f64>) -> Result<(), MergeError> {
        if self.merged.is_some() {
            return Err(MergeError::AlreadyMerged);
        }
        match for_each_linear_component(geometry, &mut |line| match self.insert(line) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(e),
        }) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(e) => Err(e),
        }
    }

    /// Add a single line string.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn add_line_string(&mut self, line: &LineString<f64>) -> Result<(), MergeError> {
        if self.merged.is_some() {
            return Err(MergeError::AlreadyMerged);
        }
        self.insert(line)
    }

    /// Add every geometry yielded by `geometries`, stopping at the first
    /// error.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn add_all<'a, I>(&mut self, geometries: I) -> Result<(), MergeError>
    where
        I: IntoIterator<Item = &'a Geometry<f64>>,
    {
        geometries
            .into_iter()
            .try_for_each(|geometry| self.add(geometry))
    }

    fn insert(&mut self, line: &LineString<f64>) -> Result<(), MergeError> {
        let inserted = self.graph.insert_line(line)?;
        self.input_lines += 1;
        if inserted.is_none() {
            self.degenerate_lines += 1;
            log::debug!(
                "skipping degenerate line with {} coordinate(s)",
                line.0.len()
            );
        }
        Ok(())
    }

    /// Run the merge if it has not run yet.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::UnexpectedDegree`] or
    /// [`MergeError::EdgeRevisited`] if the graph violates its structural
    /// invariants. Nothing is cached in that case.
    pub fn merge(&mut self) -> Result<(), MergeError> {
        if self.merged.is_some() {
            return Ok(());
        }

        // A failed earlier attempt may have left marks behind.
        self.graph.reset_marks();
        self.edge_strings.clear();

        self.build_edge_strings_for_obvious_start_nodes()?;
        let open = self.edge_strings.len();
        self.build_edge_strings_for_isolated_loops()?;
        log::debug!(
            "merged {} edge(s) over {} node(s) into {} line(s) ({} from isolated loops)",
            self.graph.edge_count(),
            self.graph.node_count(),
            self.edge_strings.len(),
            self.edge_strings.len() - open,
        );

        let lines = self
            .edge_strings
            .iter()
            .map(|edge_string| edge_string.to_line_string(&self.graph))
            .collect();
        self.merged = Some(lines);
        Ok(())
    }

    /// Phase 1: start at every node that cannot be passed through.
    fn build_edge_strings_for_obvious_start_nodes(&mut self) -> Result<(), MergeError> {
        for node in self.graph.node_ids() {
            if !self.graph.is_pass_through(node, self.config.directed) {
                self.build_edge_strings_starting_at(node)?;
                self.graph.set_node_marked(node, true);
            }
        }
        Ok(())
    }

    /// Phase 2: walk the rings made only of pass-through nodes.
    fn build_edge_strings_for_isolated_loops(&mut self) -> Result<(), MergeError> {
        for node in self.graph.node_ids() {
            if self.graph.node(node).is_marked() {
                continue;
            }
            if !self.graph.is_pass_through(node, self.config.directed) {
                let coord = self.graph.node(node).coord();
                return Err(MergeError::UnexpectedDegree {
                    x: coord.x,
                    y: coord.y,
                    degree: self.graph.degree(node),
                });
            }
            self.build_edge_strings_starting_at(node)?;
            self.graph.set_node_marked(node, true);
        }
        Ok(())
    }

    fn build_edge_strings_starting_at(&mut self, node: NodeId) -> Result<(), MergeError> {
        let directed = self.config.directed;
        let out_edges = self.graph.out_edges(node).to_vec();
        for start in out_edges {
            let directed_edge = self.graph.directed_edge(start);
            if self.graph.edge(directed_edge.edge()).is_consumed() {
                continue;
            }
            if directed && !directed_edge.edge_direction() {
                continue;
            }
            let edge_string = EdgeString::build(&mut self.graph, start, directed)?;
            log::trace!(
                "edge string of {} edge(s) from {:?} (closed: {})",
                edge_string.len(),
                self.graph.node(node).coord(),
                edge_string.is_closed(),
            );
            self.edge_strings.push(edge_string);
        }
        Ok(())
    }

    /// Whether the merge has completed.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged.is_some()
    }

    /// Merge if necessary and return the output lines.
    ///
    /// Lines from open paths come first in node enumeration order,
    /// followed by isolated loops.
    ///
    /// # Errors
    ///
    /// Same as [`merge`](Self::merge).
    pub fn merged_lines(&mut self) -> Result<&[LineString<f64>], MergeError> {
        self.merge()?;
        Ok(self.merged.as_deref().unwrap_or_default())
    }

    /// Merge if necessary and hand the output lines to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`merge`](Self::merge).
    pub fn into_merged_lines(mut self) -> Result<Vec<LineString<f64>>, MergeError> {
        self.merge()?;
        Ok(self.merged.unwrap_or_default())
    }

    /// The edge strings built by the merge, empty before it runs.
    #[must_use]
    pub fn edge_strings(&self) -> &[EdgeString] {
        &self.edge_strings
    }

    /// The underlying merge graph.
    #[must_use]
    pub const fn graph(&self) -> &LineMergeGraph {
        &self.graph
    }

    /// Counts describing the input and, once merged, the result.
    #[must_use]
    pub fn stats(&self) -> MergeStats {
        MergeStats {
            input_lines: self.input_lines,
            degenerate_lines: self.degenerate_lines,
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            merged_lines: self.merged.as_ref().map(Vec::len),
            closed_lines: self
                .merged
                .as_ref()
                .map(|lines| lines.iter().filter(|line| line.is_closed()).count()),
        }
    }
}
