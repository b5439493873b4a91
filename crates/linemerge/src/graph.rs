//! Planar graph specialised for line merging.
//!
//! Every input line becomes one undirected [`Edge`] realised as a pair of
//! opposite [`DirectedEdge`]s stored in a [`petgraph`] arena. Nodes are
//! keyed by their exact coordinate, so lines connect only where their
//! endpoints coincide bit-for-bit (after `-0.0` is folded into `0.0`).
//!
//! # Ordering
//!
//! [`LineMergeGraph::node_ids`] enumerates nodes in lexicographic
//! coordinate order (x, then y). The outgoing directed edges of a node are
//! kept sorted counter-clockwise by the angle of their first segment,
//! measured from the positive x axis; directed edges with identical
//! angles keep their insertion order. Together these make the merge
//! deterministic for a given input order.
//!
//! # Linkage
//!
//! [`LineMergeGraph::next`] resolves the continuation of a directed edge
//! through its terminal node. It is computed from the node's current
//! outgoing set on every call, so adding lines never leaves a stale link.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::f64::consts::TAU;

use geo::{Coord, LineString};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::types::MergeError;

/// Handle to a node in a [`LineMergeGraph`].
pub type NodeId = NodeIndex;

/// Handle to one direction of an edge in a [`LineMergeGraph`].
pub type DirectedEdgeId = EdgeIndex;

/// Handle to an undirected edge (one input line) in a [`LineMergeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A graph node: the shared endpoint of one or more lines.
#[derive(Debug, Clone)]
pub struct Node {
    coord: Coord<f64>,
    /// Outgoing directed edges, sorted by angle.
    out_edges: Vec<DirectedEdgeId>,
    marked: bool,
}

impl Node {
    /// Location of the node.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        self.coord
    }

    /// Number of outgoing directed edges. A closed line whose ends meet
    /// here contributes two.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.out_edges.len()
    }

    /// Outgoing directed edges in counter-clockwise order.
    #[must_use]
    pub fn out_edges(&self) -> &[DirectedEdgeId] {
        &self.out_edges
    }

    /// Whether the merge has processed this node.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked
    }
}

/// An undirected edge: one input line with adjacent repeats removed.
#[derive(Debug, Clone)]
pub struct Edge {
    coords: Vec<Coord<f64>>,
    consumed: bool,
}

impl Edge {
    /// Coordinates in the order the line was supplied.
    #[must_use]
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    /// Whether an edge string has already taken this edge.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// One traversal direction of an [`Edge`].
#[derive(Debug, Clone, Copy)]
pub struct DirectedEdge {
    edge: EdgeId,
    sym: DirectedEdgeId,
    /// `true` when traversal follows the stored coordinate order.
    edge_direction: bool,
    /// Angle of the first segment in `[0, 2π)`.
    angle: f64,
}

impl DirectedEdge {
    /// The undirected edge this is one half of.
    #[must_use]
    pub const fn edge(&self) -> EdgeId {
        self.edge
    }

    /// The opposite half of the same edge.
    #[must_use]
    pub const fn sym(&self) -> DirectedEdgeId {
        self.sym
    }

    /// `true` when this direction follows the line's coordinate order.
    #[must_use]
    pub const fn edge_direction(&self) -> bool {
        self.edge_direction
    }

    /// Direction of the first segment leaving the origin node, in radians.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }
}

/// Total order on coordinates used to key and enumerate nodes.
#[derive(Debug, Clone, Copy)]
struct CoordKey(Coord<f64>);

impl CoordKey {
    /// Folds `-0.0` into `0.0` so both spellings land on the same node.
    fn new(coord: Coord<f64>) -> Self {
        Self(Coord {
            x: coord.x + 0.0,
            y: coord.y + 0.0,
        })
    }
}

impl PartialEq for CoordKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CoordKey {}

impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .x
            .total_cmp(&other.0.x)
            .then_with(|| self.0.y.total_cmp(&other.0.y))
    }
}

/// Angle of the vector `from -> to`, normalised to `[0, 2π)`.
fn direction_angle(from: Coord<f64>, to: Coord<f64>) -> f64 {
    // `+ 0.0` folds the `-0.0` that `atan2` returns for a `-0.0` rise.
    let angle = (to.y - from.y).atan2(to.x - from.x) + 0.0;
    if angle < 0.0 { angle + TAU } else { angle }
}

/// The planar graph consumed by [`LineMerger`](crate::LineMerger).
#[derive(Debug, Clone, Default)]
pub struct LineMergeGraph {
    graph: DiGraph<Node, DirectedEdge>,
    edges: Vec<Edge>,
    node_map: BTreeMap<CoordKey, NodeId>,
}

impl LineMergeGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line as an edge between its two endpoint nodes.
    ///
    /// Adjacent repeated coordinates are removed first. Lines that are
    /// left with fewer than two coordinates cannot form an edge and are
    /// skipped, returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::NonFiniteCoordinate`] if any coordinate is
    /// NaN or infinite. The graph is left unchanged.
    pub fn insert_line(&mut self, line: &LineString<f64>) -> Result<Option<EdgeId>, MergeError> {
        if let Some(bad) = line.0.iter().find(|c| !(c.x.is_finite() && c.y.is_finite())) {
            return Err(MergeError::NonFiniteCoordinate { x: bad.x, y: bad.y });
        }

        let mut coords = line.0.clone();
        coords.dedup();
        let (Some(&start), Some(&end)) = (coords.first(), coords.last()) else {
            return Ok(None);
        };
        if coords.len() < 2 {
            return Ok(None);
        }

        let forward_angle = direction_angle(coords[0], coords[1]);
        let reverse_angle = direction_angle(coords[coords.len() - 1], coords[coords.len() - 2]);

        let from = self.node_at(start);
        let to = self.node_at(end);
        let edge = EdgeId(self.edges.len());
        self.edges.push(Edge {
            coords,
            consumed: false,
        });

        let forward = self.graph.add_edge(
            from,
            to,
            DirectedEdge {
                edge,
                sym: EdgeIndex::end(),
                edge_direction: true,
                angle: forward_angle,
            },
        );
        let reverse = self.graph.add_edge(
            to,
            from,
            DirectedEdge {
                edge,
                sym: forward,
                edge_direction: false,
                angle: reverse_angle,
            },
        );
        self.graph[forward].sym = reverse;

        self.attach_out_edge(from, forward);
        self.attach_out_edge(to, reverse);

        Ok(Some(edge))
    }

    /// Find or create the node at `coord`.
    fn node_at(&mut self, coord: Coord<f64>) -> NodeId {
        let key = CoordKey::new(coord);
        if let Some(&id) = self.node_map.get(&key) {
            return id;
        }
        let id = self.graph.add_node(Node {
            coord: key.0,
            out_edges: Vec::new(),
            marked: false,
        });
        self.node_map.insert(key, id);
        id
    }

    /// Insert `directed_edge` into `node`'s outgoing list, keeping it sorted.
    fn attach_out_edge(&mut self, node: NodeId, directed_edge: DirectedEdgeId) {
        let angle = self.graph[directed_edge].angle;
        let graph = &self.graph;
        let position = graph[node]
            .out_edges
            .partition_point(|&e| graph[e].angle.total_cmp(&angle) != Ordering::Greater);
        self.graph[node].out_edges.insert(position, directed_edge);
    }

    /// Node handles in lexicographic coordinate order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.node_map.values().copied().collect()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges (inserted lines).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no line has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Look up the node at an exact coordinate.
    #[must_use]
    pub fn find_node(&self, coord: Coord<f64>) -> Option<NodeId> {
        self.node_map.get(&CoordKey::new(coord)).copied()
    }

    /// Node data for `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.graph[id]
    }

    /// Number of outgoing directed edges at `id`.
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.graph[id].degree()
    }

    /// Outgoing directed edges at `id`, sorted by angle.
    #[must_use]
    pub fn out_edges(&self, id: NodeId) -> &[DirectedEdgeId] {
        &self.graph[id].out_edges
    }

    /// Set or clear the processed mark on a node.
    pub fn set_node_marked(&mut self, id: NodeId, marked: bool) {
        self.graph[id].marked = marked;
    }

    /// Edge data for `id`.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Set or clear the consumed flag on an edge.
    pub fn set_edge_consumed(&mut self, id: EdgeId, consumed: bool) {
        self.edges[id.0].consumed = consumed;
    }

    /// Directed-edge data for `id`.
    #[must_use]
    pub fn directed_edge(&self, id: DirectedEdgeId) -> &DirectedEdge {
        &self.graph[id]
    }

    /// Terminal node of a directed edge.
    #[must_use]
    pub fn to_node(&self, id: DirectedEdgeId) -> Option<NodeId> {
        self.graph.edge_endpoints(id).map(|(_, to)| to)
    }

    /// Origin node of a directed edge.
    #[must_use]
    pub fn from_node(&self, id: DirectedEdgeId) -> Option<NodeId> {
        self.graph.edge_endpoints(id).map(|(from, _)| from)
    }

    /// Coordinates of a directed edge in traversal order.
    pub fn directed_coords(&self, id: DirectedEdgeId) -> impl Iterator<Item = Coord<f64>> + '_ {
        let directed = &self.graph[id];
        let coords = self.edges[directed.edge.0].coords.iter().copied();
        let (forward, reverse) = if directed.edge_direction {
            (Some(coords), None)
        } else {
            (None, Some(coords.rev()))
        };
        forward.into_iter().flatten().chain(reverse.into_iter().flatten())
    }

    /// Whether a line arriving at `id` can continue through it.
    ///
    /// Undirected: the node has degree exactly 2. Directed: additionally
    /// one line must arrive and the other leave, so their stored
    /// directions agree.
    #[must_use]
    pub fn is_pass_through(&self, id: NodeId, directed: bool) -> bool {
        match self.graph[id].out_edges.as_slice() {
            [a, b] => !directed || self.graph[*a].edge_direction != self.graph[*b].edge_direction,
            _ => false,
        }
    }

    /// The directed edge that continues `id` through its terminal node.
    ///
    /// Returns `None` when the terminal node is an endpoint or a branch
    /// point (see [`is_pass_through`](Self::is_pass_through)).
    #[must_use]
    pub fn next(&self, id: DirectedEdgeId, directed: bool) -> Option<DirectedEdgeId> {
        let to = self.to_node(id)?;
        if !self.is_pass_through(to, directed) {
            return None;
        }
        let sym = self.graph[id].sym;
        match self.graph[to].out_edges.as_slice() {
            [first, second] if *first == sym => Some(*second),
            [first, _] => Some(*first),
            _ => None,
        }
    }

    /// Clear every node mark and edge consumed flag.
    pub fn reset_marks(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.marked = false;
        }
        for edge in &mut self.edges {
            edge.consumed = false;
        }
    }
}
