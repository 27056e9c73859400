//! Adjacency-set graph representation and the edge insertion rule.
//!
//! A [`LabeledGraph`] maps each vertex label to the set of edges leaving it.
//! Destination-only vertices are materialised with an empty edge set so the
//! vertex list of a graph is simply its key set.
//!
//! At most one edge may join an unordered pair of vertex labels, whatever its
//! direction or edge label. This holds for directed graphs too: `a -> b` and
//! `b -> a` are considered parallel.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::Rng;

use crate::labels::{EdgeLabel, VertexLabel};

/// A labeled edge `(source, label, target)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    /// Source vertex label.
    pub source: VertexLabel,
    /// Edge label.
    pub label: EdgeLabel,
    /// Destination vertex label.
    pub target: VertexLabel,
}

impl Edge {
    /// Builds an edge from its three components.
    #[must_use]
    pub const fn new(source: VertexLabel, label: EdgeLabel, target: VertexLabel) -> Self {
        Self {
            source,
            label,
            target,
        }
    }

    /// Returns `true` when source and destination coincide.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Graph keyed by vertex label with per-vertex outgoing edge sets.
///
/// # Examples
/// ```
/// use graphgen_core::{Edge, EdgeLabel, LabeledGraph, VertexLabel};
///
/// let (a, b) = (VertexLabel::new(0), VertexLabel::new(1));
/// let mut graph = LabeledGraph::new(false);
/// assert!(graph.add_edge(Edge::new(a, EdgeLabel::new(0), b)));
/// assert!(!graph.add_edge(Edge::new(b, EdgeLabel::new(1), a)));
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.vertex_count(), 2);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabeledGraph {
    adjacency: BTreeMap<VertexLabel, BTreeSet<Edge>>,
    allow_loops: bool,
}

impl LabeledGraph {
    /// Creates an empty graph. Loop edges are rejected unless `allow_loops`.
    #[must_use]
    pub const fn new(allow_loops: bool) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            allow_loops,
        }
    }

    /// Whether this graph accepts edges whose endpoints coincide.
    #[must_use]
    pub const fn allows_loops(&self) -> bool {
        self.allow_loops
    }

    /// Inserts `edge` if the structural rules permit it.
    ///
    /// Rejected when the edge is a loop and loops are disallowed, or when any
    /// edge already joins the same pair of vertices in either direction.
    /// Returns `true` iff the graph changed.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.is_loop() && !self.allow_loops {
            return false;
        }
        if self.has_edge(edge.source, edge.target) {
            return false;
        }
        let inserted = self.ensure_vertex(edge.source).insert(edge);
        let target_added = self.materialise(edge.target);
        inserted || target_added
    }

    /// Returns `true` when an edge joins `a` and `b` in either direction.
    #[must_use]
    pub fn has_edge(&self, a: VertexLabel, b: VertexLabel) -> bool {
        self.points_to(a, b) || self.points_to(b, a)
    }

    fn points_to(&self, source: VertexLabel, target: VertexLabel) -> bool {
        self.adjacency
            .get(&source)
            .is_some_and(|edges| edges.iter().any(|edge| edge.target == target))
    }

    /// Returns the edge set of `vertex`, creating an empty one if absent.
    fn ensure_vertex(&mut self, vertex: VertexLabel) -> &mut BTreeSet<Edge> {
        self.adjacency.entry(vertex).or_default()
    }

    /// Ensures `vertex` has an entry; returns `true` if it was created.
    fn materialise(&mut self, vertex: VertexLabel) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.adjacency.insert(vertex, BTreeSet::new());
        true
    }

    /// Total number of edges across all vertices.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Number of vertices, including destination-only vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns `true` when the graph holds no edges.
    #[must_use]
    pub fn has_no_edges(&self) -> bool {
        self.adjacency.values().all(BTreeSet::is_empty)
    }

    /// Iterates over vertices in ascending label order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexLabel> + '_ {
        self.adjacency.keys().copied()
    }

    /// Iterates over the outgoing edges of `vertex` in ascending order.
    pub fn edges_from(&self, vertex: VertexLabel) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.get(&vertex).into_iter().flatten()
    }

    /// Iterates over every edge, grouped by source in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.values().flatten()
    }

    /// Picks one existing vertex uniformly at random.
    pub fn random_vertex<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<VertexLabel> {
        if self.adjacency.is_empty() {
            return None;
        }
        let position = rng.gen_range(0..self.adjacency.len());
        self.adjacency.keys().nth(position).copied()
    }

    /// Adds every edge of `other` into `self`, skipping rejected edges.
    ///
    /// Returns the number of edges that were inserted. Merging the same graph
    /// twice inserts nothing the second time.
    pub fn merge(&mut self, other: &Self) -> usize {
        other
            .edges()
            .filter(|edge| self.add_edge(**edge))
            .count()
    }

    /// Returns `true` when every vertex is reachable from every other vertex
    /// with edges treated as undirected. Graphs without vertices count as
    /// connected.
    #[must_use]
    pub fn is_weakly_connected(&self) -> bool {
        let Some(start) = self.adjacency.keys().next().copied() else {
            return true;
        };
        let mut neighbours: BTreeMap<VertexLabel, Vec<VertexLabel>> = BTreeMap::new();
        for edge in self.edges() {
            neighbours.entry(edge.source).or_default().push(edge.target);
            neighbours.entry(edge.target).or_default().push(edge.source);
        }
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            for next in neighbours.get(&vertex).into_iter().flatten() {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen.len() == self.adjacency.len()
    }
}
