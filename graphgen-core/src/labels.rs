//! Vertex and edge label alphabets.
//!
//! Labels are carried through the generator as typed indices. Only the
//! serializer turns them into text, via [`LabelAlphabet`].

use rand::Rng;

/// Index of a vertex label within the configured alphabet.
///
/// Ordering follows the index, which matches the ordering of the rendered
/// names because they share a zero-padded width.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexLabel(usize);

impl VertexLabel {
    /// Wraps a zero-based vertex label index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge label within the configured alphabet.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeLabel(usize);

impl EdgeLabel {
    /// Wraps a zero-based edge label index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Fixed vertex and edge label sets shared by every generated graph.
///
/// # Examples
/// ```
/// use graphgen_core::{EdgeLabel, LabelAlphabet, VertexLabel};
///
/// let alphabet = LabelAlphabet::new(12, 3);
/// assert_eq!(alphabet.vertex_name(VertexLabel::new(0)), "V01");
/// assert_eq!(alphabet.edge_name(EdgeLabel::new(2)), "E03");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelAlphabet {
    vertex_count: usize,
    edge_count: usize,
    width: usize,
}

impl LabelAlphabet {
    /// Creates an alphabet with `vertex_count` vertex labels and `edge_count`
    /// edge labels.
    #[must_use]
    pub fn new(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertex_count,
            edge_count,
            width: digit_width(vertex_count),
        }
    }

    /// Number of distinct vertex labels.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of distinct edge labels.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterates over every vertex label in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexLabel> + '_ {
        (0..self.vertex_count).map(VertexLabel)
    }

    /// Draws a vertex label uniformly at random.
    pub fn random_vertex<R: Rng + ?Sized>(&self, rng: &mut R) -> VertexLabel {
        VertexLabel(rng.gen_range(0..self.vertex_count))
    }

    /// Draws an edge label uniformly at random.
    pub fn random_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> EdgeLabel {
        EdgeLabel(rng.gen_range(0..self.edge_count))
    }

    /// Renders a vertex label, e.g. `V007`.
    #[must_use]
    pub fn vertex_name(&self, label: VertexLabel) -> String {
        format!("V{:0width$}", label.0 + 1, width = self.width)
    }

    /// Renders an edge label.
    ///
    /// A single-label alphabet renders as a blank so that unlabeled edges do
    /// not carry a meaningless `E1`.
    #[must_use]
    pub fn edge_name(&self, label: EdgeLabel) -> String {
        if self.edge_count <= 1 {
            return " ".to_owned();
        }
        format!("E{:0width$}", label.0 + 1, width = self.width)
    }
}

/// Number of decimal digits needed to print `value`.
///
/// # Examples
/// ```
/// use graphgen_core::digit_width;
///
/// assert_eq!(digit_width(9), 1);
/// assert_eq!(digit_width(40), 2);
/// assert_eq!(digit_width(100_000), 6);
/// ```
#[must_use]
pub fn digit_width(value: usize) -> usize {
    value.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}
