//! The fixed-length collection of dataset graphs.

use rand::Rng;

use crate::graph::LabeledGraph;

/// Dataset graphs addressed by zero-based slot index.
///
/// Slots are created empty and only ever gain edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    graphs: Vec<LabeledGraph>,
}

impl Dataset {
    /// Creates `len` empty graphs sharing the same loop policy.
    #[must_use]
    pub fn empty(len: usize, allow_loops: bool) -> Self {
        Self {
            graphs: vec![LabeledGraph::new(allow_loops); len],
        }
    }

    /// Number of graph slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns `true` when the dataset has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Graph stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LabeledGraph> {
        self.graphs.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut LabeledGraph> {
        self.graphs.get_mut(index)
    }

    pub(crate) fn random_graph_mut<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<&mut LabeledGraph> {
        if self.graphs.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.graphs.len());
        self.graphs.get_mut(index)
    }

    /// Iterates over the graphs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &LabeledGraph> + '_ {
        self.graphs.iter()
    }

    /// Sum of edge counts over every graph.
    #[must_use]
    pub fn total_edges(&self) -> usize {
        self.graphs.iter().map(LabeledGraph::edge_count).sum()
    }

    /// Mean edge count per graph; zero for an empty dataset.
    #[must_use]
    pub fn average_edge_count(&self) -> f64 {
        if self.graphs.is_empty() {
            return 0.0;
        }
        self.total_edges() as f64 / self.graphs.len() as f64
    }

    /// Slot indices of graphs without any edge, ascending.
    #[must_use]
    pub fn empty_graph_indices(&self) -> Vec<usize> {
        self.graphs
            .iter()
            .enumerate()
            .filter_map(|(index, graph)| graph.has_no_edges().then_some(index))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledGraph;
    type IntoIter = std::slice::Iter<'a, LabeledGraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs.iter()
    }
}
