//! Support embedding: merging each pattern into a random subset of graphs.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{Span, debug, field, instrument};

use crate::{
    config::GeneratorConfig,
    dataset::Dataset,
    pattern::Pattern,
    sampling::{round_half_even, sample_distinct},
};

/// Width of the random band added on top of the minimum support.
pub const SUPPORT_SPREAD: f64 = 0.1;

/// Where a single pattern ended up.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    number: usize,
    target_edges: usize,
    support: f64,
    graphs: Vec<usize>,
}

impl Placement {
    /// One-based pattern number, following the ascending size order.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Edge count drawn for the pattern.
    #[must_use]
    pub const fn target_edges(&self) -> usize {
        self.target_edges
    }

    /// Support ratio drawn for the pattern, in `[min_support, min_support + 0.1)`.
    #[must_use]
    pub const fn support(&self) -> f64 {
        self.support
    }

    /// Zero-based slot indices that received the pattern, ascending.
    #[must_use]
    pub fn graphs(&self) -> &[usize] {
        &self.graphs
    }
}

/// Outcome of embedding every pattern.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmbeddingReport {
    placements: Vec<Placement>,
    covered: Vec<usize>,
}

impl EmbeddingReport {
    /// Per-pattern placements in pattern order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Zero-based indices of graphs holding at least one pattern, ascending.
    #[must_use]
    pub fn covered(&self) -> &[usize] {
        &self.covered
    }
}

/// Merges patterns into dataset graphs according to a drawn support ratio.
#[derive(Debug)]
pub struct SupportEmbedder<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> SupportEmbedder<'a> {
    #[must_use]
    pub const fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Number of graphs selected for a support ratio: `round(D * support)`,
    /// never more than `D`.
    #[must_use]
    pub fn selection_len(&self, support: f64) -> usize {
        let dataset_len = self.config.dataset_len();
        let wanted = round_half_even(dataset_len as f64 * support).max(0.0);
        (wanted as usize).min(dataset_len)
    }

    /// Embeds each pattern, in order, into its own random selection of
    /// graphs. Selections of different patterns may overlap.
    #[instrument(
        name = "patterns.embed",
        skip(self, rng, patterns, dataset),
        fields(patterns = patterns.len(), covered = field::Empty),
    )]
    pub fn embed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        patterns: &[Pattern],
        dataset: &mut Dataset,
    ) -> EmbeddingReport {
        let mut placements = Vec::with_capacity(patterns.len());
        let mut covered = BTreeSet::new();
        for (position, pattern) in patterns.iter().enumerate() {
            let support = rng.gen_range(0.0..SUPPORT_SPREAD) + self.config.min_support();
            let amount = self.selection_len(support).min(dataset.len());
            let mut graphs = sample_distinct(rng, dataset.len(), amount);
            graphs.sort_unstable();

            for &index in &graphs {
                if let Some(graph) = dataset.get_mut(index) {
                    graph.merge(pattern.graph());
                }
            }
            covered.extend(graphs.iter().copied());
            debug!(
                pattern = position + 1,
                support,
                graphs = graphs.len(),
                "pattern embedded"
            );
            placements.push(Placement {
                number: position + 1,
                target_edges: pattern.target_edges(),
                support,
                graphs,
            });
        }
        Span::current().record("covered", covered.len());
        EmbeddingReport {
            placements,
            covered: covered.into_iter().collect(),
        }
    }
}
