//! Pattern synthesis by randomised incremental attachment.
//!
//! Each pattern starts from a single seed edge and grows by attaching a
//! fresh vertex from its candidate pool to a uniformly chosen vertex already
//! in the pattern. Attachment always touches the existing pattern, so the
//! result is weakly connected.

use rand::Rng;
use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    config::GeneratorConfig,
    error::RetryStage,
    graph::{Edge, LabeledGraph},
    labels::{LabelAlphabet, VertexLabel},
    retry::RetryBudget,
    sampling::{
        MIN_TARGET_EDGES, SizeDistribution, binomial, round_half_even, sample_distinct,
        sample_without_adjacent_repeats,
    },
};

/// A small connected template graph and the edge count it was drawn for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    graph: LabeledGraph,
    target_edges: usize,
}

impl Pattern {
    /// The pattern graph.
    #[must_use]
    pub const fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    /// Edge count originally drawn for this pattern.
    #[must_use]
    pub const fn target_edges(&self) -> usize {
        self.target_edges
    }
}

/// Grows the requested number of patterns for a configuration.
///
/// # Examples
/// ```
/// use graphgen_core::{GeneratorConfig, PatternSynthesizer};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let config = GeneratorConfig::builder().build().expect("defaults are valid");
/// let alphabet = config.alphabet();
/// let mut rng = SmallRng::seed_from_u64(42);
/// let patterns = PatternSynthesizer::new(&config, &alphabet)
///     .synthesize(&mut rng)
///     .expect("defaults never exhaust the retry budget");
/// assert_eq!(patterns.len(), 4);
/// assert!(patterns.iter().all(|p| p.graph().is_weakly_connected()));
/// ```
#[derive(Debug)]
pub struct PatternSynthesizer<'a> {
    config: &'a GeneratorConfig,
    alphabet: &'a LabelAlphabet,
}

impl<'a> PatternSynthesizer<'a> {
    /// Binds the synthesizer to a configuration and its label alphabet.
    #[must_use]
    pub const fn new(config: &'a GeneratorConfig, alphabet: &'a LabelAlphabet) -> Self {
        Self { config, alphabet }
    }

    /// Distribution of pattern target sizes.
    ///
    /// The deviation is `min(max(2, round(I / 4)), round((T - I) / 4))`,
    /// keeping patterns well below the dataset graph size `T`.
    #[must_use]
    pub fn size_distribution(&self) -> SizeDistribution {
        let mean = self.config.avg_pattern_size() as f64;
        let headroom = self.config.avg_graph_size() as f64 - mean;
        let spread = round_half_even(mean / 4.0).max(MIN_TARGET_EDGES as f64);
        SizeDistribution {
            mean,
            std_dev: spread.min(round_half_even(headroom / 4.0)),
        }
    }

    /// Whether there are comfortably more distinct label combinations than
    /// requested patterns, i.e. `C(V, I) > L`.
    #[must_use]
    pub fn has_distinct_vertex_space(&self) -> bool {
        binomial(self.config.vertex_labels(), self.config.avg_pattern_size())
            > self.config.pattern_count() as u128
    }

    /// Draws the target sizes and grows one pattern per size, smallest first.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryLimitExceeded`] when attachment
    /// keeps failing past the configured retry limit.
    #[instrument(
        name = "patterns.synthesize",
        err,
        skip(self, rng),
        fields(count = field::Empty, distinct = field::Empty),
    )]
    pub fn synthesize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Pattern>> {
        let mut targets = self.size_distribution().draw(
            rng,
            self.config.pattern_count(),
            self.config.max_target_edges(),
        )?;
        targets.sort_unstable();

        let distinct = self.has_distinct_vertex_space();
        let span = Span::current();
        span.record("count", targets.len());
        span.record("distinct", distinct);

        let mut patterns = Vec::with_capacity(targets.len());
        for (position, target_edges) in targets.into_iter().enumerate() {
            let graph = self.grow(rng, target_edges, distinct)?;
            debug!(
                pattern = position + 1,
                target_edges,
                edges = graph.edge_count(),
                vertices = graph.vertex_count(),
                "pattern grown"
            );
            patterns.push(Pattern {
                graph,
                target_edges,
            });
        }
        Ok(patterns)
    }

    /// Grows a single connected pattern with `target_edges` attachments.
    fn grow<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        target_edges: usize,
        distinct: bool,
    ) -> Result<LabeledGraph> {
        let mut pool = self.candidate_vertices(rng, target_edges, distinct);
        let mut graph = LabeledGraph::new(self.config.allow_loops());
        let (Some(first), Some(second)) = (pool.pop(), pool.pop()) else {
            return Ok(graph);
        };
        let seed = Edge::new(first, self.alphabet.random_edge(rng), second);
        graph.add_edge(seed);

        let mut budget = RetryBudget::new(RetryStage::PatternGrowth, self.config.retry_limit());
        while let Some(vertex) = pool.pop() {
            if !can_attach(&graph, vertex) {
                // Every pattern vertex already touches this label.
                debug!(vertex = vertex.index(), "candidate saturated, redrawing");
                pool.push(self.alphabet.random_vertex(rng));
                budget.reject()?;
                continue;
            }
            let Some(anchor) = graph.random_vertex(rng) else {
                break;
            };
            let accepted = graph.add_edge(Edge::new(anchor, self.alphabet.random_edge(rng), vertex));
            if !accepted {
                pool.push(vertex);
            }
            budget.record(accepted)?;
        }
        Ok(graph)
    }

    /// Picks `max(2, target_edges + 1)` candidate vertices.
    ///
    /// Distinct labels are used when the label space allows it; otherwise
    /// only consecutive picks are guaranteed to differ.
    fn candidate_vertices<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        target_edges: usize,
        distinct: bool,
    ) -> Vec<VertexLabel> {
        let labels = self.alphabet.vertex_count();
        let vertex_count = (target_edges + 1).max(2);
        let indices = if distinct && vertex_count <= labels {
            sample_distinct(rng, labels, vertex_count)
        } else {
            sample_without_adjacent_repeats(rng, labels, vertex_count)
        };
        indices.into_iter().map(VertexLabel::new).collect()
    }
}

/// Whether some pattern vertex could still accept an edge to `vertex`.
fn can_attach(graph: &LabeledGraph, vertex: VertexLabel) -> bool {
    graph
        .vertices()
        .any(|anchor| (anchor != vertex || graph.allows_loops()) && !graph.has_edge(anchor, vertex))
}
