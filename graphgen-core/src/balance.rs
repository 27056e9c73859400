//! Size balancing for the dataset after embedding.
//!
//! Balancing runs in two phases. The fill phase gives every still-empty graph
//! a seed edge and grows it from its own vertices towards a drawn target
//! size. The global correction phase then adds random edges to random graphs
//! when the realised dataset average falls short of the requested average by
//! more than one edge. Edges are only ever added.

use rand::Rng;
use tracing::{Span, debug, field, info, instrument};

use crate::{
    Result,
    config::GeneratorConfig,
    dataset::Dataset,
    error::RetryStage,
    graph::{Edge, LabeledGraph},
    labels::LabelAlphabet,
    retry::RetryBudget,
    sampling::{MIN_TARGET_EDGES, SizeDistribution, round_half_even},
};

/// Averages and edge counts observed while balancing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BalanceReport {
    /// Dataset average before the fill phase.
    pub average_before_fill: f64,
    /// Number of empty graphs the fill phase populated.
    pub filled_graphs: usize,
    /// Dataset average after the fill phase.
    pub average_after_fill: f64,
    /// Edges added by the global correction phase.
    pub correction_edges: usize,
    /// Dataset average once balancing finished.
    pub final_average: f64,
}

/// Total edges the correction phase must add for a dataset average.
///
/// Returns `round(T - average) * D` when that rounded deficit exceeds one
/// edge, otherwise zero.
///
/// # Examples
/// ```
/// use graphgen_core::correction_edges;
///
/// assert_eq!(correction_edges(9, 6.2, 40), 120);
/// assert_eq!(correction_edges(9, 7.6, 40), 0);
/// assert_eq!(correction_edges(9, 12.0, 40), 0);
/// ```
#[must_use]
pub fn correction_edges(target: usize, average: f64, dataset_len: usize) -> usize {
    let deficit = round_half_even(target as f64 - average);
    if deficit > 1.0 {
        (deficit as usize).saturating_mul(dataset_len)
    } else {
        0
    }
}

/// Brings every dataset graph to a non-zero size and nudges the average
/// towards the configured target.
#[derive(Debug)]
pub struct SizeBalancer<'a> {
    config: &'a GeneratorConfig,
    alphabet: &'a LabelAlphabet,
}

impl<'a> SizeBalancer<'a> {
    #[must_use]
    pub const fn new(config: &'a GeneratorConfig, alphabet: &'a LabelAlphabet) -> Self {
        Self { config, alphabet }
    }

    /// Distribution of fill targets given the currently observed average.
    ///
    /// The deviation is `min(max(2, round((T - average) / 4)), round(T / 4))`.
    #[must_use]
    pub fn fill_distribution(&self, observed_average: f64) -> SizeDistribution {
        let mean = self.config.avg_graph_size() as f64;
        let spread = round_half_even((mean - observed_average) / 4.0).max(MIN_TARGET_EDGES as f64);
        SizeDistribution {
            mean,
            std_dev: spread.min(round_half_even(mean / 4.0)),
        }
    }

    /// Runs the fill phase followed by the global correction phase.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryLimitExceeded`] if any insertion
    /// loop exceeds the configured retry limit.
    #[instrument(
        name = "dataset.balance",
        err,
        skip(self, rng, dataset),
        fields(filled = field::Empty, correction_edges = field::Empty),
    )]
    pub fn balance<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dataset: &mut Dataset,
    ) -> Result<BalanceReport> {
        let average_before_fill = dataset.average_edge_count();
        let filled_graphs = self.fill(rng, dataset, average_before_fill)?;
        let average_after_fill = dataset.average_edge_count();

        let needed = correction_edges(
            self.config.avg_graph_size(),
            average_after_fill,
            dataset.len(),
        );
        if needed > 0 {
            info!(
                average = average_after_fill,
                target = self.config.avg_graph_size(),
                edges = needed,
                "dataset average below target, correcting"
            );
            self.correct(rng, dataset, needed)?;
        }

        let span = Span::current();
        span.record("filled", filled_graphs);
        span.record("correction_edges", needed);
        Ok(BalanceReport {
            average_before_fill,
            filled_graphs,
            average_after_fill,
            correction_edges: needed,
            final_average: dataset.average_edge_count(),
        })
    }

    /// Populates every empty graph; returns how many were filled.
    fn fill<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dataset: &mut Dataset,
        observed_average: f64,
    ) -> Result<usize> {
        let empty = dataset.empty_graph_indices();
        let targets = self.fill_distribution(observed_average).draw(
            rng,
            empty.len(),
            self.config.max_target_edges(),
        )?;
        for (&index, &target) in empty.iter().zip(&targets) {
            let Some(graph) = dataset.get_mut(index) else {
                continue;
            };
            self.seed(rng, graph)?;
            self.grow(rng, graph, target)?;
            debug!(graph = index + 1, target, edges = graph.edge_count(), "graph filled");
        }
        Ok(empty.len())
    }

    /// Inserts one fully random edge into an empty graph.
    fn seed<R: Rng + ?Sized>(&self, rng: &mut R, graph: &mut LabeledGraph) -> Result<()> {
        let mut budget = RetryBudget::new(RetryStage::FillSeed, self.config.retry_limit());
        loop {
            let edge = Edge::new(
                self.alphabet.random_vertex(rng),
                self.alphabet.random_edge(rng),
                self.alphabet.random_vertex(rng),
            );
            if graph.add_edge(edge) {
                return Ok(());
            }
            budget.reject()?;
        }
    }

    /// Adds edges from existing vertices until the graph holds `target`
    /// edges. The seed edge counts towards the target.
    fn grow<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        graph: &mut LabeledGraph,
        target: usize,
    ) -> Result<()> {
        let mut budget = RetryBudget::new(RetryStage::Fill, self.config.retry_limit());
        let mut additions = 1;
        while additions < target {
            let accepted = self.try_extend(rng, graph);
            if accepted {
                additions += 1;
            }
            budget.record(accepted)?;
        }
        Ok(())
    }

    /// Adds `needed` edges spread over uniformly chosen graphs.
    fn correct<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dataset: &mut Dataset,
        needed: usize,
    ) -> Result<()> {
        let mut budget = RetryBudget::new(RetryStage::GlobalCorrection, self.config.retry_limit());
        let mut additions = 0;
        while additions < needed {
            let accepted = dataset
                .random_graph_mut(rng)
                .is_some_and(|graph| self.try_extend(rng, graph));
            if accepted {
                additions += 1;
            }
            budget.record(accepted)?;
        }
        Ok(())
    }

    /// One attempt at an edge from an existing vertex to a random label.
    fn try_extend<R: Rng + ?Sized>(&self, rng: &mut R, graph: &mut LabeledGraph) -> bool {
        let Some(source) = graph.random_vertex(rng) else {
            return false;
        };
        let target = self.alphabet.random_vertex(rng);
        let label = self.alphabet.random_edge(rng);
        graph.add_edge(Edge::new(source, label, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::{
        GraphGenError,
        config::GeneratorConfigBuilder,
        labels::{EdgeLabel, VertexLabel},
    };

    fn balance(config: &GeneratorConfig, dataset: &mut Dataset, seed: u64) -> BalanceReport {
        let alphabet = config.alphabet();
        let mut rng = SmallRng::seed_from_u64(seed);
        SizeBalancer::new(config, &alphabet)
            .balance(&mut rng, dataset)
            .expect("balancing must succeed")
    }

    #[rstest]
    #[case::far_below(9, 6.2, 40, 120)]
    #[case::one_edge_short(9, 8.0, 40, 0)]
    #[case::half_way_rounds_even(9, 6.5, 10, 20)]
    #[case::above_target(9, 15.0, 40, 0)]
    fn correction_triggers_on_rounded_deficit(
        #[case] target: usize,
        #[case] average: f64,
        #[case] dataset_len: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(correction_edges(target, average, dataset_len), expected);
    }

    #[rstest]
    #[case::empty_dataset(0.0, 2.0)]
    #[case::half_full(5.0, 2.0)]
    #[case::overfull(20.0, 2.0)]
    fn fill_deviation_is_bounded(#[case] observed: f64, #[case] expected: f64) {
        let config = GeneratorConfig::builder()
            .build()
            .expect("defaults are valid");
        let alphabet = config.alphabet();
        let distribution = SizeBalancer::new(&config, &alphabet).fill_distribution(observed);
        assert_eq!(distribution.mean, 9.0);
        assert_eq!(distribution.std_dev, expected);
    }

    #[test]
    fn fill_deviation_caps_at_quarter_target() {
        let config = GeneratorConfigBuilder::new()
            .with_vertex_labels(60)
            .with_avg_graph_size(40)
            .build()
            .expect("configuration is valid");
        let alphabet = config.alphabet();
        let distribution = SizeBalancer::new(&config, &alphabet).fill_distribution(0.0);
        assert_eq!(distribution.std_dev, 10.0);
    }

    #[test]
    fn fill_leaves_no_graph_empty() {
        let config = GeneratorConfig::builder()
            .build()
            .expect("defaults are valid");
        let mut dataset = Dataset::empty(config.dataset_len(), config.allow_loops());
        let report = balance(&config, &mut dataset, 8);

        assert_eq!(report.filled_graphs, config.dataset_len());
        assert_eq!(report.average_before_fill, 0.0);
        assert!(dataset.empty_graph_indices().is_empty());
        for graph in &dataset {
            assert!(graph.edge_count() >= MIN_TARGET_EDGES);
            assert!(graph.edges().all(|edge| !edge.is_loop()));
        }
    }

    #[test]
    fn correction_raises_the_average() {
        let config = GeneratorConfigBuilder::new()
            .with_vertex_labels(30)
            .with_avg_graph_size(20)
            .with_avg_pattern_size(4)
            .build()
            .expect("configuration is valid");
        let mut dataset = Dataset::empty(config.dataset_len(), config.allow_loops());
        let edge = Edge::new(VertexLabel::new(0), EdgeLabel::new(0), VertexLabel::new(1));
        for index in 0..dataset.len() {
            let graph = dataset.get_mut(index).expect("slot exists");
            assert!(graph.add_edge(edge));
        }

        let report = balance(&config, &mut dataset, 21);

        assert_eq!(report.filled_graphs, 0);
        assert_eq!(report.average_after_fill, 1.0);
        assert_eq!(report.correction_edges, 19 * config.dataset_len());
        assert_eq!(report.final_average, 20.0);
    }

    #[test]
    fn saturated_dataset_hits_retry_limit() {
        let config = GeneratorConfigBuilder::new()
            .with_vertex_labels(3)
            .with_edge_labels(1)
            .with_avg_pattern_size(2)
            .with_avg_graph_size(5)
            .with_retry_limit(NonZeroUsize::new(500))
            .build()
            .expect("configuration is valid");
        let alphabet = config.alphabet();
        let mut dataset = Dataset::empty(config.dataset_len(), config.allow_loops());
        let mut rng = SmallRng::seed_from_u64(2);
        let err = SizeBalancer::new(&config, &alphabet)
            .balance(&mut rng, &mut dataset)
            .expect_err("three labels cannot hold five edges per graph");
        assert_eq!(
            err,
            GraphGenError::RetryLimitExceeded {
                stage: RetryStage::GlobalCorrection,
                attempts: 500,
            }
        );
    }
}
