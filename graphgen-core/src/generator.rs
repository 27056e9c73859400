//! End-to-end dataset generation.

use rand::Rng;
use tracing::{info, instrument};

use crate::{
    Result,
    balance::{BalanceReport, SizeBalancer},
    config::GeneratorConfig,
    dataset::Dataset,
    embed::{EmbeddingReport, SupportEmbedder},
    labels::LabelAlphabet,
    pattern::{Pattern, PatternSynthesizer},
};

/// Everything produced by a single generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    alphabet: LabelAlphabet,
    patterns: Vec<Pattern>,
    dataset: Dataset,
    embedding: EmbeddingReport,
    balance: BalanceReport,
}

impl Generation {
    /// Label alphabet used for every graph in this run.
    #[must_use]
    pub const fn alphabet(&self) -> &LabelAlphabet {
        &self.alphabet
    }

    /// Patterns in ascending target-size order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The balanced dataset.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Where each pattern was embedded.
    #[must_use]
    pub const fn embedding(&self) -> &EmbeddingReport {
        &self.embedding
    }

    /// Averages observed while balancing.
    #[must_use]
    pub const fn balance(&self) -> &BalanceReport {
        &self.balance
    }
}

/// Runs synthesis, embedding and balancing for a validated configuration.
///
/// # Examples
/// ```
/// use graphgen_core::{GeneratorConfig, GraphGenerator};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let config = GeneratorConfig::builder().build().expect("defaults are valid");
/// let mut rng = SmallRng::seed_from_u64(7);
/// let generation = GraphGenerator::new(&config)
///     .generate(&mut rng)
///     .expect("generation succeeds");
/// assert_eq!(generation.patterns().len(), 4);
/// assert_eq!(generation.dataset().len(), 40);
/// assert!(generation.dataset().empty_graph_indices().is_empty());
/// ```
#[derive(Debug)]
pub struct GraphGenerator<'a> {
    config: &'a GeneratorConfig,
    alphabet: LabelAlphabet,
}

impl<'a> GraphGenerator<'a> {
    /// Prepares a generator and its label alphabet.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            alphabet: config.alphabet(),
        }
    }

    /// Produces patterns and a balanced dataset.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryLimitExceeded`] when a sampling
    /// loop exhausts the configured retry limit, or
    /// [`crate::GraphGenError::InvalidSizeDistribution`] if a size
    /// distribution cannot be built.
    #[instrument(
        name = "generator.generate",
        err,
        skip(self, rng),
        fields(
            dataset_len = self.config.dataset_len(),
            patterns = self.config.pattern_count(),
            directed = self.config.directed(),
        ),
    )]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Generation> {
        let patterns = PatternSynthesizer::new(self.config, &self.alphabet).synthesize(rng)?;

        let mut dataset = Dataset::empty(self.config.dataset_len(), self.config.allow_loops());
        let embedding = SupportEmbedder::new(self.config).embed(rng, &patterns, &mut dataset);
        info!(
            covered = embedding.covered().len(),
            average = dataset.average_edge_count(),
            "patterns embedded"
        );

        let balance = SizeBalancer::new(self.config, &self.alphabet).balance(rng, &mut dataset)?;
        info!(
            filled = balance.filled_graphs,
            average = balance.final_average,
            "dataset balanced"
        );

        Ok(Generation {
            alphabet: self.alphabet.clone(),
            patterns,
            dataset,
            embedding,
            balance,
        })
    }
}
