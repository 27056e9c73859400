//! Generator configuration and its up-front validation pass.
//!
//! [`GeneratorConfigBuilder`] accepts raw values and [`GeneratorConfigBuilder::build`]
//! checks every rule before returning an immutable [`GeneratorConfig`]. All
//! broken rules are reported together.

use std::num::NonZeroUsize;

use crate::{
    Result,
    error::{ConfigViolation, GraphGenError},
    labels::LabelAlphabet,
};

const DEFAULT_MIN_SUPPORT: f64 = 0.1;
const DEFAULT_DATASET_LEN: usize = 40;
const DEFAULT_PATTERN_COUNT: usize = 4;
const DEFAULT_EDGE_LABELS: usize = 2;
const DEFAULT_VERTEX_LABELS: usize = 8;
const DEFAULT_AVG_GRAPH_SIZE: usize = 9;
const DEFAULT_AVG_PATTERN_SIZE: usize = 4;
/// Consecutive rejected insertions tolerated before a retry loop gives up.
pub const DEFAULT_RETRY_LIMIT: NonZeroUsize = NonZeroUsize::MIN.saturating_add(999_999);

const MIN_SUPPORT_RANGE: (f64, f64) = (0.01, 0.50);
const DATASET_LEN_RANGE: (usize, usize) = (10, 100_000);
const EDGE_LABELS_RANGE: (usize, usize) = (1, 99);
const VERTEX_LABELS_RANGE: (usize, usize) = (2, 999);
const AVG_GRAPH_SIZE_RANGE: (usize, usize) = (5, 100);
const AVG_PATTERN_SIZE_RANGE: (usize, usize) = (2, 40);

/// Validated, immutable generator parameters.
///
/// Built through [`GeneratorConfigBuilder`]; every generation component takes
/// it by reference.
///
/// # Examples
/// ```
/// use graphgen_core::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .with_dataset_len(100)
///     .with_pattern_count(5)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.dataset_len(), 100);
/// assert_eq!(config.pattern_count(), 5);
/// assert!(config.directed());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    min_support: f64,
    dataset_len: usize,
    pattern_count: usize,
    edge_labels: usize,
    vertex_labels: usize,
    avg_graph_size: usize,
    avg_pattern_size: usize,
    directed: bool,
    allow_loops: bool,
    retry_limit: Option<NonZeroUsize>,
}

impl GeneratorConfig {
    /// Returns a builder populated with the default parameters.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Minimum support ratio of every embedded pattern.
    #[must_use]
    pub const fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Number of dataset graphs `D`.
    #[must_use]
    pub const fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    /// Number of distinct patterns `L`.
    #[must_use]
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of distinct edge labels `E`.
    #[must_use]
    pub const fn edge_labels(&self) -> usize {
        self.edge_labels
    }

    /// Number of distinct vertex labels `V`.
    #[must_use]
    pub const fn vertex_labels(&self) -> usize {
        self.vertex_labels
    }

    /// Requested average dataset graph size in edges.
    #[must_use]
    pub const fn avg_graph_size(&self) -> usize {
        self.avg_graph_size
    }

    /// Requested average pattern size in edges.
    #[must_use]
    pub const fn avg_pattern_size(&self) -> usize {
        self.avg_pattern_size
    }

    /// Whether generated graphs are directed.
    #[must_use]
    pub const fn directed(&self) -> bool {
        self.directed
    }

    /// Whether loop edges are accepted.
    #[must_use]
    pub const fn allow_loops(&self) -> bool {
        self.allow_loops
    }

    /// Maximum consecutive rejected insertions before a retry loop gives up.
    /// `None` retries forever.
    #[must_use]
    pub const fn retry_limit(&self) -> Option<NonZeroUsize> {
        self.retry_limit
    }

    /// Builds the label alphabet described by this configuration.
    #[must_use]
    pub fn alphabet(&self) -> LabelAlphabet {
        LabelAlphabet::new(self.vertex_labels, self.edge_labels)
    }

    /// Largest edge count a pattern or filled graph may target, `V - 2`.
    #[must_use]
    pub const fn max_target_edges(&self) -> usize {
        self.vertex_labels.saturating_sub(2)
    }
}

/// Collects raw generator parameters and validates them into a
/// [`GeneratorConfig`].
///
/// # Examples
/// ```
/// use graphgen_core::{ConfigViolationCode, GeneratorConfigBuilder};
///
/// let err = GeneratorConfigBuilder::new()
///     .with_min_support(0.55)
///     .with_vertex_labels(2)
///     .build()
///     .expect_err("two rules are broken");
/// let codes: Vec<_> = err.violations().iter().map(|v| v.code()).collect();
/// assert!(codes.contains(&ConfigViolationCode::MinSupportOutOfRange));
/// assert!(codes.contains(&ConfigViolationCode::TooFewVertexLabels));
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorConfigBuilder {
    min_support: f64,
    dataset_len: usize,
    pattern_count: usize,
    edge_labels: usize,
    vertex_labels: usize,
    avg_graph_size: usize,
    avg_pattern_size: usize,
    directed: bool,
    allow_loops: bool,
    retry_limit: Option<NonZeroUsize>,
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            dataset_len: DEFAULT_DATASET_LEN,
            pattern_count: DEFAULT_PATTERN_COUNT,
            edge_labels: DEFAULT_EDGE_LABELS,
            vertex_labels: DEFAULT_VERTEX_LABELS,
            avg_graph_size: DEFAULT_AVG_GRAPH_SIZE,
            avg_pattern_size: DEFAULT_AVG_PATTERN_SIZE,
            directed: true,
            allow_loops: false,
            retry_limit: Some(DEFAULT_RETRY_LIMIT),
        }
    }
}

impl GeneratorConfigBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum support ratio.
    #[must_use]
    pub const fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Overrides the number of dataset graphs.
    #[must_use]
    pub const fn with_dataset_len(mut self, dataset_len: usize) -> Self {
        self.dataset_len = dataset_len;
        self
    }

    /// Overrides the number of patterns.
    #[must_use]
    pub const fn with_pattern_count(mut self, pattern_count: usize) -> Self {
        self.pattern_count = pattern_count;
        self
    }

    /// Overrides the number of edge labels.
    #[must_use]
    pub const fn with_edge_labels(mut self, edge_labels: usize) -> Self {
        self.edge_labels = edge_labels;
        self
    }

    /// Overrides the number of vertex labels.
    #[must_use]
    pub const fn with_vertex_labels(mut self, vertex_labels: usize) -> Self {
        self.vertex_labels = vertex_labels;
        self
    }

    /// Overrides the average dataset graph size.
    #[must_use]
    pub const fn with_avg_graph_size(mut self, avg_graph_size: usize) -> Self {
        self.avg_graph_size = avg_graph_size;
        self
    }

    /// Overrides the average pattern size.
    #[must_use]
    pub const fn with_avg_pattern_size(mut self, avg_pattern_size: usize) -> Self {
        self.avg_pattern_size = avg_pattern_size;
        self
    }

    /// Selects directed or undirected output graphs.
    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Allows or forbids loop edges.
    #[must_use]
    pub const fn with_allow_loops(mut self, allow_loops: bool) -> Self {
        self.allow_loops = allow_loops;
        self
    }

    /// Caps consecutive rejected insertions in the open-ended retry loops.
    /// `None` lets them retry until they succeed.
    #[must_use]
    pub const fn with_retry_limit(mut self, retry_limit: Option<NonZeroUsize>) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Validates every rule and constructs a [`GeneratorConfig`].
    ///
    /// # Errors
    /// Returns [`GraphGenError::InvalidConfig`] listing every violated rule.
    pub fn build(self) -> Result<GeneratorConfig> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(GraphGenError::InvalidConfig { violations });
        }
        Ok(GeneratorConfig {
            min_support: self.min_support,
            dataset_len: self.dataset_len,
            pattern_count: self.pattern_count,
            edge_labels: self.edge_labels,
            vertex_labels: self.vertex_labels,
            avg_graph_size: self.avg_graph_size,
            avg_pattern_size: self.avg_pattern_size,
            directed: self.directed,
            allow_loops: self.allow_loops,
            retry_limit: self.retry_limit,
        })
    }

    fn violations(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        if !in_range(self.edge_labels, EDGE_LABELS_RANGE) {
            violations.push(ConfigViolation::EdgeLabelsOutOfRange {
                got: self.edge_labels,
            });
        }
        if !in_range(self.vertex_labels, VERTEX_LABELS_RANGE) {
            violations.push(ConfigViolation::VertexLabelsOutOfRange {
                got: self.vertex_labels,
            });
        }
        if self.vertex_labels < self.edge_labels.saturating_add(1) {
            violations.push(ConfigViolation::TooFewVertexLabels {
                vertex_labels: self.vertex_labels,
                edge_labels: self.edge_labels,
            });
        }
        if !in_range(self.dataset_len, DATASET_LEN_RANGE) {
            violations.push(ConfigViolation::DatasetLenOutOfRange {
                got: self.dataset_len,
            });
        }
        if !(MIN_SUPPORT_RANGE.0..=MIN_SUPPORT_RANGE.1).contains(&self.min_support) {
            violations.push(ConfigViolation::MinSupportOutOfRange {
                got: self.min_support,
            });
        }
        if self.pattern_count > self.dataset_len {
            violations.push(ConfigViolation::TooManyPatterns {
                patterns: self.pattern_count,
                dataset_len: self.dataset_len,
            });
        }
        if !in_range(self.avg_graph_size, AVG_GRAPH_SIZE_RANGE) {
            violations.push(ConfigViolation::AvgGraphSizeOutOfRange {
                got: self.avg_graph_size,
            });
        }
        if !in_range(self.avg_pattern_size, AVG_PATTERN_SIZE_RANGE) {
            violations.push(ConfigViolation::AvgPatternSizeOutOfRange {
                got: self.avg_pattern_size,
            });
        }
        if self.avg_pattern_size >= self.avg_graph_size {
            violations.push(ConfigViolation::PatternNotSmallerThanGraph {
                pattern_size: self.avg_pattern_size,
                graph_size: self.avg_graph_size,
            });
        }
        if self.support_is_inconsistent() {
            violations.push(ConfigViolation::InconsistentSupport {
                min_support: self.min_support,
                dataset_len: self.dataset_len,
                patterns: self.pattern_count,
            });
        }
        if let Some(limit) = self.pattern_space_limit()
            && self.pattern_count as u128 > limit
        {
            violations.push(ConfigViolation::PatternSpaceExhausted {
                patterns: self.pattern_count,
                limit: limit.to_string(),
            });
        }
        violations
    }

    fn support_is_inconsistent(&self) -> bool {
        let dataset_len = self.dataset_len as f64;
        dataset_len < self.min_support * dataset_len * self.pattern_count as f64
    }

    /// Returns `2^(V·E)` when it fits in a `u128`; larger bounds can never be
    /// reached by a valid pattern count.
    fn pattern_space_limit(&self) -> Option<u128> {
        let exponent = self.vertex_labels.checked_mul(self.edge_labels)?;
        let exponent = u32::try_from(exponent).ok()?;
        1_u128.checked_shl(exponent)
    }
}

fn in_range(value: usize, (low, high): (usize, usize)) -> bool {
    (low..=high).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::error::ConfigViolationCode;

    fn codes(builder: GeneratorConfigBuilder) -> Vec<ConfigViolationCode> {
        builder.violations().iter().map(ConfigViolation::code).collect()
    }

    #[test]
    fn defaults_are_valid() {
        let config = GeneratorConfigBuilder::new()
            .build()
            .expect("defaults must validate");
        assert_eq!(config.dataset_len(), 40);
        assert_eq!(config.pattern_count(), 4);
        assert_eq!(config.vertex_labels(), 8);
        assert_eq!(config.edge_labels(), 2);
        assert_eq!(config.max_target_edges(), 6);
        assert!(config.directed());
        assert!(!config.allow_loops());
        assert_eq!(config.retry_limit(), Some(DEFAULT_RETRY_LIMIT));
        assert_eq!(DEFAULT_RETRY_LIMIT.get(), 1_000_000);
    }

    #[rstest]
    #[case::support_too_high(
        GeneratorConfigBuilder::new().with_min_support(0.55).with_pattern_count(1),
        ConfigViolationCode::MinSupportOutOfRange,
    )]
    #[case::support_nan(
        GeneratorConfigBuilder::new().with_min_support(f64::NAN),
        ConfigViolationCode::MinSupportOutOfRange,
    )]
    #[case::few_vertex_labels(
        GeneratorConfigBuilder::new().with_vertex_labels(3).with_edge_labels(3),
        ConfigViolationCode::TooFewVertexLabels,
    )]
    #[case::too_many_patterns(
        GeneratorConfigBuilder::new().with_min_support(0.01).with_pattern_count(41),
        ConfigViolationCode::TooManyPatterns,
    )]
    #[case::zero_edge_labels(
        GeneratorConfigBuilder::new().with_edge_labels(0).with_pattern_count(1),
        ConfigViolationCode::EdgeLabelsOutOfRange,
    )]
    #[case::tiny_dataset(
        GeneratorConfigBuilder::new().with_dataset_len(9).with_pattern_count(1),
        ConfigViolationCode::DatasetLenOutOfRange,
    )]
    #[case::huge_graphs(
        GeneratorConfigBuilder::new().with_avg_graph_size(101),
        ConfigViolationCode::AvgGraphSizeOutOfRange,
    )]
    #[case::pattern_as_large_as_graph(
        GeneratorConfigBuilder::new().with_avg_pattern_size(9),
        ConfigViolationCode::PatternNotSmallerThanGraph,
    )]
    #[case::support_overcommitted(
        GeneratorConfigBuilder::new().with_min_support(0.5).with_pattern_count(3),
        ConfigViolationCode::InconsistentSupport,
    )]
    fn single_rule_violations_are_reported(
        #[case] builder: GeneratorConfigBuilder,
        #[case] expected: ConfigViolationCode,
    ) {
        assert_eq!(codes(builder), vec![expected]);
    }

    #[test]
    fn every_violation_is_collected() {
        let builder = GeneratorConfigBuilder::new()
            .with_min_support(0.9)
            .with_dataset_len(5)
            .with_pattern_count(6)
            .with_edge_labels(100)
            .with_avg_pattern_size(50);
        let found = codes(builder);
        for code in [
            ConfigViolationCode::EdgeLabelsOutOfRange,
            ConfigViolationCode::TooFewVertexLabels,
            ConfigViolationCode::DatasetLenOutOfRange,
            ConfigViolationCode::MinSupportOutOfRange,
            ConfigViolationCode::TooManyPatterns,
            ConfigViolationCode::AvgPatternSizeOutOfRange,
            ConfigViolationCode::PatternNotSmallerThanGraph,
        ] {
            assert!(found.contains(&code), "missing {code}");
        }
    }

    #[test]
    fn pattern_space_limit_is_checked_without_overflow() {
        let builder = GeneratorConfigBuilder::new()
            .with_vertex_labels(999)
            .with_edge_labels(99);
        assert_eq!(builder.pattern_space_limit(), None);
        assert!(codes(builder).is_empty());

        let small = GeneratorConfigBuilder::new()
            .with_vertex_labels(2)
            .with_edge_labels(1);
        assert_eq!(small.pattern_space_limit(), Some(4));
    }

    #[test]
    fn pattern_space_violation_reports_limit() {
        let builder = GeneratorConfigBuilder::new()
            .with_vertex_labels(2)
            .with_edge_labels(1)
            .with_dataset_len(100)
            .with_pattern_count(5)
            .with_min_support(0.01);
        let violations = builder.violations();
        assert_eq!(
            violations,
            vec![ConfigViolation::PatternSpaceExhausted {
                patterns: 5,
                limit: "4".to_owned(),
            }]
        );
    }
}
