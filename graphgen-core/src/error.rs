//! Error types for the graphgen core library.
//!
//! Configuration problems are reported as a batch of [`ConfigViolation`]s so
//! callers can show every broken rule at once. Generation itself only fails
//! when an optional retry limit is exhausted.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A single broken configuration rule.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigViolation {
    /// Edge label count outside `[1, 99]`.
    #[error("number of edge-labels must be in the range: [1 .. 99] (got {got})")]
    EdgeLabelsOutOfRange {
        /// Requested number of edge labels.
        got: usize,
    },
    /// Vertex label count outside `[2, 999]`.
    #[error("number of vertex-labels must be in the range: [2 .. 999] (got {got})")]
    VertexLabelsOutOfRange {
        /// Requested number of vertex labels.
        got: usize,
    },
    /// There must be strictly more vertex labels than edge labels.
    #[error(
        "number of vertex-labels ({vertex_labels}) must be greater than number of edge-labels ({edge_labels})"
    )]
    TooFewVertexLabels {
        /// Requested number of vertex labels.
        vertex_labels: usize,
        /// Requested number of edge labels.
        edge_labels: usize,
    },
    /// Dataset size outside `[10, 100000]`.
    #[error("total number of graphs must be in the range: [10 .. 100,000] (got {got})")]
    DatasetLenOutOfRange {
        /// Requested number of dataset graphs.
        got: usize,
    },
    /// Minimum support outside `[0.01, 0.50]`.
    #[error("min-support must be in the range: [0.01 .. 0.50] (got {got})")]
    MinSupportOutOfRange {
        /// Requested minimum support ratio.
        got: f64,
    },
    /// More patterns than dataset graphs were requested.
    #[error(
        "total number of frequent patterns cannot be larger than total number of graphs ({patterns} > {dataset_len})"
    )]
    TooManyPatterns {
        /// Requested number of patterns.
        patterns: usize,
        /// Requested number of dataset graphs.
        dataset_len: usize,
    },
    /// Average graph size outside `[5, 100]`.
    #[error("average size of graphs must be in the range: [5 .. 100] (got {got})")]
    AvgGraphSizeOutOfRange {
        /// Requested average graph size in edges.
        got: usize,
    },
    /// Average pattern size outside `[2, 40]`.
    #[error("average size of frequent patterns must be in the range: [2 .. 40] (got {got})")]
    AvgPatternSizeOutOfRange {
        /// Requested average pattern size in edges.
        got: usize,
    },
    /// Patterns must be smaller than dataset graphs on average.
    #[error(
        "average size of frequent patterns ({pattern_size}) must be less than average size of graphs ({graph_size})"
    )]
    PatternNotSmallerThanGraph {
        /// Requested average pattern size.
        pattern_size: usize,
        /// Requested average graph size.
        graph_size: usize,
    },
    /// `D` must exceed `min_support × D × L`.
    #[error(
        "inconsistent values for min-support, dataset-count and frequents-count: \
         dataset-count must be greater than min-support x dataset-count x frequents-count"
    )]
    InconsistentSupport {
        /// Requested minimum support ratio.
        min_support: f64,
        /// Requested number of dataset graphs.
        dataset_len: usize,
        /// Requested number of patterns.
        patterns: usize,
    },
    /// More patterns requested than the label space can distinguish.
    #[error(
        "total number of distinct frequent patterns cannot be larger than {limit} with the given number of distinct vertex and edge labels"
    )]
    PatternSpaceExhausted {
        /// Requested number of patterns.
        patterns: usize,
        /// Upper bound `2^(V·E)` rendered as text.
        limit: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigViolation`] variants.
    enum ConfigViolationCode for ConfigViolation {
        /// Edge label count outside `[1, 99]`.
        EdgeLabelsOutOfRange => EdgeLabelsOutOfRange { .. } => "CONFIG_EDGE_LABELS_OUT_OF_RANGE",
        /// Vertex label count outside `[2, 999]`.
        VertexLabelsOutOfRange => VertexLabelsOutOfRange { .. } => "CONFIG_VERTEX_LABELS_OUT_OF_RANGE",
        /// There must be strictly more vertex labels than edge labels.
        TooFewVertexLabels => TooFewVertexLabels { .. } => "CONFIG_TOO_FEW_VERTEX_LABELS",
        /// Dataset size outside `[10, 100000]`.
        DatasetLenOutOfRange => DatasetLenOutOfRange { .. } => "CONFIG_DATASET_LEN_OUT_OF_RANGE",
        /// Minimum support outside `[0.01, 0.50]`.
        MinSupportOutOfRange => MinSupportOutOfRange { .. } => "CONFIG_MIN_SUPPORT_OUT_OF_RANGE",
        /// More patterns than dataset graphs were requested.
        TooManyPatterns => TooManyPatterns { .. } => "CONFIG_TOO_MANY_PATTERNS",
        /// Average graph size outside `[5, 100]`.
        AvgGraphSizeOutOfRange => AvgGraphSizeOutOfRange { .. } => "CONFIG_AVG_GRAPH_SIZE_OUT_OF_RANGE",
        /// Average pattern size outside `[2, 40]`.
        AvgPatternSizeOutOfRange => AvgPatternSizeOutOfRange { .. } => "CONFIG_AVG_PATTERN_SIZE_OUT_OF_RANGE",
        /// Patterns must be smaller than dataset graphs on average.
        PatternNotSmallerThanGraph => PatternNotSmallerThanGraph { .. } => "CONFIG_PATTERN_NOT_SMALLER_THAN_GRAPH",
        /// `D` must exceed `min_support × D × L`.
        InconsistentSupport => InconsistentSupport { .. } => "CONFIG_INCONSISTENT_SUPPORT",
        /// More patterns requested than the label space can distinguish.
        PatternSpaceExhausted => PatternSpaceExhausted { .. } => "CONFIG_PATTERN_SPACE_EXHAUSTED",
    }
}

/// Open-ended sampling loops guarded by the optional retry limit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RetryStage {
    /// Attaching a popped vertex to a growing pattern.
    PatternGrowth,
    /// Seeding an empty dataset graph with its first edge.
    FillSeed,
    /// Growing a seeded dataset graph towards its target size.
    Fill,
    /// Adding edges to random graphs to raise the dataset average.
    GlobalCorrection,
}

impl RetryStage {
    /// Short stable name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PatternGrowth => "pattern_growth",
            Self::FillSeed => "fill_seed",
            Self::Fill => "fill",
            Self::GlobalCorrection => "global_correction",
        }
    }
}

impl fmt::Display for RetryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when configuring or running the generator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphGenError {
    /// One or more configuration rules were broken.
    #[error("invalid configuration: {}", join_violations(.violations))]
    InvalidConfig {
        /// Every violated rule, in validation order.
        violations: Vec<ConfigViolation>,
    },
    /// An open-ended retry loop rejected too many consecutive attempts.
    #[error("{stage} gave up after {attempts} consecutive rejected insertions")]
    RetryLimitExceeded {
        /// Loop that exhausted its budget.
        stage: RetryStage,
        /// Number of consecutive rejections observed.
        attempts: usize,
    },
    /// A size distribution could not be constructed.
    #[error("cannot draw sizes from a normal distribution with mean {mean} and deviation {std_dev}")]
    InvalidSizeDistribution {
        /// Requested mean.
        mean: f64,
        /// Requested standard deviation.
        std_dev: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphGenError`] variants.
    enum GraphGenErrorCode for GraphGenError {
        /// One or more configuration rules were broken.
        InvalidConfig => InvalidConfig { .. } => "GRAPHGEN_INVALID_CONFIG",
        /// An open-ended retry loop rejected too many consecutive attempts.
        RetryLimitExceeded => RetryLimitExceeded { .. } => "GRAPHGEN_RETRY_LIMIT_EXCEEDED",
        /// A size distribution could not be constructed.
        InvalidSizeDistribution => InvalidSizeDistribution { .. } => "GRAPHGEN_INVALID_SIZE_DISTRIBUTION",
    }
}

impl GraphGenError {
    /// Returns the configuration violations carried by this error, if any.
    #[must_use]
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::InvalidConfig { violations } => violations,
            Self::RetryLimitExceeded { .. } | Self::InvalidSizeDistribution { .. } => &[],
        }
    }
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphGenError>;
