//! Synthetic labeled-graph dataset generation.
//!
//! A run synthesizes a set of small connected "frequent" patterns, embeds
//! each one into a random fraction of the dataset graphs, and then balances
//! every graph towards a requested average size. [`GraphGenerator`] drives
//! the whole pipeline; [`DotWriter`] renders the results.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod balance;
mod config;
mod dataset;
mod dot;
mod embed;
mod error;
mod generator;
mod graph;
mod labels;
mod pattern;
mod retry;
mod sampling;

pub use crate::{
    balance::{BalanceReport, SizeBalancer, correction_edges},
    config::{DEFAULT_RETRY_LIMIT, GeneratorConfig, GeneratorConfigBuilder},
    dataset::Dataset,
    dot::{DotWriter, PATTERN_DIR, graph_file_name, pattern_file_name},
    embed::{EmbeddingReport, Placement, SUPPORT_SPREAD, SupportEmbedder},
    error::{
        ConfigViolation, ConfigViolationCode, GraphGenError, GraphGenErrorCode, Result,
        RetryStage,
    },
    generator::{Generation, GraphGenerator},
    graph::{Edge, LabeledGraph},
    labels::{EdgeLabel, LabelAlphabet, VertexLabel, digit_width},
    pattern::{Pattern, PatternSynthesizer},
    sampling::{
        MIN_TARGET_EDGES, SizeDistribution, binomial, clamp_target, round_half_even,
        sample_distinct, sample_without_adjacent_repeats,
    },
};
