use graphgen_core::{
    ConfigViolation, ConfigViolationCode, GraphGenError, GraphGenErrorCode, RetryStage,
};
use rstest::rstest;

#[rstest]
#[case(ConfigViolation::EdgeLabelsOutOfRange { got: 0 }, ConfigViolationCode::EdgeLabelsOutOfRange)]
#[case(ConfigViolation::VertexLabelsOutOfRange { got: 1 }, ConfigViolationCode::VertexLabelsOutOfRange)]
#[case(
    ConfigViolation::TooFewVertexLabels { vertex_labels: 3, edge_labels: 3 },
    ConfigViolationCode::TooFewVertexLabels,
)]
#[case(ConfigViolation::DatasetLenOutOfRange { got: 9 }, ConfigViolationCode::DatasetLenOutOfRange)]
#[case(ConfigViolation::MinSupportOutOfRange { got: 0.55 }, ConfigViolationCode::MinSupportOutOfRange)]
#[case(
    ConfigViolation::TooManyPatterns { patterns: 41, dataset_len: 40 },
    ConfigViolationCode::TooManyPatterns,
)]
#[case(ConfigViolation::AvgGraphSizeOutOfRange { got: 4 }, ConfigViolationCode::AvgGraphSizeOutOfRange)]
#[case(ConfigViolation::AvgPatternSizeOutOfRange { got: 41 }, ConfigViolationCode::AvgPatternSizeOutOfRange)]
#[case(
    ConfigViolation::PatternNotSmallerThanGraph { pattern_size: 9, graph_size: 9 },
    ConfigViolationCode::PatternNotSmallerThanGraph,
)]
#[case(
    ConfigViolation::InconsistentSupport { min_support: 0.5, dataset_len: 40, patterns: 4 },
    ConfigViolationCode::InconsistentSupport,
)]
#[case(
    ConfigViolation::PatternSpaceExhausted { patterns: 9, limit: "8".to_owned() },
    ConfigViolationCode::PatternSpaceExhausted,
)]
fn returns_expected_violation_code(
    #[case] violation: ConfigViolation,
    #[case] expected: ConfigViolationCode,
) {
    assert_eq!(violation.code(), expected);
    assert_eq!(violation.code().as_str(), expected.as_str());
    assert!(expected.as_str().starts_with("CONFIG_"));
}

#[rstest]
#[case(
    GraphGenError::InvalidConfig { violations: vec![ConfigViolation::DatasetLenOutOfRange { got: 5 }] },
    GraphGenErrorCode::InvalidConfig,
    "GRAPHGEN_INVALID_CONFIG",
)]
#[case(
    GraphGenError::RetryLimitExceeded { stage: RetryStage::Fill, attempts: 10 },
    GraphGenErrorCode::RetryLimitExceeded,
    "GRAPHGEN_RETRY_LIMIT_EXCEEDED",
)]
#[case(
    GraphGenError::InvalidSizeDistribution { mean: 4.0, std_dev: f64::NAN },
    GraphGenErrorCode::InvalidSizeDistribution,
    "GRAPHGEN_INVALID_SIZE_DISTRIBUTION",
)]
fn returns_expected_graphgen_code(
    #[case] error: GraphGenError,
    #[case] expected: GraphGenErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), text);
}

#[test]
fn invalid_config_lists_every_violation() {
    let error = GraphGenError::InvalidConfig {
        violations: vec![
            ConfigViolation::MinSupportOutOfRange { got: 0.55 },
            ConfigViolation::TooManyPatterns {
                patterns: 50,
                dataset_len: 40,
            },
        ],
    };
    let message = error.to_string();
    assert!(message.contains("min-support must be in the range: [0.01 .. 0.50] (got 0.55)"));
    assert!(message.contains("; total number of frequent patterns cannot be larger"));
    assert_eq!(error.violations().len(), 2);
}

#[test]
fn retry_errors_name_their_stage() {
    let error = GraphGenError::RetryLimitExceeded {
        stage: RetryStage::PatternGrowth,
        attempts: 1_000_000,
    };
    assert_eq!(
        error.to_string(),
        "pattern_growth gave up after 1000000 consecutive rejected insertions"
    );
    assert!(error.violations().is_empty());
}
