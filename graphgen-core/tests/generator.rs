//! End-to-end generation behaviour.

use std::collections::BTreeSet;

use graphgen_core::{
    DotWriter, GeneratorConfig, GeneratorConfigBuilder, Generation, GraphGenerator, LabeledGraph,
    graph_file_name,
};
use graphgen_test_support::{proptest_profile, tracing::RecordingLayer};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn defaults() -> GeneratorConfig {
    GeneratorConfig::builder()
        .build()
        .expect("defaults are valid")
}

fn generate(config: &GeneratorConfig, seed: u64) -> Generation {
    let mut rng = SmallRng::seed_from_u64(seed);
    GraphGenerator::new(config)
        .generate(&mut rng)
        .expect("generation must succeed")
}

fn assert_structure(graph: &LabeledGraph, allow_loops: bool) {
    let mut pairs = BTreeSet::new();
    for edge in graph.edges() {
        assert!(allow_loops || !edge.is_loop(), "unexpected loop {edge:?}");
        let pair = (edge.source.min(edge.target), edge.source.max(edge.target));
        assert!(pairs.insert(pair), "parallel edge {edge:?}");
    }
}

#[rstest]
fn default_run_produces_full_dataset(defaults: GeneratorConfig) {
    let generation = generate(&defaults, 2024);

    assert_eq!(generation.patterns().len(), 4);
    assert_eq!(generation.dataset().len(), 40);
    assert!(generation.dataset().empty_graph_indices().is_empty());
    for pattern in generation.patterns() {
        assert!(pattern.graph().is_weakly_connected());
        assert!((2..=6).contains(&pattern.graph().edge_count()));
    }
    for graph in generation.dataset() {
        assert!(graph.edge_count() >= 1);
        assert_structure(graph, false);
    }

    let embedding = generation.embedding();
    assert_eq!(embedding.placements().len(), 4);
    for placement in embedding.placements() {
        assert!(placement.support() >= 0.1 && placement.support() <= 0.2);
        assert!((4..=8).contains(&placement.graphs().len()));
    }
    assert!(embedding.covered().len() <= 40);
}

#[rstest]
fn same_seed_reproduces_the_run(defaults: GeneratorConfig) {
    assert_eq!(generate(&defaults, 77), generate(&defaults, 77));
}

#[rstest]
fn embedded_graphs_contain_their_patterns(defaults: GeneratorConfig) {
    let generation = generate(&defaults, 5);
    for (placement, pattern) in generation
        .embedding()
        .placements()
        .iter()
        .zip(generation.patterns())
    {
        for &index in placement.graphs() {
            let graph = generation.dataset().get(index).expect("slot exists");
            for edge in pattern.graph().edges() {
                assert!(graph.has_edge(edge.source, edge.target));
            }
        }
    }
}

#[rstest]
fn merging_a_pattern_twice_changes_nothing(defaults: GeneratorConfig) {
    let generation = generate(&defaults, 11);
    let pattern = generation.patterns()[0].graph();
    let mut graph = generation.dataset().get(0).expect("slot exists").clone();
    graph.merge(pattern);
    let snapshot = graph.clone();
    assert_eq!(graph.merge(pattern), 0);
    assert_eq!(graph, snapshot);
}

#[rstest]
fn undirected_run_renders_plain_connectors() {
    let config = GeneratorConfigBuilder::new()
        .with_directed(false)
        .with_allow_loops(true)
        .build()
        .expect("configuration is valid");
    let generation = generate(&config, 9);
    let writer = DotWriter::new(generation.alphabet(), config.directed());
    let graph = generation.dataset().get(0).expect("slot exists");
    let text = writer.render("graph_01", graph);
    assert!(text.starts_with("graph graph_01 {\n"));
    assert!(text.contains(" -- "));
    assert!(!text.contains(" -> "));
    assert_eq!(graph_file_name(1, config.dataset_len()), "graph_01.dot");
}

#[rstest]
fn generation_records_pipeline_spans(defaults: GeneratorConfig) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let generation = tracing::subscriber::with_default(subscriber, || generate(&defaults, 3));

    let run = layer
        .span("generator.generate")
        .expect("generator.generate span must exist");
    assert_eq!(run.field("dataset_len"), Some("40"));
    assert_eq!(run.field("patterns"), Some("4"));
    assert_eq!(run.field("directed"), Some("true"));

    let synthesize = layer
        .span("patterns.synthesize")
        .expect("patterns.synthesize span must exist");
    assert_eq!(synthesize.field("count"), Some("4"));
    assert_eq!(synthesize.field("distinct"), Some("true"));

    let embed = layer
        .span("patterns.embed")
        .expect("patterns.embed span must exist");
    let covered = generation.embedding().covered().len().to_string();
    assert_eq!(embed.field("covered"), Some(covered.as_str()));

    let balance = layer
        .span("dataset.balance")
        .expect("dataset.balance span must exist");
    let filled = generation.balance().filled_graphs.to_string();
    assert_eq!(balance.field("filled"), Some(filled.as_str()));

    assert!(layer.has_event(Level::INFO, "dataset balanced"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_profile::cases(32)))]

    #[test]
    fn generated_datasets_hold_structural_invariants(
        seed in any::<u64>(),
        directed in any::<bool>(),
        loops in any::<bool>(),
        dataset_len in 10_usize..80,
        min_support in 0.01_f64..0.2,
    ) {
        let config = GeneratorConfigBuilder::new()
            .with_directed(directed)
            .with_allow_loops(loops)
            .with_dataset_len(dataset_len)
            .with_pattern_count(3)
            .with_min_support(min_support)
            .build()
            .expect("configuration is valid");
        let generation = generate(&config, seed);

        prop_assert!(generation.dataset().empty_graph_indices().is_empty());
        for graph in generation.dataset() {
            assert_structure(graph, loops);
        }
        for pattern in generation.patterns() {
            prop_assert!(pattern.graph().is_weakly_connected());
            prop_assert_eq!(pattern.graph().edge_count(), pattern.target_edges());
        }
        let covered = generation.embedding().covered();
        prop_assert!(covered.len() <= dataset_len);
        prop_assert!(covered.windows(2).all(|pair| pair[0] < pair[1]));
        for placement in generation.embedding().placements() {
            prop_assert!(placement.support() >= min_support);
            prop_assert!(placement.support() <= min_support + 0.1);
        }
    }
}
