use cfu_layer_profiler::aggregator::{
    aggregate_runs, rank_bottlenecks, summarize_operations, ClockModel, DropReason,
};
use cfu_layer_profiler::parser::{EventRecord, Run};
use cfu_layer_profiler::{analyze_text, AnalysisConfig, HeaderPolicy};
use pretty_assertions::assert_eq;

fn run(events: &[(u64, &str, u64)]) -> Run {
    Run::new(
        events
            .iter()
            .map(|&(id, op, ticks)| EventRecord::new(id, op, ticks))
            .collect(),
    )
}

#[test]
fn test_mean_and_population_std() {
    let runs = vec![
        run(&[(0, "CONV_2D", 10)]),
        run(&[(0, "CONV_2D", 20)]),
        run(&[(0, "CONV_2D", 30)]),
    ];

    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());
    let layer = &dataset.layers[0];

    assert_eq!(layer.mean_ticks, 20.0);
    assert!((layer.std_ticks - 8.1650).abs() < 1e-4);
}

#[test]
fn test_unit_conversion_defaults() {
    let runs = vec![run(&[(0, "ADD", 20)])];

    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());
    let layer = &dataset.layers[0];

    assert_eq!(layer.mean_cycles, 20480.0);
    assert!((layer.mean_ms - 0.4096).abs() < 1e-12);
}

#[test]
fn test_unit_conversion_custom_clock() {
    let clock = ClockModel::new(512, 100_000_000).unwrap();
    let runs = vec![run(&[(0, "ADD", 20)])];

    let dataset = aggregate_runs(&runs, &[], &clock);

    assert_eq!(dataset.layers[0].mean_cycles, 10240.0);
    assert!((dataset.layers[0].mean_ms - 0.1024).abs() < 1e-12);
    assert_eq!(dataset.clock, clock);
}

#[test]
fn test_mismatched_operation_is_omitted() {
    let runs = vec![
        run(&[(0, "CONV_2D", 10), (1, "ADD", 2), (2, "MUL", 3), (3, "SOFTMAX", 1)]),
        run(&[(0, "CONV_2D", 12), (1, "ADD", 2), (2, "ADD", 3), (3, "SOFTMAX", 1)]),
    ];

    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

    let ids: Vec<u64> = dataset.layers.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![0, 1, 3]);
    assert_eq!(dataset.dropped.len(), 1);
    assert_eq!(dataset.dropped[0].position, 2);
    assert!(matches!(
        dataset.dropped[0].reason,
        DropReason::OperationMismatch { .. }
    ));
}

#[test]
fn test_agreement_invariant() {
    let runs = vec![
        run(&[(0, "CONV_2D", 10), (1, "ADD", 2), (2, "MUL", 3)]),
        run(&[(0, "CONV_2D", 11), (7, "ADD", 2), (2, "MUL", 4)]),
        run(&[(0, "CONV_2D", 12), (1, "ADD", 2)]),
    ];

    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

    let kept: Vec<usize> = (0..dataset.expected_layers)
        .filter(|p| !dataset.dropped.iter().any(|d| d.position == *p))
        .collect();
    assert_eq!(kept.len(), dataset.layers.len());

    for (layer, &position) in dataset.layers.iter().zip(&kept) {
        for r in &runs {
            let event = r.get(position).unwrap();
            assert_eq!(event.event_id, layer.id);
            assert_eq!(event.operation, layer.operation);
        }
    }
    assert_eq!(dataset.layers.len(), 1);
    assert_eq!(dataset.dropped.len(), 2);
}

#[test]
fn test_empty_text_gives_empty_dataset() {
    let dataset = analyze_text("", &AnalysisConfig::default());

    assert_eq!(dataset.run_count, 0);
    assert!(dataset.layers.is_empty());
    assert!(dataset.end_to_end.samples.is_empty());
    assert_eq!(dataset.end_to_end.mean_cycles, 0.0);
    assert_eq!(dataset.end_to_end.mean_ms, 0.0);
}

#[test]
fn test_analyze_text_pipeline() {
    let text = "\
\"Event\",\"Tag\",\"Ticks\"
0,CONV_2D,100
1,ADD,10
Total ( 1000000 ) cycles total
\"Event\",\"Tag\",\"Ticks\"
0,CONV_2D,300
1,ADD,30
Total ( 3000000 ) cycles total
";

    let dataset = analyze_text(text, &AnalysisConfig::default());

    assert_eq!(dataset.run_count, 2);
    assert_eq!(dataset.layers.len(), 2);
    assert_eq!(dataset.layers[0].mean_ticks, 200.0);
    assert_eq!(dataset.layers[1].std_ticks, 10.0);
    assert_eq!(dataset.end_to_end.mean_cycles, 2_000_000.0);
    assert!((dataset.end_to_end.mean_ms - 40.0).abs() < 1e-9);
}

#[test]
fn test_analyze_text_respects_header_policy() {
    let text = "0,ADD,5\n1,MUL,7\n";

    let strict_header = analyze_text(text, &AnalysisConfig::default());
    assert!(strict_header.is_empty());

    let config = AnalysisConfig::default().with_header_policy(HeaderPolicy::ImplicitLeadingRun);
    let implicit = analyze_text(text, &config);
    assert_eq!(implicit.layers.len(), 2);
}

#[test]
fn test_strict_check_is_opt_in() {
    let runs = vec![run(&[(0, "ADD", 1), (1, "MUL", 1)]), run(&[(0, "ADD", 1)])];

    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

    // aggregation itself still succeeds
    assert_eq!(dataset.layers.len(), 1);
    let err = dataset.ensure_consistent().unwrap_err();
    assert!(err.to_string().contains("missing in run(s) 2"));
}

#[test]
fn test_rankings_over_dataset() {
    let runs = vec![run(&[(0, "CONV_2D", 60), (1, "ADD", 10), (2, "CONV_2D", 30)])];
    let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

    let bottlenecks = rank_bottlenecks(&dataset.layers);
    assert_eq!(bottlenecks[0].id, 0);
    assert_eq!(bottlenecks[2].id, 1);

    let ops = summarize_operations(&dataset.layers);
    assert_eq!(ops[0].operation, "CONV_2D");
    assert_eq!(ops[0].total_ticks, 90.0);
    assert_eq!(ops[0].count, 2);
}
