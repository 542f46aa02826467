use cfu_layer_profiler::commands::{default_output_paths, execute_analyze, validate_args, AnalyzeArgs};
use cfu_layer_profiler::output::read_report;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const CAPTURE: &str = "\
stale boot output
\"Event\",\"Tag\",\"Ticks\"
0,CONV_2D,999
Liftoff!
Tests for pdti8 model
\"Event\",\"Tag\",\"Ticks\"
0,CONV_2D,100
1,ADD,10
 ( 1500000 ) cycles total
\"Event\",\"Tag\",\"Ticks\"
0,CONV_2D,120
1,MUL,10
 ( 1600000 ) cycles total
OK   Golden tests passed
";

fn write_capture(dir: &Path) -> PathBuf {
    let path = dir.join("profile_pdti8.txt");
    std::fs::write(&path, CAPTURE).unwrap();
    path
}

#[test]
fn test_default_output_paths() {
    let (json, csv, svg) = default_output_paths(Path::new("archive/abc/profile_pdti8.txt"));
    assert_eq!(json, PathBuf::from("archive/abc/profile_pdti8.json"));
    assert_eq!(csv, PathBuf::from("archive/abc/profile_pdti8.csv"));
    assert_eq!(svg, PathBuf::from("archive/abc/profile_pdti8.svg"));
}

#[test]
fn test_analyze_writes_all_outputs() {
    let dir = tempdir().unwrap();
    let input = write_capture(dir.path());

    let args = AnalyzeArgs {
        from_liftoff: true,
        print_summary: false,
        ..AnalyzeArgs::new(&input)
    }
    .with_all_outputs();
    validate_args(&args).unwrap();

    let dataset = execute_analyze(args).unwrap();

    // the stale pre-liftoff run is gone, position 1 disagrees
    assert_eq!(dataset.run_count, 2);
    assert_eq!(dataset.layers.len(), 1);
    assert_eq!(dataset.layers[0].mean_ticks, 110.0);

    let (json, csv, svg) = default_output_paths(&input);
    assert!(csv.exists());
    assert!(svg.exists());

    let report = read_report(&json).unwrap();
    assert_eq!(report.model.as_deref(), Some("pdti8"));
    assert_eq!(report.dropped_layers.len(), 1);
}

#[test]
fn test_analyze_without_liftoff_trim_sees_stale_run() {
    let dir = tempdir().unwrap();
    let input = write_capture(dir.path());

    let args = AnalyzeArgs {
        print_summary: false,
        ..AnalyzeArgs::new(&input)
    };

    let dataset = execute_analyze(args).unwrap();
    assert_eq!(dataset.run_count, 3);
}

#[test]
fn test_strict_mode_fails_on_dropped_layers() {
    let dir = tempdir().unwrap();
    let input = write_capture(dir.path());

    let mut args = AnalyzeArgs::new(&input);
    args.from_liftoff = true;
    args.print_summary = false;
    args.config = args.config.with_strict(true);

    let result = execute_analyze(args);
    assert!(result.is_err());
}

#[test]
fn test_analyze_empty_capture_skips_csv() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("profile_empty.txt");
    std::fs::write(&input, "no profiling output here\n").unwrap();

    let args = AnalyzeArgs {
        print_summary: false,
        ..AnalyzeArgs::new(&input)
    }
    .with_all_outputs();

    let dataset = execute_analyze(args).unwrap();

    assert!(dataset.is_empty());
    let (json, csv, svg) = default_output_paths(&input);
    assert!(json.exists());
    assert!(!csv.exists());
    assert!(!svg.exists());
}

#[test]
fn test_analyze_missing_capture() {
    let args = AnalyzeArgs::new("/nonexistent/profile_x.txt");
    assert!(validate_args(&args).is_err());
    assert!(execute_analyze(args).is_err());
}
