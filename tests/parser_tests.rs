use cfu_layer_profiler::parser::{
    classify_line, extract_runs, inspect_capture, parse_end_to_end, trim_to_liftoff, EventRecord,
    GoldenStatus, LineKind,
};
use cfu_layer_profiler::HeaderPolicy;
use pretty_assertions::assert_eq;

const HEADER: &str = r#""Event","Tag","Ticks""#;

const CAPTURE: &str = r#"make[1]: Entering directory '/home/user/CFU-Playground/proj/multiplication_cfu'
Liftoff!
CFU Playground
==============
 1: TfLM Models menu
Tests for pdti8 model
Running golden test 0
"Event","Tag","Ticks"
0,CONV_2D,1510
1,DEPTHWISE_CONV_2D,802
2,CONV_2D,2244
3,AVERAGE_POOL_2D,12
4,FULLY_CONNECTED,9
 counter 1 (  1893427 ) cycles total
Running golden test 1
"Event","Tag","Ticks"
0,CONV_2D,1490
1,DEPTHWISE_CONV_2D,798
2,CONV_2D,2256
3,AVERAGE_POOL_2D,12
4,FULLY_CONNECTED,11
 counter 1 (  1891005 ) cycles total
OK   Golden tests passed
"#;

#[test]
fn test_extract_realistic_capture() {
    let extraction = extract_runs(CAPTURE, HeaderPolicy::Required);

    assert_eq!(extraction.runs.len(), 2);
    assert_eq!(extraction.runs[0].len(), 5);
    assert_eq!(extraction.runs[1].len(), 5);
    assert_eq!(
        extraction.runs[1].events[4],
        EventRecord::new(4, "FULLY_CONNECTED", 11)
    );
    assert_eq!(extraction.end_to_end_samples, vec![1893427, 1891005]);
}

#[test]
fn test_extraction_is_idempotent() {
    let first = extract_runs(CAPTURE, HeaderPolicy::Required);
    let second = extract_runs(CAPTURE, HeaderPolicy::Required);
    assert_eq!(first, second);
}

#[test]
fn test_header_boundaries_with_trailing_segment() {
    // Three headers, content after each
    let text = format!("{h}\n0,ADD,1\n{h}\n0,ADD,2\n{h}\n0,ADD,3\n", h = HEADER);
    assert_eq!(extract_runs(&text, HeaderPolicy::Required).runs.len(), 3);
}

#[test]
fn test_header_boundaries_empty_trailing_segment() {
    let text = format!("{h}\n0,ADD,1\n{h}\n0,ADD,2\n{h}\n", h = HEADER);
    assert_eq!(extract_runs(&text, HeaderPolicy::Required).runs.len(), 2);
}

#[test]
fn test_consecutive_headers_yield_no_run() {
    let text = format!("{h}\n{h}\n\n{h}\n0,ADD,1\n", h = HEADER);

    let extraction = extract_runs(&text, HeaderPolicy::Required);

    assert_eq!(extraction.runs.len(), 1);
    assert_eq!(extraction.runs[0].events, vec![EventRecord::new(0, "ADD", 1)]);
}

#[test]
fn test_leading_segment_counts_with_implicit_policy() {
    // k = 2 headers with non-empty content before each and a non-empty tail
    let text = format!("0,ADD,1\n{h}\n0,ADD,2\n{h}\n0,ADD,3\n", h = HEADER);

    assert_eq!(extract_runs(&text, HeaderPolicy::ImplicitLeadingRun).runs.len(), 3);
    assert_eq!(extract_runs(&text, HeaderPolicy::Required).runs.len(), 2);
}

#[test]
fn test_no_header_yields_no_runs_by_default() {
    let text = "0,CONV_2D,10\n1,ADD,4\n";

    let extraction = extract_runs(text, HeaderPolicy::Required);
    assert!(extraction.runs.is_empty());

    let implicit = extract_runs(text, HeaderPolicy::ImplicitLeadingRun);
    assert_eq!(implicit.runs.len(), 1);
    assert_eq!(implicit.runs[0].len(), 2);
}

#[test]
fn test_empty_input() {
    let extraction = extract_runs("", HeaderPolicy::Required);
    assert!(extraction.runs.is_empty());
    assert!(extraction.end_to_end_samples.is_empty());

    let noise = extract_runs("make: nothing to be done\n\n   \n", HeaderPolicy::Required);
    assert!(noise.is_empty());
}

#[test]
fn test_noise_inside_run_is_skipped() {
    let text = format!(
        "{}\n0,ADD,1\nwarning: something\n1,Mul,5\n1,MUL,2\n",
        HEADER
    );

    let extraction = extract_runs(&text, HeaderPolicy::Required);

    assert_eq!(
        extraction.runs[0].events,
        vec![EventRecord::new(0, "ADD", 1), EventRecord::new(1, "MUL", 2)]
    );
}

#[test]
fn test_end_to_end_lines() {
    assert_eq!(parse_end_to_end("Total ( 123456 ) cycles total"), Some(123456));
    assert_eq!(parse_end_to_end("Total (abc) cycles total"), None);
    assert_eq!(
        classify_line("Total ( 123456 ) cycles total"),
        LineKind::EndToEnd(123456)
    );
    assert_eq!(classify_line("Total (abc) cycles total"), LineKind::Noise);
}

#[test]
fn test_inspect_capture() {
    let metadata = inspect_capture(CAPTURE);
    assert_eq!(metadata.model.as_deref(), Some("pdti8"));
    assert_eq!(metadata.golden, GoldenStatus::Passed);
}

#[test]
fn test_trim_to_liftoff_keeps_runs() {
    let text = format!("{h}\n0,ADD,9\nLiftoff!\n{h}\n0,ADD,1\n", h = HEADER);

    let trimmed = trim_to_liftoff(&text);
    let extraction = extract_runs(trimmed, HeaderPolicy::Required);

    assert_eq!(extraction.runs.len(), 1);
    assert_eq!(extraction.runs[0].events[0].ticks, 1);
}
