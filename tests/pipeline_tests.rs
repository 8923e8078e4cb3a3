// End-to-end tests of the segmenter and filter pipeline composed,
// covering the properties the viewer relies on: every line accounted
// for, stable ordering, and filters that only ever narrow.

use batchview::log::{Batch, FilterParams, apply_filters, segment};

const SAMPLE: &str = "\
device boot, firmware 11.2\n\
[TRACE][12:01:02][webview] LoadPage (/Users/runner/work/1/s/PMA/PMA/WebView/Foo.cs, Load:42) did X\n\
[TRACE][12:01:03][webview] OnLoadResource method (/Users/runner/work/1/s/PMA/PMA/WebView/Client.cs, OnLoadResource:12) https://example.com/app.js\n\
[INFO][12:01:04][Survey] Survey response received (/Users/runner/work/1/s/PMA/PMA/Survey/Controller.cs, Receive:88) native://notify?{\"ok\":true}\n\
continuation of the survey payload\n\
[STOP_TIMETRACK][12:01:05] total 3.2s\n";

fn sample_batches() -> Vec<Batch> {
    segment(SAMPLE)
}

#[test]
fn sample_log_segments_into_expected_batches() {
    let batches = sample_batches();
    assert_eq!(batches.len(), 5);

    let types: Vec<&str> = batches.iter().map(|b| b.batch_type.as_str()).collect();
    assert_eq!(types, vec!["", "TRACE", "TRACE", "INFO", "STOP_TIMETRACK"]);

    assert_eq!(batches[0].text, vec!["device boot, firmware 11.2"]);
    assert_eq!(batches[3].sub_type, "Survey");
    assert_eq!(batches[3].action, "Survey response received");
    assert_eq!(batches[3].location, "…/Survey/Controller.cs");
    assert_eq!(
        batches[3].text,
        vec![
            "native://notify?{\"ok\":true}",
            "continuation of the survey payload"
        ]
    );
}

#[test]
fn every_physical_line_lands_in_exactly_one_batch() {
    let batches = sample_batches();
    let total_lines: usize = batches.iter().map(|b| b.text.len()).sum();
    assert_eq!(total_lines, SAMPLE.split('\n').count());
}

#[test]
fn line_numbers_strictly_increase() {
    let batches = sample_batches();
    for pair in batches.windows(2) {
        assert!(pair[0].line_number < pair[1].line_number);
    }
}

#[test]
fn filtering_preserves_relative_order() {
    let batches = sample_batches();
    let params = FilterParams {
        sub_types: Some(vec!["webview".into(), "Survey".into()]),
        ..FilterParams::default()
    };
    let kept = apply_filters(batches, &params);
    let lines: Vec<usize> = kept.iter().map(|b| b.line_number).collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn filtering_is_a_subsequence_of_the_input() {
    let batches = sample_batches();
    let params = FilterParams {
        no_resource_loads: true,
        ..FilterParams::default()
    };
    let kept = apply_filters(batches.clone(), &params);

    assert!(kept.len() < batches.len());
    let mut source = batches.iter();
    for b in &kept {
        // each kept batch appears, unmodified, later in the source
        assert!(source.any(|orig| orig == b));
    }
}

#[test]
fn filtering_twice_equals_filtering_once() {
    let batches = sample_batches();
    let params = FilterParams {
        sub_types: Some(vec!["webview".into()]),
        no_resource_loads: true,
        only_frontend_notify: false,
        action_includes: Some(vec!["Load".into()]),
    };
    let once = apply_filters(batches, &params);
    let twice = apply_filters(once.clone(), &params);
    assert_eq!(once, twice);
}

#[test]
fn default_params_change_nothing() {
    let batches = sample_batches();
    assert_eq!(
        apply_filters(batches.clone(), &FilterParams::default()),
        batches
    );
}

#[test]
fn frontend_notify_keeps_only_the_survey_batch() {
    let batches = sample_batches();
    let params = FilterParams {
        only_frontend_notify: true,
        ..FilterParams::default()
    };
    let kept = apply_filters(batches, &params);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].sub_type, "Survey");
}

#[test]
fn resource_load_batches_are_dropped_only_when_asked() {
    let batches = sample_batches();
    assert!(
        batches
            .iter()
            .any(|b| b.action == "OnLoadResource method")
    );

    let params = FilterParams {
        no_resource_loads: true,
        ..FilterParams::default()
    };
    let kept = apply_filters(batches, &params);
    assert!(!kept.iter().any(|b| b.action == "OnLoadResource method"));
}
