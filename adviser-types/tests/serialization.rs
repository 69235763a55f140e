use adviser_types::{AdviceResult, Mode, RunReport, RunResults, ToolInfo, Verdict};

#[test]
fn mode_and_verdict_serialize_snake_case() {
    assert_eq!(
        serde_json::to_value(Mode::Apply).expect("serialize"),
        serde_json::json!("apply")
    );
    assert_eq!(
        serde_json::to_value(Verdict::DidNotRun).expect("serialize"),
        serde_json::json!("did_not_run")
    );
}

#[test]
fn advice_result_omits_empty_fields() {
    let value = serde_json::to_value(AdviceResult::succeeded("a", false, "No changes needed"))
        .expect("serialize");
    assert!(value.get("error").is_none());
    assert!(value.get("branch_name").is_none());
    assert!(value.get("next_steps").is_none());
    assert_eq!(value["message"], serde_json::json!("No changes needed"));
}

#[test]
fn run_results_serialize_as_ordered_array() {
    let results: RunResults = vec![
        AdviceResult::succeeded("b", true, "").with_branch("advice-b"),
        AdviceResult::failed("a", "boom"),
    ]
    .into_iter()
    .collect();

    let value = serde_json::to_value(&results).expect("serialize");
    let arr = value.as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["advice_name"], serde_json::json!("b"));
    assert_eq!(arr[0]["branch_name"], serde_json::json!("advice-b"));
    assert_eq!(arr[1]["advice_name"], serde_json::json!("a"));
}

#[test]
fn report_round_trips_through_json() {
    let report = RunReport::new(
        ToolInfo {
            name: "adviser".to_string(),
            version: Some("0.1.0".to_string()),
        },
        Mode::Diff,
        "/repo",
    )
    .finish(
        vec![AdviceResult::succeeded("shouty", true, "diff")]
            .into_iter()
            .collect(),
    );

    let json = serde_json::to_string(&report).expect("serialize");
    let back: RunReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.mode, Mode::Diff);
    assert_eq!(back.results, report.results);
    assert!(back.ended_at.is_some());
    assert!(!back.is_failure());
}
