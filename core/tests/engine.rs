mod support;

use crewkit_core::api::{Crew, ExecutionEngine, ExecutionOpts, Inputs};
use support::{crew_manifest, RecordingBackend};

#[tokio::test]
async fn code_review_decision_sees_both_reviews() {
    let crew = Crew::load(&crew_manifest("code_review")).unwrap();
    let backend = RecordingBackend::new();
    let engine = ExecutionEngine::new(backend.clone(), ExecutionOpts::default());

    let out = engine.run(&crew.workflow, &crew.inputs).await.unwrap();

    assert_eq!(out.tasks_output.len(), 3);
    assert_eq!(out.raw, "answer from 3");
    assert_eq!(out.tasks_output[2].name, "Review Decision");
    assert_eq!(out.token_usage.total_tokens, 15);

    let prompts = backend.user_prompts();
    // review_security ran first and answered "answer from 1".
    assert!(prompts[2].contains("# Task: Analyze Code Quality\nanswer from 2"));
    assert!(prompts[2].contains("# Task: Review Security\nanswer from 1"));
    assert!(prompts[0].contains("diff --git a/app/auth.py"));
    assert!(!prompts[0].contains("{code_changes}"));
}

#[tokio::test(start_paused = true)]
async fn research_run_interpolates_the_query() {
    let crew = Crew::load(&crew_manifest("research")).unwrap();
    let backend = RecordingBackend::new();
    let mut inputs: Inputs = crew.inputs.clone();
    inputs.insert("user_query".to_string(), "Rust adoption in embedded".to_string());

    let out = ExecutionEngine::new(backend.clone(), ExecutionOpts::default())
        .run(&crew.workflow, &inputs)
        .await
        .unwrap();

    assert!(out.tasks_output[0].description.ends_with("Query: Rust adoption in embedded"));
    let prompts = backend.user_prompts();
    assert!(prompts[3].contains("# Task: Create Research Plan"));
    assert!(prompts[3].contains("# Task: Verify Information Quality"));
}

#[tokio::test]
async fn missing_input_is_left_literal() {
    let crew = Crew::load(&crew_manifest("research")).unwrap();
    let backend = RecordingBackend::new();

    ExecutionEngine::new(backend.clone(), ExecutionOpts::default())
        .run(&crew.workflow, &Inputs::new())
        .await
        .unwrap();

    assert!(backend.user_prompts()[0].contains("Query: {user_query}"));
}

#[tokio::test]
async fn crew_output_round_trips_through_json_file() {
    let crew = Crew::load(&crew_manifest("content")).unwrap();
    let out = ExecutionEngine::new(RecordingBackend::new(), ExecutionOpts::default())
        .run(&crew.workflow, &crew.inputs)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");
    out.write_json(&path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["raw"], "answer from 1");
    assert_eq!(value["tasks_output"][0]["task_id"], "weekly_content_plan");
}
