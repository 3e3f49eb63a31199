mod common;

use quiz_deck::quiz::handoff::{consume_handoff, HANDOFF_KEY};
use quiz_deck::quiz::validate::{parse_document, validate_lenient, validate_strict};
use quiz_deck::quiz::{AdvanceDelay, Phase, Session, ValidationError};
use quiz_deck::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use quiz_deck::Error;
use serde_json::json;

#[test]
fn strict_refuses_a_single_answer_question() {
    let doc = json!([{ "question": "Q1", "answers": ["A"] }]);

    assert!(matches!(
        validate_strict(&doc),
        Err(ValidationError::InvalidQuestion { index: 0, .. })
    ));
}

#[test]
fn lenient_drops_only_the_malformed_question() {
    let doc = json!([
        { "question": "Q1", "answers": ["a", "b"] },
        { "question": "Q2" },
        { "question": "Q3", "answers": ["c", "d"] }
    ]);

    let screened = validate_lenient(&doc).unwrap();
    assert_eq!(screened.questions.len(), 2);
    assert_eq!(screened.dropped, 1);
    assert!(validate_strict(&doc).is_err());
}

#[test]
fn parsed_document_keeps_answer_order() {
    let questions = parse_document(
        r#"[{"question":"Capital of France?","answers":["Paris","London","Berlin","Madrid"]}]"#,
    )
    .unwrap();

    assert_eq!(questions, common::capital_of_france());
}

#[tokio::test]
async fn handoff_through_a_file_store() {
    let path = std::env::temp_dir().join(format!("quiz_deck_it_{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let store = JsonFileStore::new(&path);
    let record = json!({
        "id": "1",
        "name": "capitals.json",
        "data": [{ "question": "Capital of France?", "answers": ["Paris", "London"] }],
        "createdAt": "2024-06-10T08:00:00.000Z"
    });
    store.set(HANDOFF_KEY, record.to_string()).await.unwrap();

    let mut session = Session::with_seed(AdvanceDelay::default(), 1);
    let handoff = consume_handoff(&store, &mut session).await.unwrap().unwrap();

    assert_eq!(handoff.dropped, 0);
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(JsonFileStore::new(&path).get(HANDOFF_KEY).await.unwrap(), None);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn wrong_top_level_shape_in_handoff_is_cleaned_up() {
    let store = MemoryStore::new();
    store
        .set(HANDOFF_KEY, json!({ "name": "odd", "data": { "question": "Q" } }).to_string())
        .await
        .unwrap();
    let mut session = Session::with_seed(AdvanceDelay::default(), 1);

    let err = consume_handoff(&store, &mut session).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NotAnArray)));
    assert_eq!(store.get(HANDOFF_KEY).await.unwrap(), None);
    assert_eq!(session.phase(), Phase::Idle);
}
