//! Shape checks for quiz documents.
//!
//! Uploaded documents go through [`validate_strict`] and are refused as a whole
//! when any question is broken. Documents the app stored itself go through
//! [`validate_lenient`], which drops broken questions and keeps the rest.

use log::warn;
use serde_json::Value;

use super::error::{QuestionDefect, ValidationError};
use super::Question;

const MIN_ANSWERS: usize = 2;

/// Questions that survived lenient validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screened {
    pub questions: Vec<Question>,
    pub dropped: usize,
}

pub fn parse_document(text: &str) -> Result<Vec<Question>, ValidationError> {
    let value: Value = serde_json::from_str(text)?;
    validate_strict(&value)
}

pub fn validate_strict(value: &Value) -> Result<Vec<Question>, ValidationError> {
    let items = value.as_array().ok_or(ValidationError::NotAnArray)?;
    if items.is_empty() {
        return Err(ValidationError::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_question(item).map_err(|defect| ValidationError::InvalidQuestion { index, defect })
        })
        .collect()
}

pub fn validate_lenient(value: &Value) -> Result<Screened, ValidationError> {
    let items = value.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut questions = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for (index, item) in items.iter().enumerate() {
        match parse_question(item) {
            Ok(question) => questions.push(question),
            Err(defect) => {
                warn!("Skipping question #{}: {}", index + 1, defect);
                dropped += 1;
            }
        }
    }

    if questions.is_empty() {
        return Err(ValidationError::NoValidQuestions { dropped });
    }

    Ok(Screened { questions, dropped })
}

fn parse_question(item: &Value) -> Result<Question, QuestionDefect> {
    let object = item.as_object().ok_or(QuestionDefect::NotAnObject)?;

    let text = match object.get("question") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => return Err(QuestionDefect::MissingText),
    };

    let raw_answers = object
        .get("answers")
        .and_then(Value::as_array)
        .ok_or(QuestionDefect::MissingAnswers)?;
    if raw_answers.len() < MIN_ANSWERS {
        return Err(QuestionDefect::TooFewAnswers(raw_answers.len()));
    }

    let answers = raw_answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            answer
                .as_str()
                .map(str::to_owned)
                .ok_or(QuestionDefect::NonStringAnswer(i))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Question { text, answers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_accepts_well_formed_document() {
        let doc = json!([
            { "question": "Capital of France?", "answers": ["Paris", "London", "Berlin", "Madrid"] },
            { "question": "2 + 2?", "answers": ["4", "5"] }
        ]);

        let questions = validate_strict(&doc).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer(), Some("Paris"));
        assert_eq!(questions[1].answers, vec!["4", "5"]);
    }

    #[test]
    fn strict_rejects_single_answer_question() {
        let doc = json!([{ "question": "Q1", "answers": ["A"] }]);

        match validate_strict(&doc) {
            Err(ValidationError::InvalidQuestion { index, defect }) => {
                assert_eq!(index, 0);
                assert_eq!(defect, QuestionDefect::TooFewAnswers(1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn strict_rejects_everything_for_one_bad_element() {
        let doc = json!([
            { "question": "Good", "answers": ["a", "b"] },
            { "question": "", "answers": ["a", "b"] }
        ]);

        assert!(matches!(
            validate_strict(&doc),
            Err(ValidationError::InvalidQuestion { index: 1, defect: QuestionDefect::MissingText })
        ));
    }

    #[test]
    fn strict_rejects_other_top_level_shapes() {
        assert!(matches!(
            validate_strict(&json!({ "question": "Q", "answers": ["a", "b"] })),
            Err(ValidationError::NotAnArray)
        ));
        assert!(matches!(validate_strict(&json!([])), Err(ValidationError::Empty)));
    }

    #[test]
    fn answers_must_be_strings() {
        let doc = json!([{ "question": "Q", "answers": ["a", 2] }]);

        assert!(matches!(
            validate_strict(&doc),
            Err(ValidationError::InvalidQuestion { defect: QuestionDefect::NonStringAnswer(1), .. })
        ));
    }

    #[test]
    fn lenient_keeps_valid_questions() {
        let doc = json!([
            { "question": "Q1", "answers": ["a", "b"] },
            { "question": "Q2", "answers": "not a list" },
            { "question": "Q3", "answers": ["c", "d", "e"] }
        ]);

        let screened = validate_lenient(&doc).unwrap();
        assert_eq!(screened.questions.len(), 2);
        assert_eq!(screened.dropped, 1);
        assert_eq!(screened.questions[0].text, "Q1");
        assert_eq!(screened.questions[1].text, "Q3");
    }

    #[test]
    fn lenient_fails_when_nothing_survives() {
        let doc = json!([{ "answers": ["a", "b"] }, 42]);

        assert!(matches!(
            validate_lenient(&doc),
            Err(ValidationError::NoValidQuestions { dropped: 2 })
        ));
        assert!(matches!(
            validate_lenient(&json!([])),
            Err(ValidationError::NoValidQuestions { dropped: 0 })
        ));
    }

    #[test]
    fn parse_document_reports_bad_json() {
        assert!(matches!(
            parse_document("[{\"question\": "),
            Err(ValidationError::Malformed(_))
        ));
    }
}
