pub mod error;
pub mod handoff;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod validate;

use rand::Rng;

pub use error::{QuestionDefect, SessionError, ValidationError};
pub use session::{Phase, Selection, Session, SessionEvent, Snapshot};
pub use timer::{AdvanceDelay, Scheduler, TimerQueue};

/// A question as it appears in a quiz document.
///
/// The first entry of `answers` is always the correct one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub answers: Vec<String>,
}

impl Question {
    pub fn new(text: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            text: text.into(),
            answers,
        }
    }

    /// `None` only for a question that never went through validation.
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers.first().map(String::as_str)
    }
}

/// A question prepared for one quiz run, with its answers in display order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PresentedQuestion {
    pub text: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
}

impl PresentedQuestion {
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers.get(self.correct_index).map(String::as_str)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

/// Shuffles the answers of `question` and records where the correct one landed.
///
/// Positions are shuffled rather than strings, so duplicate answer texts
/// cannot confuse the lookup of the correct index.
pub fn present<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> PresentedQuestion {
    let order = shuffle::shuffled(&(0..question.answers.len()).collect::<Vec<_>>(), rng);
    let correct_index = order.iter().position(|&i| i == 0).unwrap_or_default();
    let answers = order
        .into_iter()
        .map(|i| question.answers[i].clone())
        .collect();

    PresentedQuestion {
        text: question.text.clone(),
        answers,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn answers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn presented_question_keeps_the_correct_answer() {
        let question = Question::new(
            "Capital of France?",
            answers(&["Paris", "London", "Berlin", "Madrid"]),
        );

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let presented = present(&question, &mut rng);

            assert_eq!(presented.correct_answer(), Some("Paris"));
            let mut sorted = presented.answers.clone();
            sorted.sort();
            let mut expected = question.answers.clone();
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn duplicate_answer_texts_still_track_position() {
        let question = Question::new("Pick", answers(&["same", "same", "other"]));

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let presented = present(&question, &mut rng);
            assert_eq!(presented.correct_answer(), Some("same"));
        }
    }

    #[test]
    fn hand_built_question_without_answers_has_no_correct_one() {
        let question = Question::new("Nothing to pick", Vec::new());
        assert_eq!(question.correct_answer(), None);

        let mut rng = StdRng::seed_from_u64(3);
        let presented = present(&question, &mut rng);
        assert!(presented.answers.is_empty());
        assert_eq!(presented.correct_answer(), None);
    }

    #[test]
    fn question_uses_document_field_names() {
        let question = Question::new("Q1", answers(&["a", "b"]));
        let json = serde_json::to_value(&question).unwrap();

        assert_eq!(json, serde_json::json!({ "question": "Q1", "answers": ["a", "b"] }));
    }
}
