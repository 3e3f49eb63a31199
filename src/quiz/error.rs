use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Quiz document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Quiz document must be an array of questions")]
    NotAnArray,

    #[error("Quiz document contains no questions")]
    Empty,

    #[error("Question #{} is invalid: {defect}", .index + 1)]
    InvalidQuestion { index: usize, defect: QuestionDefect },

    #[error("None of the {dropped} questions in the document are valid")]
    NoValidQuestions { dropped: usize },

    #[error("Stored quiz has no question data")]
    MissingData,
}

/// Why a single element of a quiz document was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionDefect {
    #[error("not an object")]
    NotAnObject,

    #[error("missing or empty question text")]
    MissingText,

    #[error("missing answers list")]
    MissingAnswers,

    #[error("needs at least 2 answers, found {0}")]
    TooFewAnswers(usize),

    #[error("answer #{} is not a string", .0 + 1)]
    NonStringAnswer(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot start a quiz without questions")]
    EmptyQuestionSet,

    #[error("Answer index {index} is out of range ({len} answers)")]
    InvalidAnswerIndex { index: usize, len: usize },

    #[error("Advance delay must be between {min} and {max} seconds, got {got}")]
    InvalidDelay { got: u64, min: u64, max: u64 },
}
