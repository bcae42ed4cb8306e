//! Local validation failures. None of these ever reach the network; each
//! one renders as the inline or blocking message the user sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a username")]
    EmptyUsername,

    /// `next` pressed on a question with no selection.
    #[error("Please select an answer before continuing.")]
    Unanswered { question: usize },

    /// `submit` with a gap; `question` is the first unanswered one.
    #[error("Please answer question {question}")]
    Incomplete { question: usize },

    #[error("Answers can only be submitted from the last question.")]
    NotOnLastQuestion,

    #[error("'{code}' is not an option for question {question}")]
    UnknownOption { question: usize, code: char },

    #[error("Your answers are already being analyzed.")]
    SubmissionInFlight,

    #[error("Please wait for a reply before sending another message.")]
    ReplyPending,

    #[error("Message is empty")]
    EmptyMessage,
}
