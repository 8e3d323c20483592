#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use model::{
    ChoiceKey, Motivation, Question, QuestionBody, QuestionDraft, QuestionError, QuestionKind,
    QuestionScore, QuestionSet, QuestionSetError, QuizReport,
};
pub use session::{Advance, AnswerState, CheckOutcome, QuizSession, SessionError};
pub use time::Clock;
