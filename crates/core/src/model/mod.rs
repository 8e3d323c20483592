mod question;
mod report;

pub use question::{
    ChoiceKey, Question, QuestionBody, QuestionDraft, QuestionError, QuestionKind, QuestionSet,
    QuestionSetError,
};
pub use report::{Motivation, QuestionScore, QuizReport};
