use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of options every multiple-choice question carries.
pub const MULTIPLE_CHOICE_OPTIONS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question answer is empty")]
    EmptyAnswer,

    #[error("unknown question type: {raw}")]
    UnknownKind { raw: String },

    #[error("invalid answer key for multiple choice: {raw}")]
    InvalidAnswerKey { raw: String },

    #[error("multiple choice question needs 4 options, got {found}")]
    WrongOptionCount { found: usize },

    #[error("open question must not carry options")]
    UnexpectedOptions,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,
}

/// Kind of quiz question, as produced by the generator collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    /// Free-form answer, judged by the answer-equivalence oracle.
    Open,
    /// Four options keyed A-D, judged by exact key equality.
    Multiple,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Open => write!(f, "open"),
            QuestionKind::Multiple => write!(f, "multiple"),
        }
    }
}

/// Option letter for a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    pub const ALL: [ChoiceKey; MULTIPLE_CHOICE_OPTIONS] =
        [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    /// Zero-based position of this key in the option list.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            ChoiceKey::A => 0,
            ChoiceKey::B => 1,
            ChoiceKey::C => 2,
            ChoiceKey::D => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceKey {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(ChoiceKey::A),
            "B" | "b" => Ok(ChoiceKey::B),
            "C" | "c" => Ok(ChoiceKey::C),
            "D" | "d" => Ok(ChoiceKey::D),
            other => Err(QuestionError::InvalidAnswerKey {
                raw: other.to_string(),
            }),
        }
    }
}

/// Answer payload of a validated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionBody {
    Open {
        /// Reference answer the oracle compares user answers against.
        answer: String,
    },
    Multiple {
        options: [String; MULTIPLE_CHOICE_OPTIONS],
        answer: ChoiceKey,
    },
}

/// A single quiz question, immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    body: QuestionBody,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn body(&self) -> &QuestionBody {
        &self.body
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::Open { .. } => QuestionKind::Open,
            QuestionBody::Multiple { .. } => QuestionKind::Multiple,
        }
    }

    /// The answer text shown when the question is revealed.
    ///
    /// For multiple choice this is the correct option letter, matching what
    /// the player selects against.
    #[must_use]
    pub fn reference_answer(&self) -> &str {
        match &self.body {
            QuestionBody::Open { answer } => answer,
            QuestionBody::Multiple { answer, .. } => answer.as_str(),
        }
    }

    /// Judge an answer without consulting the oracle.
    ///
    /// Returns `Some(verdict)` for multiple choice (exact key equality) and
    /// `None` for open questions, which only the oracle can judge.
    #[must_use]
    pub fn local_verdict(&self, choice: ChoiceKey) -> Option<bool> {
        match &self.body {
            QuestionBody::Open { .. } => None,
            QuestionBody::Multiple { answer, .. } => Some(*answer == choice),
        }
    }
}

/// Unvalidated question as it comes off the generator wire.
///
/// Mirrors the JSON array shape the generator prompt asks for:
/// `{"type":"open","question":"...","answer":"..."}` or
/// `{"type":"multiple","question":"...","options":[...],"answer":"B"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or answer is empty, the type
    /// tag is unknown, a multiple-choice draft does not carry exactly four
    /// options or a parseable answer key, or an open draft carries options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.question.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let answer = self.answer.trim().to_string();
        if answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        let body = match self.kind.trim().to_ascii_lowercase().as_str() {
            "open" => {
                if self.options.is_some() {
                    return Err(QuestionError::UnexpectedOptions);
                }
                QuestionBody::Open { answer }
            }
            "multiple" => {
                let options = self.options.unwrap_or_default();
                let found = options.len();
                let options: [String; MULTIPLE_CHOICE_OPTIONS] = options
                    .try_into()
                    .map_err(|_| QuestionError::WrongOptionCount { found })?;
                QuestionBody::Multiple {
                    options,
                    answer: answer.parse()?,
                }
            }
            other => {
                return Err(QuestionError::UnknownKind {
                    raw: other.to_string(),
                });
            }
        };

        Ok(Question { prompt, body })
    }
}

/// Ordered, non-empty list of questions, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` when no questions are provided; a
    /// quiz session over zero questions is out of contract.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_draft() -> QuestionDraft {
        QuestionDraft {
            kind: "open".into(),
            question: "What is ownership?".into(),
            answer: "Each value has a single owner.".into(),
            options: None,
        }
    }

    fn multiple_draft() -> QuestionDraft {
        QuestionDraft {
            kind: "multiple".into(),
            question: "Which keyword borrows?".into(),
            answer: "B".into(),
            options: Some(vec![
                "A) move".into(),
                "B) ref".into(),
                "C) box".into(),
                "D) copy".into(),
            ]),
        }
    }

    #[test]
    fn open_draft_validates() {
        let q = open_draft().validate().unwrap();
        assert_eq!(q.kind(), QuestionKind::Open);
        assert_eq!(q.reference_answer(), "Each value has a single owner.");
        assert_eq!(q.local_verdict(ChoiceKey::A), None);
    }

    #[test]
    fn multiple_draft_validates_and_judges_locally() {
        let q = multiple_draft().validate().unwrap();
        assert_eq!(q.kind(), QuestionKind::Multiple);
        assert_eq!(q.reference_answer(), "B");
        assert_eq!(q.local_verdict(ChoiceKey::B), Some(true));
        assert_eq!(q.local_verdict(ChoiceKey::D), Some(false));
    }

    #[test]
    fn multiple_draft_requires_four_options() {
        let mut draft = multiple_draft();
        draft.options = Some(vec!["A) only".into(), "B) two".into()]);
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount { found: 2 });
    }

    #[test]
    fn multiple_draft_rejects_bad_answer_key() {
        let mut draft = multiple_draft();
        draft.answer = "E".into();
        assert!(matches!(
            draft.validate().unwrap_err(),
            QuestionError::InvalidAnswerKey { .. }
        ));
    }

    #[test]
    fn open_draft_rejects_options() {
        let mut draft = open_draft();
        draft.options = Some(vec!["A) stray".into()]);
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::UnexpectedOptions
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut draft = open_draft();
        draft.kind = "essay".into();
        assert!(matches!(
            draft.validate().unwrap_err(),
            QuestionError::UnknownKind { .. }
        ));
    }

    #[test]
    fn draft_parses_generator_wire_shape() {
        let raw = r#"[{"type":"open","question":"Q1","answer":"A1"},
            {"type":"multiple","question":"Q2",
             "options":["A) a","B) b","C) c","D) d"],"answer":"C"}]"#;
        let drafts: Vec<QuestionDraft> = serde_json::from_str(raw).unwrap();
        assert_eq!(drafts.len(), 2);
        let second = drafts[1].clone().validate().unwrap();
        assert_eq!(second.local_verdict(ChoiceKey::C), Some(true));
    }

    #[test]
    fn empty_question_set_is_rejected() {
        assert_eq!(
            QuestionSet::new(Vec::new()).unwrap_err(),
            QuestionSetError::Empty
        );
    }

    #[test]
    fn choice_key_round_trips() {
        for key in ChoiceKey::ALL {
            assert_eq!(key.as_str().parse::<ChoiceKey>().unwrap(), key);
        }
        assert!("E".parse::<ChoiceKey>().is_err());
    }
}
