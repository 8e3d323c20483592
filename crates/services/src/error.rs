//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::{QuestionError, QuestionSetError, SessionError};

/// Errors emitted by `AiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiClientError {
    #[error("AI client is not configured")]
    Disabled,
    #[error("AI returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the answer-equivalence oracle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error(transparent)]
    Ai(#[from] AiClientError),
    #[error("oracle verdict was neither correct nor wrong: {raw:?}")]
    UnrecognizedVerdict { raw: String },
}

/// Errors emitted by the question generator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("question count must be at least 1")]
    ZeroCount,
    #[error("generator output contains no JSON array")]
    MissingJsonArray,
    #[error(transparent)]
    Ai(#[from] AiClientError),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
}

/// Errors emitted by `QuizFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("an oracle call is already outstanding")]
    Busy,
    #[error("not a valid option letter: {raw:?}")]
    InvalidChoice { raw: String },
    #[error("answer evaluation failed: {0}")]
    Evaluation(#[source] OracleError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by the plan store collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlanStoreError {
    #[error("plan title and text are required")]
    MissingFields,
    #[error("user is not logged in or unknown")]
    Unauthorized,
    #[error("plan request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the auth gateway collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("name, email and password are required")]
    MissingFields,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("auth request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the mind-map renderer collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MindMapError {
    #[error("mind-map service returned an empty image")]
    EmptyImage,
    #[error("mind-map request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
