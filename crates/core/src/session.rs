use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{Question, QuestionSet, QuizReport};

/// Credit removed from the attempt cap after each wrong answer.
pub const WRONG_ANSWER_PENALTY: f64 = 0.25;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz session already completed")]
    Completed,

    #[error("quiz session is not completed yet")]
    NotCompleted,

    #[error("answer already revealed for the current question")]
    AlreadyRevealed,

    #[error("current question already answered correctly")]
    AlreadyCorrect,

    #[error("current question still awaits a correct answer or a reveal")]
    AwaitingFeedback,
}

//
// ─── STATES & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Feedback state of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerState {
    /// No feedback shown yet, or the player is editing after a wrong attempt.
    Answering,
    /// Last check was wrong; retry or reveal.
    Wrong,
    /// Correct answer confirmed; only `advance` leads out.
    Correct,
    /// Answer shown; scoring closed for this question, only `advance` leads out.
    Revealed,
}

/// Result of applying a verdict to the current question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckOutcome {
    /// Verdict was positive; `awarded` credit is committed for this question.
    Correct { awarded: f64 },
    /// Verdict was negative; `remaining_cap` is the most the question can
    /// still earn.
    Wrong { remaining_cap: f64 },
    /// Guarded no-op: the question was already revealed or answered
    /// correctly, so the verdict neither scores nor decays the cap.
    Ignored,
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion { index: usize },
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session over a fixed question set.
///
/// Steps through the questions sequentially; each question starts with an
/// attempt cap of 1.0 which decays by [`WRONG_ANSWER_PENALTY`] per wrong
/// attempt (floored at zero) and is forfeited entirely on reveal. The award
/// for a question is the cap at the moment the correct verdict lands.
///
/// The session is purely synchronous; oracle verdicts for open questions are
/// produced by the caller and applied via [`QuizSession::apply_verdict`].
pub struct QuizSession {
    questions: QuestionSet,
    current: usize,
    scores: Vec<f64>,
    attempt_cap: f64,
    state: AnswerState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    show_details: bool,
}

impl QuizSession {
    /// Create a session positioned at the first question.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(questions: QuestionSet, started_at: DateTime<Utc>) -> Self {
        let scores = vec![0.0; questions.len()];
        Self {
            questions,
            current: 0,
            scores,
            attempt_cap: 1.0,
            state: AnswerState::Answering,
            started_at,
            completed_at: None,
            show_details: false,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question currently being answered.
    ///
    /// Equals `total_questions()` once the session is finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answer_state(&self) -> AnswerState {
        self.state
    }

    /// Maximum credit the current question can still earn.
    #[must_use]
    pub fn attempt_cap(&self) -> f64 {
        self.attempt_cap
    }

    /// Running total of committed per-question awards.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.scores.iter().sum()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn details_visible(&self) -> bool {
        self.show_details
    }

    /// Apply a correctness verdict to the current question.
    ///
    /// A positive verdict commits the current attempt cap as this question's
    /// award; a negative one decays the cap by [`WRONG_ANSWER_PENALTY`]
    /// (floored at zero) and leaves the question open for retries. Verdicts
    /// landing on an already revealed or already correct question are
    /// swallowed as [`CheckOutcome::Ignored`] so a duplicate check can never
    /// become a new scoring attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when the session is finished.
    pub fn apply_verdict(&mut self, verdict: bool) -> Result<CheckOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        match self.state {
            AnswerState::Revealed | AnswerState::Correct => return Ok(CheckOutcome::Ignored),
            AnswerState::Answering | AnswerState::Wrong => {}
        }

        if verdict {
            let awarded = self.attempt_cap;
            self.scores[self.current] = awarded;
            self.state = AnswerState::Correct;
            Ok(CheckOutcome::Correct { awarded })
        } else {
            self.attempt_cap = (self.attempt_cap - WRONG_ANSWER_PENALTY).max(0.0);
            self.state = AnswerState::Wrong;
            Ok(CheckOutcome::Wrong {
                remaining_cap: self.attempt_cap,
            })
        }
    }

    /// Forfeit the current question so its answer can be shown.
    ///
    /// Zeroes the attempt cap immediately; the award stays zero no matter
    /// what happened before, and further verdicts are ignored. Fetching the
    /// reference answer text is the caller's concern and independent of this
    /// scoring effect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when finished,
    /// `SessionError::AlreadyRevealed` on a duplicate reveal, and
    /// `SessionError::AlreadyCorrect` once a correct answer is confirmed.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        match self.state {
            AnswerState::Revealed => Err(SessionError::AlreadyRevealed),
            AnswerState::Correct => Err(SessionError::AlreadyCorrect),
            AnswerState::Answering | AnswerState::Wrong => {
                self.attempt_cap = 0.0;
                self.scores[self.current] = 0.0;
                self.state = AnswerState::Revealed;
                Ok(())
            }
        }
    }

    /// Move to the next question, or finish after the last one.
    ///
    /// Only legal once the current question is settled (correct or
    /// revealed). Resets the attempt cap to 1.0 for the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AwaitingFeedback` while the current question is
    /// unsettled and `SessionError::Completed` after the session finished.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        match self.state {
            AnswerState::Correct | AnswerState::Revealed => {}
            AnswerState::Answering | AnswerState::Wrong => {
                return Err(SessionError::AwaitingFeedback);
            }
        }

        self.current += 1;
        self.attempt_cap = 1.0;
        self.state = AnswerState::Answering;

        if self.current < self.questions.len() {
            Ok(Advance::NextQuestion {
                index: self.current,
            })
        } else {
            self.completed_at = Some(now);
            Ok(Advance::Finished)
        }
    }

    /// Toggle the detailed-results view. Never touches scores.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` before the session finished.
    pub fn toggle_details(&mut self) -> Result<bool, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        self.show_details = !self.show_details;
        Ok(self.show_details)
    }

    /// Final report with total, percent, motivation, and per-question detail.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` before the session finished.
    pub fn report(&self) -> Result<QuizReport, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        Ok(QuizReport::new(&self.questions, &self.scores))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("state", &self.state)
            .field("attempt_cap", &self.attempt_cap)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
