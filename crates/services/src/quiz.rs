use std::sync::Arc;

use quiz_core::{
    Advance, AnswerState, CheckOutcome, ChoiceKey, Clock, QuestionBody, QuestionSet, QuizReport,
    QuizSession, SessionError,
};

use crate::error::QuizFlowError;
use crate::oracle::AnswerOracle;

/// Outcome of checking an answer through the flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckReply {
    Correct { awarded: f64 },
    Wrong { remaining_cap: f64 },
    /// The question was already revealed or answered correctly; nothing
    /// scored and no oracle call was spent.
    Ignored,
    /// The oracle verdict came back for a question the player has already
    /// moved past; it was discarded without touching the session.
    Stale,
}

impl From<CheckOutcome> for CheckReply {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Correct { awarded } => CheckReply::Correct { awarded },
            CheckOutcome::Wrong { remaining_cap } => CheckReply::Wrong { remaining_cap },
            CheckOutcome::Ignored => CheckReply::Ignored,
        }
    }
}

/// Reference answer for a revealed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealedAnswer {
    Known(String),
    /// The oracle fetch failed. The forfeit already happened, the text is
    /// never retried, and advancing stays allowed.
    Unavailable,
}

enum Dispatch {
    Local(bool),
    Oracle { prompt: String, reference: String },
}

/// Drives one quiz session against the answer oracle.
///
/// Owns the only mutable reference to the session, issues at most one oracle
/// call at a time, and tags each call with the question index it was issued
/// for so a verdict is never applied to a different question.
pub struct QuizFlow {
    session: QuizSession,
    source_text: String,
    oracle: Arc<dyn AnswerOracle>,
    clock: Clock,
    in_flight: bool,
    revealed: Option<RevealedAnswer>,
}

impl QuizFlow {
    #[must_use]
    pub fn new(
        questions: QuestionSet,
        source_text: impl Into<String>,
        oracle: Arc<dyn AnswerOracle>,
        clock: Clock,
    ) -> Self {
        Self {
            session: QuizSession::new(questions, clock.now()),
            source_text: source_text.into(),
            oracle,
            clock,
            in_flight: false,
            revealed: None,
        }
    }

    /// Read-only view of the underlying session.
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Reference answer stored by the last reveal, if any.
    #[must_use]
    pub fn revealed_answer(&self) -> Option<&RevealedAnswer> {
        self.revealed.as_ref()
    }

    /// Check the player's answer against the current question.
    ///
    /// Multiple choice is judged locally by exact key equality; open
    /// questions go through the oracle. While an oracle call is outstanding
    /// every further action is refused with `Busy`, and a verdict that
    /// arrives for a question the session has moved past is discarded as
    /// [`CheckReply::Stale`].
    ///
    /// # Errors
    ///
    /// Returns `Busy` during an outstanding oracle call, `InvalidChoice` for
    /// an unparseable option letter, `Evaluation` when the oracle fails
    /// (session state is left untouched, the player may retry), and
    /// `Session` for transitions the engine rejects.
    pub async fn check(&mut self, answer: &str) -> Result<CheckReply, QuizFlowError> {
        if self.in_flight {
            return Err(QuizFlowError::Busy);
        }

        let dispatch = {
            let question = self
                .session
                .current_question()
                .ok_or(SessionError::Completed)?;
            match question.body() {
                QuestionBody::Multiple { answer: key, .. } => {
                    let choice: ChoiceKey =
                        answer.parse().map_err(|_| QuizFlowError::InvalidChoice {
                            raw: answer.trim().to_string(),
                        })?;
                    Dispatch::Local(*key == choice)
                }
                QuestionBody::Open { answer: reference } => Dispatch::Oracle {
                    prompt: question.prompt().to_string(),
                    reference: reference.clone(),
                },
            }
        };

        match dispatch {
            Dispatch::Local(verdict) => Ok(self.session.apply_verdict(verdict)?.into()),
            Dispatch::Oracle { prompt, reference } => {
                // Don't spend an oracle call on a question that can no longer score.
                if matches!(
                    self.session.answer_state(),
                    AnswerState::Revealed | AnswerState::Correct
                ) {
                    return Ok(CheckReply::Ignored);
                }

                let issued_for = self.session.current_index();
                self.in_flight = true;
                let verdict = self
                    .oracle
                    .evaluate(&self.source_text, &prompt, answer, &reference)
                    .await;
                self.in_flight = false;

                let verdict = verdict.map_err(QuizFlowError::Evaluation)?;
                if self.session.is_complete() || self.session.current_index() != issued_for {
                    log::debug!("discarding stale verdict issued for question {issued_for}");
                    return Ok(CheckReply::Stale);
                }
                Ok(self.session.apply_verdict(verdict)?.into())
            }
        }
    }

    /// Reveal the correct answer for the current question.
    ///
    /// The scoring forfeit is committed before any oracle I/O, so it sticks
    /// even when the reference text cannot be fetched; in that case the
    /// stored answer is [`RevealedAnswer::Unavailable`] and is never retried.
    ///
    /// # Errors
    ///
    /// Returns `Busy` during an outstanding oracle call and `Session` for
    /// transitions the engine rejects (finished session, duplicate reveal,
    /// question already answered correctly).
    pub async fn reveal(&mut self) -> Result<&RevealedAnswer, QuizFlowError> {
        if self.in_flight {
            return Err(QuizFlowError::Busy);
        }

        let (needs_oracle, prompt, reference) = {
            let question = self
                .session
                .current_question()
                .ok_or(SessionError::Completed)?;
            (
                matches!(question.body(), QuestionBody::Open { .. }),
                question.prompt().to_string(),
                question.reference_answer().to_string(),
            )
        };

        self.session.reveal()?;

        let answer = if needs_oracle {
            let index = self.session.current_index();
            self.in_flight = true;
            let fetched = self.oracle.reveal(&self.source_text, &prompt).await;
            self.in_flight = false;

            match fetched {
                Ok(text) => RevealedAnswer::Known(text),
                Err(err) => {
                    log::warn!("reference answer fetch failed for question {index}: {err}");
                    RevealedAnswer::Unavailable
                }
            }
        } else {
            RevealedAnswer::Known(reference)
        };

        Ok(self.revealed.insert(answer))
    }

    /// Advance to the next question, or finish after the last one.
    ///
    /// # Errors
    ///
    /// Returns `Busy` during an outstanding oracle call and `Session` when
    /// the current question is unsettled or the session already finished.
    pub fn next(&mut self) -> Result<Advance, QuizFlowError> {
        if self.in_flight {
            return Err(QuizFlowError::Busy);
        }
        let advance = self.session.advance(self.clock.now())?;
        self.revealed = None;
        Ok(advance)
    }

    /// Toggle the detailed-results view of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `Session(NotCompleted)` before the quiz is finished.
    pub fn toggle_details(&mut self) -> Result<bool, QuizFlowError> {
        Ok(self.session.toggle_details()?)
    }

    /// Final report of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `Session(NotCompleted)` before the quiz is finished.
    pub fn report(&self) -> Result<QuizReport, QuizFlowError> {
        Ok(self.session.report()?)
    }
}
