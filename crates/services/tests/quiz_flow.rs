use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::time::fixed_clock;
use quiz_core::{Advance, AnswerState, Motivation, QuestionDraft, QuestionSet, SessionError};
use services::{AnswerOracle, CheckReply, OracleError, QuizFlow, QuizFlowError, RevealedAnswer};

/// Oracle that replays scripted responses and fails the test when the flow
/// consults it more often than the script allows.
struct ScriptedOracle {
    verdicts: Mutex<VecDeque<Result<bool, ()>>>,
    reveals: Mutex<VecDeque<Result<String, ()>>>,
}

impl ScriptedOracle {
    fn new(
        verdicts: impl IntoIterator<Item = Result<bool, ()>>,
        reveals: impl IntoIterator<Item = Result<String, ()>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            verdicts: Mutex::new(verdicts.into_iter().collect()),
            reveals: Mutex::new(reveals.into_iter().collect()),
        })
    }

    fn silent() -> Arc<Self> {
        Self::new([], [])
    }
}

fn scripted_failure() -> OracleError {
    OracleError::UnrecognizedVerdict {
        raw: "scripted failure".into(),
    }
}

#[async_trait]
impl AnswerOracle for ScriptedOracle {
    async fn evaluate(
        &self,
        _source: &str,
        _question: &str,
        _user_answer: &str,
        _reference: &str,
    ) -> Result<bool, OracleError> {
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected oracle evaluate call")
            .map_err(|()| scripted_failure())
    }

    async fn reveal(&self, _source: &str, _question: &str) -> Result<String, OracleError> {
        self.reveals
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected oracle reveal call")
            .map_err(|()| scripted_failure())
    }
}

fn open(n: usize) -> QuestionDraft {
    QuestionDraft {
        kind: "open".into(),
        question: format!("Open question {n}?"),
        answer: format!("Reference {n}"),
        options: None,
    }
}

fn multiple() -> QuestionDraft {
    QuestionDraft {
        kind: "multiple".into(),
        question: "Pick the right one.".into(),
        answer: "B".into(),
        options: Some(vec![
            "A) first".into(),
            "B) second".into(),
            "C) third".into(),
            "D) fourth".into(),
        ]),
    }
}

fn set_of(drafts: Vec<QuestionDraft>) -> QuestionSet {
    let questions = drafts
        .into_iter()
        .map(|d| d.validate().unwrap())
        .collect::<Vec<_>>();
    QuestionSet::new(questions).unwrap()
}

fn flow(drafts: Vec<QuestionDraft>, oracle: Arc<ScriptedOracle>) -> QuizFlow {
    QuizFlow::new(set_of(drafts), "Source notes.", oracle, fixed_clock())
}

#[tokio::test]
async fn mixed_quiz_reaches_expected_report() {
    // [multiple correct, open wrong+correct, open revealed, open wrong x2 + correct]
    let oracle = ScriptedOracle::new(
        [Ok(false), Ok(true), Ok(false), Ok(false), Ok(true)],
        [Ok("Reference 3".to_string())],
    );
    let mut flow = flow(vec![multiple(), open(2), open(3), open(4)], oracle);

    assert_eq!(
        flow.check("b").await.unwrap(),
        CheckReply::Correct { awarded: 1.0 }
    );
    flow.next().unwrap();

    assert_eq!(
        flow.check("half remembered").await.unwrap(),
        CheckReply::Wrong {
            remaining_cap: 0.75
        }
    );
    assert_eq!(
        flow.check("better answer").await.unwrap(),
        CheckReply::Correct { awarded: 0.75 }
    );
    flow.next().unwrap();

    assert_eq!(
        flow.reveal().await.unwrap(),
        &RevealedAnswer::Known("Reference 3".into())
    );
    // Checking a revealed question is a guarded no-op and spends no oracle call.
    assert_eq!(flow.check("too late").await.unwrap(), CheckReply::Ignored);
    flow.next().unwrap();

    flow.check("no").await.unwrap();
    flow.check("still no").await.unwrap();
    flow.check("finally").await.unwrap();
    assert_eq!(flow.next().unwrap(), Advance::Finished);

    let report = flow.report().unwrap();
    let awarded: Vec<f64> = report.breakdown().iter().map(|q| q.awarded).collect();
    assert_eq!(awarded, vec![1.0, 0.75, 0.0, 0.5]);
    assert_eq!(report.total(), 2.25);
    assert_eq!(report.percent(), 56.25);
    assert_eq!(report.motivation(), Motivation::Ok);
    assert_eq!(report.motivation().message(), "You did it ok!");
}

#[tokio::test]
async fn oracle_failure_leaves_question_open_for_retry() {
    let oracle = ScriptedOracle::new([Err(()), Ok(true)], []);
    let mut flow = flow(vec![open(1)], oracle);

    let err = flow.check("an answer").await.unwrap_err();
    assert!(matches!(err, QuizFlowError::Evaluation(_)));

    // No score mutation, no cap decay; the player may simply retry.
    assert_eq!(flow.session().answer_state(), AnswerState::Answering);
    assert_eq!(flow.session().attempt_cap(), 1.0);
    assert_eq!(flow.session().score(), 0.0);

    assert_eq!(
        flow.check("an answer").await.unwrap(),
        CheckReply::Correct { awarded: 1.0 }
    );
}

#[tokio::test]
async fn reveal_fetch_failure_still_forfeits_and_allows_advance() {
    let oracle = ScriptedOracle::new([], [Err(())]);
    let mut flow = flow(vec![open(1)], oracle);

    assert_eq!(flow.reveal().await.unwrap(), &RevealedAnswer::Unavailable);
    assert_eq!(flow.session().attempt_cap(), 0.0);

    assert_eq!(flow.next().unwrap(), Advance::Finished);
    let report = flow.report().unwrap();
    assert_eq!(report.total(), 0.0);
    assert_eq!(report.percent(), 0.0);
    assert_eq!(report.motivation(), Motivation::Bad);
}

#[tokio::test]
async fn multiple_choice_reveal_needs_no_oracle() {
    let mut flow = flow(vec![multiple()], ScriptedOracle::silent());
    assert_eq!(
        flow.reveal().await.unwrap(),
        &RevealedAnswer::Known("B".into())
    );
    assert_eq!(flow.revealed_answer(), Some(&RevealedAnswer::Known("B".into())));
}

#[tokio::test]
async fn invalid_choice_letter_is_rejected_without_scoring() {
    let mut flow = flow(vec![multiple()], ScriptedOracle::silent());

    let err = flow.check("E").await.unwrap_err();
    assert!(matches!(err, QuizFlowError::InvalidChoice { .. }));
    assert_eq!(flow.session().attempt_cap(), 1.0);

    assert_eq!(
        flow.check("a").await.unwrap(),
        CheckReply::Wrong {
            remaining_cap: 0.75
        }
    );
}

#[tokio::test]
async fn finished_flow_rejects_further_checks() {
    let mut flow = flow(vec![multiple()], ScriptedOracle::silent());
    flow.check("B").await.unwrap();
    assert_eq!(flow.next().unwrap(), Advance::Finished);

    assert!(matches!(
        flow.check("B").await.unwrap_err(),
        QuizFlowError::Session(SessionError::Completed)
    ));
}

#[tokio::test]
async fn details_toggle_is_reversible_and_non_scoring() {
    let mut flow = flow(vec![multiple()], ScriptedOracle::silent());

    assert!(matches!(
        flow.toggle_details().unwrap_err(),
        QuizFlowError::Session(SessionError::NotCompleted)
    ));

    flow.check("B").await.unwrap();
    flow.next().unwrap();

    let before = flow.report().unwrap();
    assert!(flow.toggle_details().unwrap());
    assert!(!flow.toggle_details().unwrap());
    assert_eq!(flow.report().unwrap(), before);
}

#[tokio::test]
async fn next_clears_the_stored_reveal() {
    let oracle = ScriptedOracle::new([Ok(true)], [Ok("Reference 1".to_string())]);
    let mut flow = flow(vec![open(1), open(2)], oracle);

    flow.reveal().await.unwrap();
    assert!(flow.revealed_answer().is_some());

    flow.next().unwrap();
    assert!(flow.revealed_answer().is_none());

    flow.check("right").await.unwrap();
    assert_eq!(flow.next().unwrap(), Advance::Finished);
}
