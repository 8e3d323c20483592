use async_trait::async_trait;
use std::fmt::Write as _;

use quiz_core::{QuestionDraft, QuestionSet};

use crate::ai::AiClient;
use crate::error::GeneratorError;

/// Mix of question types to request from the generator.
///
/// `Mixed` follows the original 30/70 split: 30% open, rounded, rest
/// multiple choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeMix {
    OpenOnly,
    MultipleOnly,
    Mixed,
}

impl TypeMix {
    /// Split a total count into `(open, multiple)` question counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn split(self, count: usize) -> (usize, usize) {
        match self {
            TypeMix::OpenOnly => (count, 0),
            TypeMix::MultipleOnly => (0, count),
            TypeMix::Mixed => {
                let open = (count as f64 * 0.3).round() as usize;
                (open, count - open)
            }
        }
    }
}

/// What to generate a question set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub title: String,
    pub text: String,
    pub count: usize,
    pub mix: TypeMix,
}

/// Produces an ordered question set for a study plan.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GeneratorError` when the request is invalid, the AI call
    /// fails, or the output cannot be parsed into a non-empty question set.
    async fn generate(&self, request: &GenerateRequest) -> Result<QuestionSet, GeneratorError>;
}

/// AI-backed question generator.
#[derive(Clone)]
pub struct AiQuestionGenerator {
    client: AiClient,
}

impl AiQuestionGenerator {
    #[must_use]
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionGenerator for AiQuestionGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<QuestionSet, GeneratorError> {
        if request.count == 0 {
            return Err(GeneratorError::ZeroCount);
        }

        let prompt = build_prompt(request);
        let output = self.client.generate(&prompt).await?;
        parse_question_set(&output)
    }
}

fn build_prompt(request: &GenerateRequest) -> String {
    let (open, multiple) = request.mix.split(request.count);

    let mut prompt = format!(
        "Based on the following title and text, generate {} quiz questions.",
        request.count
    );
    if open > 0 && multiple > 0 {
        prompt.push_str(" 30% should be open questions and 70% should be multiple choice (A, B, C, D).");
    } else if open > 0 {
        prompt.push_str(" All should be open questions.");
    } else {
        prompt.push_str(" All should be multiple choice (A, B, C, D).");
    }
    let _ = write!(prompt, "\nTitle: {}\nText: {}\n", request.title, request.text);
    prompt.push_str(
        "For open questions, provide only the question and the answer. \
         For multiple choice, provide the question, four options (A, B, C, D), \
         and indicate the correct answer. Format as JSON array like this:\n",
    );
    prompt.push_str(
        r#"[{"type":"open","question":"...","answer":"..."},{"type":"multiple","question":"...","options":["A) ...","B) ...","C) ...","D) ..."],"answer":"B"}]"#,
    );
    prompt
}

/// Extract and validate the question array from raw generator output.
///
/// Only basic extraction is attempted: the slice between the first `[` and
/// the last `]`. Anything else (markdown fences, chatter around the array)
/// is tolerated only as long as that slice parses.
fn parse_question_set(output: &str) -> Result<QuestionSet, GeneratorError> {
    let start = output.find('[').ok_or(GeneratorError::MissingJsonArray)?;
    let end = output.rfind(']').ok_or(GeneratorError::MissingJsonArray)?;
    if end < start {
        return Err(GeneratorError::MissingJsonArray);
    }

    let drafts: Vec<QuestionDraft> = serde_json::from_str(&output[start..=end])?;
    log::debug!("generator returned {} question drafts", drafts.len());

    let questions = drafts
        .into_iter()
        .map(QuestionDraft::validate)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionSet::new(questions)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::QuestionKind;

    #[test]
    fn mix_split_follows_thirty_seventy() {
        assert_eq!(TypeMix::Mixed.split(10), (3, 7));
        assert_eq!(TypeMix::Mixed.split(4), (1, 3));
        assert_eq!(TypeMix::Mixed.split(1), (0, 1));
        assert_eq!(TypeMix::OpenOnly.split(5), (5, 0));
        assert_eq!(TypeMix::MultipleOnly.split(5), (0, 5));
    }

    #[test]
    fn prompt_states_the_mix() {
        let request = GenerateRequest {
            title: "Borrowing".into(),
            text: "Notes about borrowing.".into(),
            count: 10,
            mix: TypeMix::Mixed,
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("generate 10 quiz questions"));
        assert!(prompt.contains("30% should be open"));
        assert!(prompt.contains("Title: Borrowing"));
        assert!(prompt.contains("Format as JSON array"));

        let open_only = build_prompt(&GenerateRequest {
            mix: TypeMix::OpenOnly,
            ..request
        });
        assert!(open_only.contains("All should be open questions."));
    }

    #[test]
    fn parses_array_embedded_in_chatter() {
        let output = r#"Sure! Here are your questions:
```json
[{"type":"open","question":"What is a borrow?","answer":"A reference."},
 {"type":"multiple","question":"Pick one.","options":["A) x","B) y","C) z","D) w"],"answer":"A"}]
```"#;
        let set = parse_question_set(output).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().kind(), QuestionKind::Open);
        assert_eq!(set.get(1).unwrap().kind(), QuestionKind::Multiple);
    }

    #[test]
    fn output_without_array_is_rejected() {
        assert!(matches!(
            parse_question_set("I could not generate questions."),
            Err(GeneratorError::MissingJsonArray)
        ));
    }

    #[test]
    fn empty_array_is_rejected() {
        assert!(matches!(
            parse_question_set("[]"),
            Err(GeneratorError::QuestionSet(_))
        ));
    }

    #[test]
    fn malformed_array_is_rejected() {
        assert!(matches!(
            parse_question_set(r#"[{"type":"open"}]"#),
            Err(GeneratorError::Parse(_))
        ));
    }
}
