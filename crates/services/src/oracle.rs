use async_trait::async_trait;

use crate::ai::AiClient;
use crate::error::OracleError;

/// Judges free-form answers and supplies reference answers.
///
/// A non-deterministic black box; the quiz flow only consumes verdicts and
/// never assumes two calls with the same inputs agree.
#[async_trait]
pub trait AnswerOracle: Send + Sync {
    /// Is `user_answer` an acceptable answer to `question`, given the source
    /// text and the generator's reference answer?
    ///
    /// # Errors
    ///
    /// Returns `OracleError` on transport failure or an unusable verdict.
    async fn evaluate(
        &self,
        source: &str,
        question: &str,
        user_answer: &str,
        reference: &str,
    ) -> Result<bool, OracleError>;

    /// Produce the reference answer text shown when a question is revealed.
    ///
    /// # Errors
    ///
    /// Returns `OracleError` on transport failure or an empty answer.
    async fn reveal(&self, source: &str, question: &str) -> Result<String, OracleError>;
}

/// AI-backed oracle.
#[derive(Clone)]
pub struct AiAnswerOracle {
    client: AiClient,
}

impl AiAnswerOracle {
    #[must_use]
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerOracle for AiAnswerOracle {
    async fn evaluate(
        &self,
        source: &str,
        question: &str,
        user_answer: &str,
        reference: &str,
    ) -> Result<bool, OracleError> {
        let prompt = format!(
            "Given the following text:\n{source}\n\n\
             Is the following answer correct for the question \"{question}\"?\n\
             User answer: \"{user_answer}\"\n\
             Correct answer: \"{reference}\"\n\
             Respond only with \"correct\" or \"wrong\"."
        );
        let output = self.client.generate(&prompt).await?;
        parse_verdict(&output)
    }

    async fn reveal(&self, source: &str, question: &str) -> Result<String, OracleError> {
        let prompt = format!(
            "Based on the following text:\n{source}\n\n\
             What is the correct answer to the question: \"{question}\"?\n\
             Give only the answer."
        );
        let output = self.client.generate(&prompt).await?;
        Ok(output.trim().to_string())
    }
}

/// Map the oracle's free-text verdict to a boolean.
///
/// "incorrect" is checked before "correct" so it cannot be misread as a
/// positive verdict. Anything that mentions neither word is surfaced as an
/// error instead of being guessed.
fn parse_verdict(output: &str) -> Result<bool, OracleError> {
    let normalized = output.trim().to_ascii_lowercase();
    if normalized.contains("incorrect") || normalized.contains("wrong") {
        Ok(false)
    } else if normalized.contains("correct") {
        Ok(true)
    } else {
        Err(OracleError::UnrecognizedVerdict {
            raw: output.trim().to_string(),
        })
    }
}
