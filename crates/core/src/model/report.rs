use crate::model::question::QuestionSet;

/// Score detail for a single question in a finished quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScore {
    pub index: usize,
    pub prompt: String,
    pub awarded: f64,
}

/// Motivational tier for a finished quiz, evaluated top-down on the percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motivation {
    Excellent,
    Great,
    Ok,
    NotVeryGood,
    Bad,
}

impl Motivation {
    /// Tier for a percentage in `[0, 100]`.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            Motivation::Excellent
        } else if percent > 65.0 {
            Motivation::Great
        } else if percent > 40.0 {
            Motivation::Ok
        } else if percent >= 20.0 {
            Motivation::NotVeryGood
        } else {
            Motivation::Bad
        }
    }

    /// Message shown on the summary screen.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Motivation::Excellent => "You did it excellent!",
            Motivation::Great => "You did it great!",
            Motivation::Ok => "You did it ok!",
            Motivation::NotVeryGood => "Your results are not very good.",
            Motivation::Bad => "Bad result.",
        }
    }
}

/// Final report for a finished quiz session.
///
/// `total` is always the exact sum of the per-question awards; awards are
/// multiples of 0.25, so the sum carries no floating drift.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizReport {
    breakdown: Vec<QuestionScore>,
    total: f64,
    out_of: usize,
}

impl QuizReport {
    pub(crate) fn new(questions: &QuestionSet, scores: &[f64]) -> Self {
        let breakdown: Vec<QuestionScore> = questions
            .iter()
            .zip(scores)
            .enumerate()
            .map(|(index, (question, awarded))| QuestionScore {
                index,
                prompt: question.prompt().to_string(),
                awarded: *awarded,
            })
            .collect();
        let total = scores.iter().sum();

        Self {
            breakdown,
            total,
            out_of: questions.len(),
        }
    }

    #[must_use]
    pub fn breakdown(&self) -> &[QuestionScore] {
        &self.breakdown
    }

    /// Sum of all per-question awards.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of questions the quiz was scored out of.
    #[must_use]
    pub fn out_of(&self) -> usize {
        self.out_of
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        (self.total / self.out_of as f64) * 100.0
    }

    #[must_use]
    pub fn motivation(&self) -> Motivation {
        Motivation::from_percent(self.percent())
    }
}
