use serde::{Deserialize, Serialize};

use crate::model::ids::AnswerId;
use crate::model::question::FinalAnswer;

/// Parse learner input into a finite number.
///
/// Blank, non-numeric and non-finite input yields `None`.
#[must_use]
pub fn parse_answer_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Outcome of checking one final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStatus {
    pub answer_id: AnswerId,
    pub label: String,
    pub is_correct: bool,
    pub user_value: Option<f64>,
}

impl FinalAnswer {
    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        (value - self.value).abs() <= self.tolerance
    }

    #[must_use]
    pub fn check(&self, input: &str) -> AnswerStatus {
        let user_value = parse_answer_input(input);
        AnswerStatus {
            answer_id: self.id.clone(),
            label: self.label.clone(),
            is_correct: user_value.is_some_and(|value| self.accepts(value)),
            user_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    AllCorrect,
    Partial { correct: usize, total: usize },
    Incorrect,
}

/// Result of checking every final answer of a question at once.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    statuses: Vec<AnswerStatus>,
}

impl AnswerCheck {
    /// Check all answers, looking up learner input by answer id.
    pub fn run<'a>(
        answers: &[FinalAnswer],
        mut input_for: impl FnMut(&AnswerId) -> Option<&'a str>,
    ) -> Self {
        let statuses = answers
            .iter()
            .map(|answer| answer.check(input_for(&answer.id).unwrap_or_default()))
            .collect();
        Self { statuses }
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.statuses.iter().filter(|status| status.is_correct).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    #[must_use]
    pub fn verdict(&self) -> AnswerVerdict {
        let correct = self.correct_count();
        let total = self.total();
        if correct == total {
            AnswerVerdict::AllCorrect
        } else if correct > 0 {
            AnswerVerdict::Partial { correct, total }
        } else {
            AnswerVerdict::Incorrect
        }
    }

    #[must_use]
    pub fn statuses(&self) -> &[AnswerStatus] {
        &self.statuses
    }

    #[must_use]
    pub fn into_statuses(self) -> Vec<AnswerStatus> {
        self.statuses
    }
}
