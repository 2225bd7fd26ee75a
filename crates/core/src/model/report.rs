use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::AnswerStatus;
use crate::model::ids::{QuestionId, StepId};

/// How the learner got through one guided step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInteraction {
    pub step_id: StepId,
    /// Wrong multiple-choice picks made in this step.
    pub attempts_before_correct: u32,
    /// The learner reported their own working did not match and went back to fix it.
    pub was_fixed: bool,
    pub completed: bool,
}

impl StepInteraction {
    #[must_use]
    pub fn new(step_id: StepId) -> Self {
        Self {
            step_id,
            attempts_before_correct: 0,
            was_fixed: false,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub time_taken_seconds: u64,
    pub final_answers_status: Vec<AnswerStatus>,
    pub step_interactions: Vec<StepInteraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub timestamp: String,
    pub total_time_seconds: u64,
    pub questions: Vec<QuestionResult>,
}

impl SessionReport {
    #[must_use]
    pub fn new(
        generated_at: DateTime<Utc>,
        total_time_seconds: u64,
        questions: Vec<QuestionResult>,
    ) -> Self {
        Self {
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_time_seconds,
            questions,
        }
    }

    /// Pretty-printed JSON, the format offered for download.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
