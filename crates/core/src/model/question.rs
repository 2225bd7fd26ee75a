use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId, StepId};

const REGION_EPSILON: f64 = 1e-9;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set is not valid JSON: {0}")]
    Parse(String),

    #[error("question set contains no questions")]
    Empty,

    #[error("question id cannot be empty")]
    EmptyQuestionId,

    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question {0} has no final answers")]
    NoFinalAnswers(QuestionId),

    #[error("question {question} repeats final answer id {answer}")]
    DuplicateAnswer {
        question: QuestionId,
        answer: AnswerId,
    },

    #[error(
        "final answer {answer} of question {question} needs a finite value and a non-negative tolerance"
    )]
    InvalidAnswer {
        question: QuestionId,
        answer: AnswerId,
    },

    #[error("question {question} repeats step id {step}")]
    DuplicateStep { question: QuestionId, step: StepId },

    #[error("step {step} of question {question} has a region outside the solution image")]
    InvalidRegion { question: QuestionId, step: StepId },

    #[error("gate {gate} of step {step} in question {question} has no valid correct option")]
    InvalidGate {
        question: QuestionId,
        step: StepId,
        gate: usize,
    },
}

//
// ─── SCHEMA TYPES ──────────────────────────────────────────────────────────────
//

/// Rectangle on the solution image, expressed as fractions of its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Region {
    #[must_use]
    pub fn is_within_unit_square(&self) -> bool {
        let parts = [self.x, self.y, self.w, self.h];
        if parts.iter().any(|v| !v.is_finite()) {
            return false;
        }
        self.x >= 0.0
            && self.y >= 0.0
            && self.w > 0.0
            && self.h > 0.0
            && self.x + self.w <= 1.0 + REGION_EPSILON
            && self.y + self.h <= 1.0 + REGION_EPSILON
    }
}

/// Multiple-choice checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqGate {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_feedback: Option<String>,
}

impl McqGate {
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_index == Some(choice)
    }

    #[must_use]
    pub fn correct_feedback(&self) -> &str {
        self.correct_feedback.as_deref().unwrap_or("Correct!")
    }

    #[must_use]
    pub fn wrong_feedback(&self) -> &str {
        self.wrong_feedback.as_deref().unwrap_or("Try again!")
    }

    fn is_well_formed(&self) -> bool {
        self.correct_index
            .is_some_and(|index| index < self.options.len())
    }
}

/// Self-assessed checkpoint: the learner reasons first, then reveals the explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCheckGate {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Gate {
    #[serde(rename = "MCQ")]
    Mcq(McqGate),
    #[serde(rename = "SelfCheck")]
    SelfCheck(SelfCheckGate),
}

impl Gate {
    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            Gate::Mcq(gate) => &gate.question,
            Gate::SelfCheck(gate) => &gate.question,
        }
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Gate::Mcq(gate) => gate.image_url.as_deref(),
            Gate::SelfCheck(gate) => gate.image_url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    pub region: Region,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gates: Vec<Gate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub id: AnswerId,
    pub label: String,
    pub value: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_image_url: Option<String>,
    pub solution_image_url: String,
    pub final_answers: Vec<FinalAnswer>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Question {
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn final_answer(&self, id: &AnswerId) -> Option<&FinalAnswer> {
        self.final_answers.iter().find(|answer| &answer.id == id)
    }

    fn validate(&self) -> Result<(), QuestionSetError> {
        if self.id.as_str().trim().is_empty() {
            return Err(QuestionSetError::EmptyQuestionId);
        }
        if self.final_answers.is_empty() {
            return Err(QuestionSetError::NoFinalAnswers(self.id.clone()));
        }

        let mut answer_ids = HashSet::new();
        for answer in &self.final_answers {
            if !answer_ids.insert(&answer.id) {
                return Err(QuestionSetError::DuplicateAnswer {
                    question: self.id.clone(),
                    answer: answer.id.clone(),
                });
            }
            if !answer.value.is_finite() || !answer.tolerance.is_finite() || answer.tolerance < 0.0
            {
                return Err(QuestionSetError::InvalidAnswer {
                    question: self.id.clone(),
                    answer: answer.id.clone(),
                });
            }
        }

        let mut step_ids = HashSet::new();
        for step in &self.steps {
            if !step_ids.insert(&step.id) {
                return Err(QuestionSetError::DuplicateStep {
                    question: self.id.clone(),
                    step: step.id.clone(),
                });
            }
            if !step.region.is_within_unit_square() {
                return Err(QuestionSetError::InvalidRegion {
                    question: self.id.clone(),
                    step: step.id.clone(),
                });
            }
            for (index, gate) in step.gates.iter().enumerate() {
                if let Gate::Mcq(mcq) = gate {
                    if !mcq.is_well_formed() {
                        return Err(QuestionSetError::InvalidGate {
                            question: self.id.clone(),
                            step: step.id.clone(),
                            gate: index,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Validated, non-empty list of questions for one practice session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Parse a question set from its JSON document (a top-level array).
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Parse` for malformed JSON and any validation error otherwise.
    pub fn from_json(raw: &str) -> Result<Self, QuestionSetError> {
        let questions: Vec<Question> =
            serde_json::from_str(raw).map_err(|err| QuestionSetError::Parse(err.to_string()))?;
        Self::validate(questions)
    }

    /// # Errors
    ///
    /// Returns `QuestionSetError` when the set is empty, ids collide, or a question is malformed.
    pub fn validate(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut ids = HashSet::new();
        for question in &questions {
            question.validate()?;
            if !ids.insert(&question.id) {
                return Err(QuestionSetError::DuplicateQuestion(question.id.clone()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
