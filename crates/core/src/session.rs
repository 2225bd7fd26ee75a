use chrono::{DateTime, Utc};

use crate::guidance::{GateOutcome, QuestionAttempt, StepAdvance, SubmitOutcome};
use crate::model::{AnswerId, Question, QuestionResult, QuestionSet, SessionReport};
use crate::time::whole_seconds_between;

/// A learner working through one question set, question by question.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSession {
    code: String,
    set: QuestionSet,
    index: usize,
    started_at: DateTime<Utc>,
    attempt: QuestionAttempt,
    results: Vec<QuestionResult>,
    finished: bool,
}

impl PracticeSession {
    #[must_use]
    pub fn start(code: impl Into<String>, set: QuestionSet, now: DateTime<Utc>) -> Self {
        let attempt = QuestionAttempt::new(&set.questions()[0], now);
        Self {
            code: code.into(),
            set,
            index: 0,
            started_at: now,
            attempt,
            results: Vec::new(),
            finished: false,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.set.questions()[self.index]
    }

    /// 1-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.position() == self.total()
    }

    #[must_use]
    pub fn attempt(&self) -> &QuestionAttempt {
        &self.attempt
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        whole_seconds_between(self.started_at, now)
    }

    fn record(&mut self, result: &QuestionResult) {
        self.results.push(result.clone());
    }

    pub fn set_input(&mut self, id: &AnswerId, value: impl Into<String>) {
        self.attempt.set_input(id, value);
    }

    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<SubmitOutcome> {
        let question = &self.set.questions()[self.index];
        let outcome = self.attempt.submit(question, now)?;
        if let Some(result) = outcome.recorded.as_ref() {
            self.record(result);
        }
        Some(outcome)
    }

    pub fn choose_option(&mut self, choice: usize) -> Option<GateOutcome> {
        let question = &self.set.questions()[self.index];
        self.attempt.choose_option(question, choice)
    }

    pub fn reveal_reasoning(&mut self) -> Option<GateOutcome> {
        let question = &self.set.questions()[self.index];
        self.attempt.reveal_reasoning(question)
    }

    pub fn acknowledge_gate_feedback(&mut self) -> bool {
        self.attempt.acknowledge_gate_feedback()
    }

    pub fn self_report(&mut self, got_it: bool, now: DateTime<Utc>) -> Option<StepAdvance> {
        let question = &self.set.questions()[self.index];
        let advance = self.attempt.self_report(question, got_it, now)?;
        if let StepAdvance::Completed(result) = &advance {
            self.record(result);
        }
        Some(advance)
    }

    pub fn continue_after_fix(&mut self, now: DateTime<Utc>) -> Option<StepAdvance> {
        let question = &self.set.questions()[self.index];
        let advance = self.attempt.continue_after_fix(question, now)?;
        if let StepAdvance::Completed(result) = &advance {
            self.record(result);
        }
        Some(advance)
    }

    /// Move on once the current solution is revealed.
    ///
    /// Returns `false` if the current question is still open.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> bool {
        if !self.attempt.is_revealed() || self.finished {
            return false;
        }
        if self.is_last_question() {
            self.finished = true;
            return true;
        }
        self.index += 1;
        self.attempt = QuestionAttempt::new(&self.set.questions()[self.index], now);
        true
    }

    #[must_use]
    pub fn report(&self, now: DateTime<Utc>) -> SessionReport {
        SessionReport::new(now, self.elapsed_seconds(now), self.results.clone())
    }
}
