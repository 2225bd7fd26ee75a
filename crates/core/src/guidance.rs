//! Per-question guidance state machine.
//!
//! A question starts in [`AttemptPhase::Answering`]. A submission with any
//! wrong answer moves it into [`AttemptPhase::Guiding`], where the learner
//! clears each step's gates, reads the tips and reports whether their own
//! working matched. Finishing the last step, or submitting all-correct
//! answers at any point, reveals the solution and records the question.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{
    AnswerCheck, AnswerId, AnswerStatus, AnswerVerdict, Gate, Question, QuestionId,
    QuestionResult, StepInteraction,
};
use crate::time::whole_seconds_between;

//
// ─── STATE TYPES ───────────────────────────────────────────────────────────────
//

/// Position inside the guided walkthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuideCursor {
    pub step: usize,
    pub gate: usize,
    /// The learner said their working did not match and is correcting it.
    pub paused_for_fix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Answering,
    Guiding(GuideCursor),
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Success,
    Partial,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedback {
    pub tone: FeedbackTone,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateFeedback {
    pub tone: GateTone,
    pub message: String,
    /// Set when the gate is cleared and the cursor moves on once acknowledged.
    pub advance_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub verdict: AnswerVerdict,
    /// Present when this submission finished the question.
    pub recorded: Option<QuestionResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Correct,
    Wrong,
    ReasoningRevealed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepAdvance {
    NextStep(usize),
    PausedForFix,
    Completed(QuestionResult),
}

/// How a step's region on the solution image should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Covered,
    /// Still covered, framed as the step being worked on.
    Highlighted,
    Revealed { current: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Hidden,
    Active,
    Solved,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Everything the learner has done on the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionAttempt {
    question_id: QuestionId,
    started_at: DateTime<Utc>,
    inputs: HashMap<AnswerId, String>,
    last_validation: Option<Vec<AnswerStatus>>,
    first_try: Option<Vec<AnswerStatus>>,
    feedback: Option<SubmitFeedback>,
    gate_feedback: Option<GateFeedback>,
    phase: AttemptPhase,
    interactions: Vec<StepInteraction>,
}

impl QuestionAttempt {
    #[must_use]
    pub fn new(question: &Question, started_at: DateTime<Utc>) -> Self {
        Self {
            question_id: question.id.clone(),
            started_at,
            inputs: HashMap::new(),
            last_validation: None,
            first_try: None,
            feedback: None,
            gate_feedback: None,
            phase: AttemptPhase::Answering,
            interactions: question
                .steps
                .iter()
                .map(|step| StepInteraction::new(step.id.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> Option<GuideCursor> {
        match self.phase {
            AttemptPhase::Guiding(cursor) => Some(cursor),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_guiding(&self) -> bool {
        matches!(self.phase, AttemptPhase::Guiding(_))
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.phase == AttemptPhase::Revealed
    }

    #[must_use]
    pub fn input(&self, id: &AnswerId) -> &str {
        self.inputs.get(id).map_or("", String::as_str)
    }

    /// Latest check result for one answer, cleared as soon as that input is edited.
    #[must_use]
    pub fn validation_for(&self, id: &AnswerId) -> Option<&AnswerStatus> {
        self.last_validation
            .as_ref()
            .and_then(|statuses| statuses.iter().find(|status| &status.answer_id == id))
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&SubmitFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn gate_feedback(&self) -> Option<&GateFeedback> {
        self.gate_feedback.as_ref()
    }

    #[must_use]
    pub fn interactions(&self) -> &[StepInteraction] {
        &self.interactions
    }

    #[must_use]
    pub fn first_try(&self) -> Option<&[AnswerStatus]> {
        self.first_try.as_deref()
    }

    #[must_use]
    pub fn show_fix_prompt(&self) -> bool {
        self.cursor().is_some_and(|cursor| cursor.paused_for_fix)
    }

    fn advance_pending(&self) -> bool {
        self.gate_feedback
            .as_ref()
            .is_some_and(|feedback| feedback.advance_pending)
    }

    pub fn set_input(&mut self, id: &AnswerId, value: impl Into<String>) {
        if self.is_revealed() {
            return;
        }
        self.inputs.insert(id.clone(), value.into());
        if let Some(statuses) = self.last_validation.as_mut() {
            statuses.retain(|status| &status.answer_id != id);
        }
    }

    /// Check the current inputs against every final answer.
    ///
    /// Returns `None` once the solution has been revealed.
    pub fn submit(&mut self, question: &Question, now: DateTime<Utc>) -> Option<SubmitOutcome> {
        if self.is_revealed() {
            return None;
        }

        let inputs = &self.inputs;
        let check = AnswerCheck::run(&question.final_answers, |id| {
            inputs.get(id).map(String::as_str)
        });
        let verdict = check.verdict();
        let statuses = check.into_statuses();
        let first_try = self
            .first_try
            .get_or_insert_with(|| statuses.clone())
            .clone();
        self.last_validation = Some(statuses);

        let recorded = match verdict {
            AnswerVerdict::AllCorrect => {
                self.feedback = Some(SubmitFeedback {
                    tone: FeedbackTone::Success,
                    message: "Brilliant! All answers are correct.".to_string(),
                });
                Some(self.reveal(first_try, now))
            }
            AnswerVerdict::Partial { correct, total } => {
                self.feedback = Some(SubmitFeedback {
                    tone: FeedbackTone::Partial,
                    message: format!(
                        "Partially correct ({correct}/{total}). Review the guided steps."
                    ),
                });
                self.enter_guidance(question, first_try, now)
            }
            AnswerVerdict::Incorrect => {
                self.feedback = Some(SubmitFeedback {
                    tone: FeedbackTone::Incorrect,
                    message: "Incorrect. Let's work through the steps together.".to_string(),
                });
                self.enter_guidance(question, first_try, now)
            }
        };

        Some(SubmitOutcome { verdict, recorded })
    }

    fn enter_guidance(
        &mut self,
        question: &Question,
        first_try: Vec<AnswerStatus>,
        now: DateTime<Utc>,
    ) -> Option<QuestionResult> {
        if self.is_guiding() {
            return None;
        }
        if question.steps.is_empty() {
            return Some(self.reveal(first_try, now));
        }
        self.phase = AttemptPhase::Guiding(GuideCursor::default());
        None
    }

    fn current_gate<'q>(&self, question: &'q Question) -> Option<&'q Gate> {
        let cursor = self.cursor()?;
        question.step(cursor.step)?.gates.get(cursor.gate)
    }

    /// Pick an option on the active multiple-choice gate.
    pub fn choose_option(&mut self, question: &Question, choice: usize) -> Option<GateOutcome> {
        if self.advance_pending() {
            return None;
        }
        let Some(Gate::Mcq(gate)) = self.current_gate(question) else {
            return None;
        };
        if choice >= gate.options.len() {
            return None;
        }

        if gate.is_correct(choice) {
            self.gate_feedback = Some(GateFeedback {
                tone: GateTone::Success,
                message: gate.correct_feedback().to_string(),
                advance_pending: true,
            });
            return Some(GateOutcome::Correct);
        }

        self.gate_feedback = Some(GateFeedback {
            tone: GateTone::Error,
            message: gate.wrong_feedback().to_string(),
            advance_pending: false,
        });
        let step = self.cursor().map_or(0, |cursor| cursor.step);
        if let Some(interaction) = self.interactions.get_mut(step) {
            interaction.attempts_before_correct =
                interaction.attempts_before_correct.saturating_add(1);
        }
        Some(GateOutcome::Wrong)
    }

    /// Open the explanation of the active self-check gate.
    pub fn reveal_reasoning(&mut self, question: &Question) -> Option<GateOutcome> {
        if self.advance_pending() {
            return None;
        }
        let Some(Gate::SelfCheck(_)) = self.current_gate(question) else {
            return None;
        };
        self.gate_feedback = Some(GateFeedback {
            tone: GateTone::Success,
            message: "Reasoning Revealed".to_string(),
            advance_pending: true,
        });
        Some(GateOutcome::ReasoningRevealed)
    }

    /// Move past a cleared gate. Returns `false` when nothing was pending.
    pub fn acknowledge_gate_feedback(&mut self) -> bool {
        if !self.advance_pending() {
            return false;
        }
        let AttemptPhase::Guiding(cursor) = &mut self.phase else {
            return false;
        };
        cursor.gate += 1;
        self.gate_feedback = None;
        true
    }

    #[must_use]
    pub fn gate_state(&self, index: usize) -> GateState {
        match self.cursor() {
            Some(cursor) if index < cursor.gate => GateState::Solved,
            Some(cursor) if index == cursor.gate => GateState::Active,
            _ => GateState::Hidden,
        }
    }

    /// All gates of the current step are cleared; tips and the self-report are due.
    #[must_use]
    pub fn is_waiting_for_self_report(&self, question: &Question) -> bool {
        self.cursor().is_some_and(|cursor| {
            question
                .step(cursor.step)
                .is_some_and(|step| cursor.gate >= step.gates.len())
        })
    }

    /// Record whether the learner's own working matched the step's tips.
    pub fn self_report(
        &mut self,
        question: &Question,
        got_it: bool,
        now: DateTime<Utc>,
    ) -> Option<StepAdvance> {
        if !self.is_waiting_for_self_report(question) || self.show_fix_prompt() {
            return None;
        }
        let cursor = self.cursor()?;
        if let Some(interaction) = self.interactions.get_mut(cursor.step) {
            interaction.was_fixed = !got_it;
            interaction.completed = true;
        }

        if got_it {
            return Some(self.move_to_next_step(question, now));
        }
        if let AttemptPhase::Guiding(cursor) = &mut self.phase {
            cursor.paused_for_fix = true;
        }
        Some(StepAdvance::PausedForFix)
    }

    /// Leave the fix pause and carry on with the walkthrough.
    pub fn continue_after_fix(
        &mut self,
        question: &Question,
        now: DateTime<Utc>,
    ) -> Option<StepAdvance> {
        if !self.show_fix_prompt() {
            return None;
        }
        Some(self.move_to_next_step(question, now))
    }

    fn move_to_next_step(&mut self, question: &Question, now: DateTime<Utc>) -> StepAdvance {
        let next = self.cursor().map_or(0, |cursor| cursor.step + 1);
        if next < question.steps.len() {
            self.phase = AttemptPhase::Guiding(GuideCursor {
                step: next,
                gate: 0,
                paused_for_fix: false,
            });
            return StepAdvance::NextStep(next);
        }
        let first_try = self.first_try.clone().unwrap_or_default();
        StepAdvance::Completed(self.reveal(first_try, now))
    }

    fn reveal(&mut self, statuses: Vec<AnswerStatus>, now: DateTime<Utc>) -> QuestionResult {
        self.phase = AttemptPhase::Revealed;
        self.gate_feedback = None;
        QuestionResult {
            question_id: self.question_id.clone(),
            time_taken_seconds: whole_seconds_between(self.started_at, now),
            final_answers_status: statuses,
            step_interactions: self.interactions.clone(),
        }
    }

    #[must_use]
    pub fn region_state(&self, question: &Question, index: usize) -> RegionState {
        match self.phase {
            AttemptPhase::Revealed => RegionState::Revealed { current: false },
            AttemptPhase::Answering => RegionState::Covered,
            AttemptPhase::Guiding(cursor) => {
                if index < cursor.step {
                    RegionState::Revealed { current: false }
                } else if index == cursor.step {
                    if self.is_waiting_for_self_report(question) {
                        RegionState::Revealed { current: true }
                    } else {
                        RegionState::Highlighted
                    }
                } else {
                    RegionState::Covered
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionSet;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn question() -> Question {
        let raw = r#"[{
            "id": "q1",
            "text": "Compute the pair.",
            "solutionImageUrl": "sol.png",
            "finalAnswers": [
                { "id": "a", "label": "A", "value": 2.0, "tolerance": 0.1 },
                { "id": "b", "label": "B", "value": -1.0, "tolerance": 0 }
            ],
            "steps": [
                {
                    "id": "s1",
                    "region": { "x": 0, "y": 0, "w": 1, "h": 0.5 },
                    "tips": ["tip one"],
                    "gates": [
                        { "type": "MCQ", "question": "Pick", "options": ["x", "y", "z"], "correctIndex": 2, "wrongFeedback": "Nope" },
                        { "type": "SelfCheck", "question": "Explain", "revealText": "Because" }
                    ]
                },
                {
                    "id": "s2",
                    "region": { "x": 0, "y": 0.5, "w": 1, "h": 0.5 },
                    "tips": ["tip two"]
                }
            ]
        }]"#;
        QuestionSet::from_json(raw).unwrap().get(0).unwrap().clone()
    }

    fn answer(attempt: &mut QuestionAttempt, a: &str, b: &str) {
        attempt.set_input(&AnswerId::new("a"), a);
        attempt.set_input(&AnswerId::new("b"), b);
    }

    fn clear_step_one(attempt: &mut QuestionAttempt, q: &Question) {
        assert_eq!(attempt.choose_option(q, 2), Some(GateOutcome::Correct));
        assert!(attempt.acknowledge_gate_feedback());
        assert_eq!(attempt.reveal_reasoning(q), Some(GateOutcome::ReasoningRevealed));
        assert!(attempt.acknowledge_gate_feedback());
    }

    #[test]
    fn all_correct_on_first_try_reveals_and_records() {
        let q = question();
        let start = fixed_now();
        let mut attempt = QuestionAttempt::new(&q, start);
        answer(&mut attempt, "2.05", "-1");

        let outcome = attempt.submit(&q, start + Duration::seconds(12)).unwrap();
        assert_eq!(outcome.verdict, AnswerVerdict::AllCorrect);
        let result = outcome.recorded.expect("question recorded");
        assert_eq!(result.time_taken_seconds, 12);
        assert!(result.final_answers_status.iter().all(|s| s.is_correct));
        assert_eq!(result.step_interactions.len(), 2);
        assert!(attempt.is_revealed());
        assert_eq!(attempt.feedback().unwrap().tone, FeedbackTone::Success);
        assert_eq!(
            attempt.region_state(&q, 1),
            RegionState::Revealed { current: false }
        );
    }

    #[test]
    fn partial_submission_starts_guidance() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        answer(&mut attempt, "2", "7");

        let outcome = attempt.submit(&q, fixed_now()).unwrap();
        assert_eq!(outcome.verdict, AnswerVerdict::Partial { correct: 1, total: 2 });
        assert!(outcome.recorded.is_none());
        let feedback = attempt.feedback().unwrap();
        assert_eq!(feedback.tone, FeedbackTone::Partial);
        assert_eq!(
            feedback.message,
            "Partially correct (1/2). Review the guided steps."
        );
        assert_eq!(attempt.cursor(), Some(GuideCursor::default()));
        assert_eq!(attempt.region_state(&q, 0), RegionState::Highlighted);
        assert_eq!(attempt.region_state(&q, 1), RegionState::Covered);
    }

    #[test]
    fn incorrect_submission_uses_incorrect_feedback() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        let outcome = attempt.submit(&q, fixed_now()).unwrap();
        assert_eq!(outcome.verdict, AnswerVerdict::Incorrect);
        assert_eq!(attempt.feedback().unwrap().tone, FeedbackTone::Incorrect);
        assert!(attempt.is_guiding());
        assert!(attempt.validation_for(&AnswerId::new("a")).is_some());
    }

    #[test]
    fn editing_an_input_clears_only_its_marker() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        answer(&mut attempt, "0", "0");
        attempt.submit(&q, fixed_now());

        attempt.set_input(&AnswerId::new("a"), "2");
        assert!(attempt.validation_for(&AnswerId::new("a")).is_none());
        assert!(attempt.validation_for(&AnswerId::new("b")).is_some());
        assert_eq!(attempt.input(&AnswerId::new("a")), "2");
    }

    #[test]
    fn wrong_choices_count_attempts_and_block_nothing() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        attempt.submit(&q, fixed_now());

        assert_eq!(attempt.choose_option(&q, 0), Some(GateOutcome::Wrong));
        assert_eq!(attempt.gate_feedback().unwrap().message, "Nope");
        assert_eq!(attempt.choose_option(&q, 1), Some(GateOutcome::Wrong));
        assert_eq!(attempt.interactions()[0].attempts_before_correct, 2);
        assert_eq!(attempt.gate_state(0), GateState::Active);

        assert_eq!(attempt.choose_option(&q, 2), Some(GateOutcome::Correct));
        assert_eq!(attempt.gate_feedback().unwrap().message, "Correct!");
        // Further clicks wait for the pending advance.
        assert_eq!(attempt.choose_option(&q, 0), None);
        assert_eq!(attempt.interactions()[0].attempts_before_correct, 2);

        assert!(attempt.acknowledge_gate_feedback());
        assert_eq!(attempt.gate_state(0), GateState::Solved);
        assert_eq!(attempt.gate_state(1), GateState::Active);
        assert!(attempt.gate_feedback().is_none());
    }

    #[test]
    fn gates_must_match_their_kind() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        attempt.submit(&q, fixed_now());
        assert_eq!(attempt.reveal_reasoning(&q), None);
        assert_eq!(attempt.choose_option(&q, 9), None);
        assert!(!attempt.acknowledge_gate_feedback());
    }

    #[test]
    fn no_gate_interaction_before_guidance() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        assert_eq!(attempt.choose_option(&q, 2), None);
        assert!(!attempt.is_waiting_for_self_report(&q));
        assert_eq!(attempt.self_report(&q, true, fixed_now()), None);
    }

    #[test]
    fn self_report_waits_for_all_gates() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        attempt.submit(&q, fixed_now());
        assert_eq!(attempt.self_report(&q, true, fixed_now()), None);

        clear_step_one(&mut attempt, &q);
        assert!(attempt.is_waiting_for_self_report(&q));
        assert_eq!(
            attempt.region_state(&q, 0),
            RegionState::Revealed { current: true }
        );
    }

    #[test]
    fn needing_a_fix_pauses_until_continue() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        attempt.submit(&q, fixed_now());
        clear_step_one(&mut attempt, &q);

        assert_eq!(
            attempt.self_report(&q, false, fixed_now()),
            Some(StepAdvance::PausedForFix)
        );
        assert!(attempt.show_fix_prompt());
        assert!(attempt.interactions()[0].was_fixed);
        assert!(attempt.interactions()[0].completed);
        // A second report is ignored while paused.
        assert_eq!(attempt.self_report(&q, true, fixed_now()), None);

        assert_eq!(
            attempt.continue_after_fix(&q, fixed_now()),
            Some(StepAdvance::NextStep(1))
        );
        assert!(!attempt.show_fix_prompt());
        assert_eq!(attempt.continue_after_fix(&q, fixed_now()), None);
    }

    #[test]
    fn finishing_the_last_step_records_first_try_answers() {
        let q = question();
        let start = fixed_now();
        let mut attempt = QuestionAttempt::new(&q, start);
        answer(&mut attempt, "9", "9");
        attempt.submit(&q, start);
        clear_step_one(&mut attempt, &q);
        assert_eq!(
            attempt.self_report(&q, true, start),
            Some(StepAdvance::NextStep(1))
        );

        // Step two has no gates: the self-report is due right away.
        assert!(attempt.is_waiting_for_self_report(&q));
        let advance = attempt
            .self_report(&q, true, start + Duration::seconds(65))
            .unwrap();
        let StepAdvance::Completed(result) = advance else {
            panic!("expected completion, got {advance:?}");
        };
        assert_eq!(result.time_taken_seconds, 65);
        assert_eq!(result.final_answers_status[0].user_value, Some(9.0));
        assert!(result.step_interactions.iter().all(|s| s.completed));
        assert!(!result.step_interactions[0].was_fixed);
        assert!(attempt.is_revealed());
    }

    #[test]
    fn correct_resubmission_during_guidance_keeps_first_try() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        answer(&mut attempt, "2", "0");
        attempt.submit(&q, fixed_now());
        assert_eq!(attempt.choose_option(&q, 0), Some(GateOutcome::Wrong));

        answer(&mut attempt, "2", "-1");
        let outcome = attempt.submit(&q, fixed_now()).unwrap();
        let result = outcome.recorded.unwrap();
        assert!(!result.final_answers_status[1].is_correct);
        assert_eq!(result.step_interactions[0].attempts_before_correct, 1);
        assert!(attempt.validation_for(&AnswerId::new("b")).unwrap().is_correct);
    }

    #[test]
    fn repeated_wrong_submission_keeps_cursor() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        attempt.submit(&q, fixed_now());
        clear_step_one(&mut attempt, &q);
        attempt.submit(&q, fixed_now());
        assert_eq!(attempt.cursor().unwrap().gate, 2);
    }

    #[test]
    fn revealed_attempt_ignores_input() {
        let q = question();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        answer(&mut attempt, "2", "-1");
        attempt.submit(&q, fixed_now());

        attempt.set_input(&AnswerId::new("a"), "100");
        assert_eq!(attempt.input(&AnswerId::new("a")), "2");
        assert!(attempt.submit(&q, fixed_now()).is_none());
    }

    #[test]
    fn question_without_steps_reveals_on_failure() {
        let mut q = question();
        q.steps.clear();
        let mut attempt = QuestionAttempt::new(&q, fixed_now());
        let outcome = attempt.submit(&q, fixed_now()).unwrap();
        assert!(outcome.recorded.is_some());
        assert!(attempt.is_revealed());
    }
}
