use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use tutor_core::model::{AnswerId, Gate, Question, SessionReport};
use tutor_core::{
    AttemptPhase, FeedbackTone, GateOutcome, GateState, GateTone, GuideCursor, PracticeSession,
    RegionState, StepAdvance, resolve_asset_url,
};

use crate::vm::{format_elapsed, sanitize_html};

/// How long a correct multiple-choice answer stays on screen before the next check.
pub const MCQ_ADVANCE_DELAY: Duration = Duration::from_millis(1500);
/// How long "Reasoning Revealed" stays on screen before the next check.
pub const SELF_CHECK_ADVANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    Input { id: AnswerId, value: String },
    Submit,
    Choose(usize),
    RevealReasoning,
    AcknowledgeGate,
    SelfReport { got_it: bool },
    ContinueAfterFix,
    NextQuestion,
}

/// What the view has to do after an intent was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentEffect {
    None,
    /// Call [`SessionVm::acknowledge`] with `gate` once the delay has passed.
    AcknowledgeAfter { delay: Duration, gate: GateTicket },
    Finished,
}

/// Identifies the gate whose feedback a delayed acknowledgement belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateTicket {
    position: usize,
    cursor: Option<GuideCursor>,
}

pub struct SessionVm {
    session: PracticeSession,
    asset_base: String,
}

impl SessionVm {
    #[must_use]
    pub fn new(session: PracticeSession, asset_base: impl Into<String>) -> Self {
        Self {
            session,
            asset_base: asset_base.into(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn code(&self) -> &str {
        self.session.code()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn report(&self, now: DateTime<Utc>) -> SessionReport {
        self.session.report(now)
    }

    pub fn apply(&mut self, intent: SessionIntent, now: DateTime<Utc>) -> IntentEffect {
        match intent {
            SessionIntent::Input { id, value } => self.session.set_input(&id, value),
            SessionIntent::Submit => {
                if let Some(outcome) = self.session.submit(now) {
                    debug!(
                        question = %self.session.current_question().id,
                        verdict = ?outcome.verdict,
                        recorded = outcome.recorded.is_some(),
                        "answers submitted"
                    );
                }
            }
            SessionIntent::Choose(choice) => {
                if self.session.choose_option(choice) == Some(GateOutcome::Correct) {
                    return IntentEffect::AcknowledgeAfter {
                        delay: MCQ_ADVANCE_DELAY,
                        gate: self.gate_ticket(),
                    };
                }
            }
            SessionIntent::RevealReasoning => {
                if self.session.reveal_reasoning() == Some(GateOutcome::ReasoningRevealed) {
                    return IntentEffect::AcknowledgeAfter {
                        delay: SELF_CHECK_ADVANCE_DELAY,
                        gate: self.gate_ticket(),
                    };
                }
            }
            SessionIntent::AcknowledgeGate => {
                self.session.acknowledge_gate_feedback();
            }
            SessionIntent::SelfReport { got_it } => {
                if let Some(advance) = self.session.self_report(got_it, now) {
                    log_advance(&self.session, &advance);
                }
            }
            SessionIntent::ContinueAfterFix => {
                if let Some(advance) = self.session.continue_after_fix(now) {
                    log_advance(&self.session, &advance);
                }
            }
            SessionIntent::NextQuestion => {
                if self.session.next_question(now) && self.session.is_finished() {
                    return IntentEffect::Finished;
                }
            }
        }
        IntentEffect::None
    }

    #[must_use]
    pub fn gate_ticket(&self) -> GateTicket {
        GateTicket {
            position: self.session.position(),
            cursor: self.session.attempt().cursor(),
        }
    }

    /// Acknowledge gate feedback scheduled earlier, unless the learner has
    /// since moved to another question or gate.
    pub fn acknowledge(&mut self, gate: GateTicket, now: DateTime<Utc>) -> bool {
        if self.is_finished() || self.gate_ticket() != gate {
            debug!(code = self.code(), "dropping stale gate acknowledgement");
            return false;
        }
        self.apply(SessionIntent::AcknowledgeGate, now);
        true
    }

    /// Changes whenever new math may have been put on screen.
    #[must_use]
    pub fn typeset_key(&self) -> String {
        let attempt = self.session.attempt();
        format!(
            "{}:{}:{:?}:{}",
            self.session.position(),
            self.session.is_finished(),
            attempt.phase(),
            attempt.gate_feedback().is_some(),
        )
    }

    fn asset(&self, path: Option<&str>) -> Option<String> {
        let url = resolve_asset_url(&self.asset_base, path);
        (!url.is_empty()).then_some(url)
    }

    /// Everything the session page renders, detached from the live session.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let question = self.session.current_question();
        let attempt = self.session.attempt();
        let phase = attempt.phase();
        let revealed = phase == AttemptPhase::Revealed;

        SessionSnapshot {
            elapsed_label: format_elapsed(self.session.elapsed_seconds(now)),
            progress_label: format!("{} / {}", self.session.position(), self.session.total()),
            problem: ProblemVm {
                text_html: sanitize_html(&question.text),
                image_url: self.asset(question.question_image_url.as_deref()),
            },
            answers: self.answer_fields(question),
            inputs_locked: revealed,
            feedback: attempt.feedback().map(|feedback| BannerVm {
                class: match feedback.tone {
                    FeedbackTone::Success => "feedback feedback--success",
                    FeedbackTone::Partial => "feedback feedback--partial",
                    FeedbackTone::Incorrect => "feedback feedback--incorrect",
                },
                message: feedback.message.clone(),
            }),
            show_fix_prompt: attempt.show_fix_prompt(),
            guidance: self.guidance(question),
            solution: (phase != AttemptPhase::Answering).then(|| self.solution(question)),
            can_advance: revealed,
        }
    }

    fn answer_fields(&self, question: &Question) -> Vec<AnswerFieldVm> {
        let attempt = self.session.attempt();
        question
            .final_answers
            .iter()
            .map(|answer| {
                let verdict = attempt
                    .validation_for(&answer.id)
                    .map(|status| status.is_correct);
                AnswerFieldVm {
                    id: answer.id.clone(),
                    label: answer.label.clone(),
                    value: attempt.input(&answer.id).to_string(),
                    input_class: match verdict {
                        Some(true) => "answer-input answer-input--correct",
                        Some(false) => "answer-input answer-input--wrong",
                        None => "answer-input",
                    },
                    verdict,
                }
            })
            .collect()
    }

    fn guidance(&self, question: &Question) -> Option<GuidanceVm> {
        let attempt = self.session.attempt();
        match attempt.phase() {
            AttemptPhase::Answering => None,
            AttemptPhase::Revealed => Some(GuidanceVm::Summary(
                question
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(index, step)| StepTipsVm {
                        heading: format!("Step {}", index + 1),
                        tips: step.tips.iter().map(|tip| sanitize_html(tip)).collect(),
                    })
                    .collect(),
            )),
            AttemptPhase::Guiding(cursor) => {
                let step = question.step(cursor.step)?;
                let waiting = attempt.is_waiting_for_self_report(question);
                let gates = step
                    .gates
                    .iter()
                    .enumerate()
                    .filter_map(|(index, gate)| self.gate(index, gate))
                    .collect();
                let self_report = if !waiting {
                    None
                } else if cursor.paused_for_fix {
                    Some(SelfReportVm::ContinueAfterFix)
                } else {
                    Some(SelfReportVm::Ask)
                };
                Some(GuidanceVm::Step(StepVm {
                    heading: format!("Step {}", cursor.step + 1),
                    image_url: self.asset(step.image_url.as_deref()),
                    gates,
                    tips: waiting
                        .then(|| step.tips.iter().map(|tip| sanitize_html(tip)).collect()),
                    self_report,
                }))
            }
        }
    }

    fn gate(&self, index: usize, gate: &Gate) -> Option<GateVm> {
        let attempt = self.session.attempt();
        let state = attempt.gate_state(index);
        if state == GateState::Hidden {
            return None;
        }
        let active = state == GateState::Active;
        let feedback = attempt.gate_feedback().filter(|_| active);
        let answered = feedback.is_some_and(|feedback| feedback.advance_pending);

        let body = match gate {
            Gate::Mcq(mcq) => GateBodyVm::Options {
                options: mcq.options.iter().map(|option| sanitize_html(option)).collect(),
                locked: !active || answered,
            },
            Gate::SelfCheck(check) if !active || answered => GateBodyVm::Reasoning(
                check
                    .reveal_text
                    .as_deref()
                    .map(sanitize_html)
                    .unwrap_or_default(),
            ),
            Gate::SelfCheck(_) => GateBodyVm::RevealButton,
        };

        Some(GateVm {
            label: format!("Check {}", index + 1),
            solved: state == GateState::Solved,
            question_html: sanitize_html(gate.question()),
            image_url: if active {
                self.asset(gate.image_url())
            } else {
                None
            },
            body,
            feedback: feedback.map(|feedback| BannerVm {
                class: match feedback.tone {
                    GateTone::Success => "gate-feedback gate-feedback--success",
                    GateTone::Error => "gate-feedback gate-feedback--error",
                },
                message: sanitize_html(&feedback.message),
            }),
        })
    }

    fn solution(&self, question: &Question) -> SolutionVm {
        let attempt = self.session.attempt();
        SolutionVm {
            image_url: self
                .asset(Some(question.solution_image_url.as_str()))
                .unwrap_or_default(),
            regions: question
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| {
                    let class = match attempt.region_state(question, index) {
                        RegionState::Covered => "solution-mask",
                        RegionState::Highlighted => "solution-mask solution-mask--current",
                        RegionState::Revealed { current: true } => {
                            "solution-mask solution-mask--revealed solution-mask--current"
                        }
                        RegionState::Revealed { current: false } => {
                            "solution-mask solution-mask--revealed"
                        }
                    };
                    let region = step.region;
                    RegionVm {
                        key: step.id.to_string(),
                        class,
                        style: format!(
                            "left: {}; top: {}; width: {}; height: {};",
                            percent(region.x),
                            percent(region.y),
                            percent(region.w),
                            percent(region.h),
                        ),
                    }
                })
                .collect(),
        }
    }
}

fn log_advance(session: &PracticeSession, advance: &StepAdvance) {
    let question = &session.current_question().id;
    match advance {
        StepAdvance::NextStep(step) => debug!(%question, step, "moved to next step"),
        StepAdvance::PausedForFix => debug!(%question, "paused for fix"),
        StepAdvance::Completed(result) => debug!(
            %question,
            seconds = result.time_taken_seconds,
            "guided walkthrough completed"
        ),
    }
}

fn percent(fraction: f64) -> String {
    let value = fraction * 100.0;
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value:.3}%")
    }
}

//
// ─── SNAPSHOT TYPES ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub elapsed_label: String,
    pub progress_label: String,
    pub problem: ProblemVm,
    pub answers: Vec<AnswerFieldVm>,
    pub inputs_locked: bool,
    pub feedback: Option<BannerVm>,
    pub show_fix_prompt: bool,
    /// Present once the question left the answering phase.
    pub guidance: Option<GuidanceVm>,
    pub solution: Option<SolutionVm>,
    pub can_advance: bool,
}

impl SessionSnapshot {
    /// Guidance and solution columns are shown next to the problem.
    #[must_use]
    pub fn is_wide_layout(&self) -> bool {
        self.guidance.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemVm {
    pub text_html: String,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFieldVm {
    pub id: AnswerId,
    pub label: String,
    pub value: String,
    pub verdict: Option<bool>,
    pub input_class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerVm {
    pub class: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuidanceVm {
    Step(StepVm),
    /// Read-only tips of every step once the solution is revealed.
    Summary(Vec<StepTipsVm>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepVm {
    pub heading: String,
    pub image_url: Option<String>,
    pub gates: Vec<GateVm>,
    pub tips: Option<Vec<String>>,
    pub self_report: Option<SelfReportVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepTipsVm {
    pub heading: String,
    pub tips: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfReportVm {
    Ask,
    ContinueAfterFix,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateVm {
    pub label: String,
    pub solved: bool,
    pub question_html: String,
    pub image_url: Option<String>,
    pub body: GateBodyVm,
    pub feedback: Option<BannerVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateBodyVm {
    Options { options: Vec<String>, locked: bool },
    RevealButton,
    Reasoning(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionVm {
    pub image_url: String,
    pub regions: Vec<RegionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionVm {
    pub key: String,
    pub class: &'static str,
    pub style: String,
}
