use dioxus::prelude::*;

use crate::vm::{GateBodyVm, GateVm, GuidanceVm, SelfReportVm, SessionIntent, StepTipsVm, StepVm};

use super::math::MathContent;

#[component]
pub fn GuidancePanel(guidance: GuidanceVm, on_intent: EventHandler<SessionIntent>) -> Element {
    rsx! {
        aside { class: "panel guidance",
            h2 { class: "panel__title", "Guided Support" }
            match guidance {
                GuidanceVm::Step(step) => rsx! {
                    StepCard { step, on_intent }
                },
                GuidanceVm::Summary(steps) => rsx! {
                    SolutionLogic { steps }
                },
            }
        }
    }
}

#[component]
fn StepCard(step: StepVm, on_intent: EventHandler<SessionIntent>) -> Element {
    let StepVm {
        heading,
        image_url,
        gates,
        tips,
        self_report,
    } = step;

    rsx! {
        div { class: "step",
            h3 { class: "step__heading", "{heading}" }
            if let Some(url) = image_url {
                div { class: "figure",
                    img { src: "{url}", alt: "Step Diagram" }
                }
            }
        }
        for (index, gate) in gates.into_iter().enumerate() {
            GateCard { key: "{index}", gate, on_intent }
        }
        if let Some(tips) = tips {
            div { class: "step__tips",
                div { class: "solution-logic",
                    h4 { class: "solution-logic__title", "Solution Logic" }
                    for tip in tips {
                        MathContent { html: tip, class: "solution-logic__tip" }
                    }
                }
                match self_report {
                    Some(SelfReportVm::Ask) => rsx! {
                        div { class: "self-report",
                            p { class: "self-report__question", "Does your logic match?" }
                            div { class: "self-report__actions",
                                button {
                                    class: "self-report__yes",
                                    id: "session-proceed",
                                    r#type: "button",
                                    onclick: move |_| {
                                        on_intent.call(SessionIntent::SelfReport { got_it: true });
                                    },
                                    "YES, PROCEED"
                                }
                                button {
                                    class: "self-report__fix",
                                    id: "session-fix",
                                    r#type: "button",
                                    onclick: move |_| {
                                        on_intent.call(SessionIntent::SelfReport { got_it: false });
                                    },
                                    "NO, I NEED TO FIX IT"
                                    span { class: "self-report__ping", "!" }
                                }
                            }
                        }
                    },
                    Some(SelfReportVm::ContinueAfterFix) => rsx! {
                        button {
                            class: "self-report__continue",
                            id: "session-continue",
                            r#type: "button",
                            onclick: move |_| on_intent.call(SessionIntent::ContinueAfterFix),
                            "CONTINUE TO NEXT STEP →"
                        }
                    },
                    None => rsx! {},
                }
            }
        }
    }
}

#[component]
fn GateCard(gate: GateVm, on_intent: EventHandler<SessionIntent>) -> Element {
    let GateVm {
        label,
        solved,
        question_html,
        image_url,
        body,
        feedback,
    } = gate;
    let class = if solved { "gate gate--solved" } else { "gate" };

    rsx! {
        div { class: "{class}",
            span { class: "gate__label", "{label}" }
            MathContent { html: question_html, class: "gate__question" }
            if let Some(url) = image_url {
                div { class: "figure",
                    img { src: "{url}", alt: "Check Diagram" }
                }
            }
            match body {
                GateBodyVm::Options { options, locked } => rsx! {
                    div { class: "gate__options",
                        for (choice, option) in options.into_iter().enumerate() {
                            button {
                                key: "{choice}",
                                class: "gate__option",
                                r#type: "button",
                                disabled: locked,
                                onclick: move |_| on_intent.call(SessionIntent::Choose(choice)),
                                span { class: "math-container", dangerous_inner_html: "{option}" }
                            }
                        }
                    }
                },
                GateBodyVm::RevealButton => rsx! {
                    button {
                        class: "gate__reveal",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SessionIntent::RevealReasoning),
                        "🧠 Reveal Reasoning"
                    }
                },
                GateBodyVm::Reasoning(html) => rsx! {
                    MathContent { html, class: "gate__reasoning" }
                },
            }
            if let Some(feedback) = feedback {
                div { class: "{feedback.class}", role: "status",
                    MathContent { html: feedback.message }
                }
            }
        }
    }
}

#[component]
fn SolutionLogic(steps: Vec<StepTipsVm>) -> Element {
    rsx! {
        div { class: "solution-logic solution-logic--summary",
            h4 { class: "solution-logic__title", "Solution Logic" }
            for (index, step) in steps.into_iter().enumerate() {
                div { key: "{index}", class: "solution-logic__step",
                    h3 { class: "step__heading", "{step.heading}" }
                    for tip in step.tips {
                        MathContent { html: tip, class: "solution-logic__tip" }
                    }
                }
            }
        }
    }
}
