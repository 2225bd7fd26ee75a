use dioxus::prelude::*;

use crate::vm::{AnswerFieldVm, BannerVm, ProblemVm, SessionIntent};

use super::math::MathContent;

#[component]
pub fn ProblemPanel(problem: ProblemVm) -> Element {
    let ProblemVm {
        text_html,
        image_url,
    } = problem;

    rsx! {
        section { class: "panel panel--accent problem",
            h2 { class: "panel__title", "Problem Statement" }
            MathContent { html: text_html, class: "problem__text" }
            if let Some(url) = image_url {
                div { class: "figure",
                    img { src: "{url}", alt: "Question Diagram", loading: "lazy" }
                }
            }
        }
    }
}

#[component]
pub fn AnswerPanel(
    answers: Vec<AnswerFieldVm>,
    locked: bool,
    feedback: Option<BannerVm>,
    show_fix_prompt: bool,
    on_intent: EventHandler<SessionIntent>,
) -> Element {
    rsx! {
        section { class: "panel answers",
            h2 { class: "panel__title", "Submit Results" }
            if show_fix_prompt {
                div { class: "fix-prompt", role: "status",
                    span { "💡" }
                    " Review tips and update your values."
                }
            }
            form {
                class: "answers__form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_intent.call(SessionIntent::Submit);
                },
                div { class: "answers__fields",
                    for (index, field) in answers.into_iter().enumerate() {
                        AnswerField { key: "{index}", field, locked, on_intent }
                    }
                }
                button {
                    class: "answers__check",
                    id: "session-check",
                    r#type: "submit",
                    disabled: locked,
                    "CHECK ANSWERS"
                }
            }
            if let Some(feedback) = feedback {
                div { class: "{feedback.class}", role: "status", "{feedback.message}" }
            }
        }
    }
}

#[component]
fn AnswerField(
    field: AnswerFieldVm,
    locked: bool,
    on_intent: EventHandler<SessionIntent>,
) -> Element {
    let AnswerFieldVm {
        id,
        label,
        value,
        verdict,
        input_class,
    } = field;
    let input_id = format!("answer-{id}");
    let marker = match verdict {
        Some(true) => Some(("answer-marker answer-marker--correct", "✓")),
        Some(false) => Some(("answer-marker answer-marker--wrong", "✗")),
        None => None,
    };

    rsx! {
        div { class: "answer",
            label { class: "answer__label", r#for: "{input_id}", "{label}" }
            div { class: "answer__row",
                input {
                    class: "{input_class}",
                    id: "{input_id}",
                    r#type: "text",
                    inputmode: "decimal",
                    autocomplete: "off",
                    placeholder: "Value",
                    value: "{value}",
                    disabled: locked,
                    oninput: move |evt: FormEvent| {
                        on_intent.call(SessionIntent::Input {
                            id: id.clone(),
                            value: evt.value(),
                        });
                    },
                }
                if let Some((class, symbol)) = marker {
                    span { class: "{class}", "{symbol}" }
                }
            }
        }
    }
}
