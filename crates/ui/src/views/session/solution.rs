use dioxus::prelude::*;

use crate::vm::{SessionIntent, SolutionVm};

#[component]
pub fn SolutionPanel(
    solution: SolutionVm,
    can_advance: bool,
    on_intent: EventHandler<SessionIntent>,
) -> Element {
    let SolutionVm { image_url, regions } = solution;

    rsx! {
        div { class: "solution",
            div { class: "solution__canvas",
                img { class: "solution__image", src: "{image_url}", alt: "Solution Workspace" }
                for region in regions {
                    div { key: "{region.key}", class: "{region.class}", style: "{region.style}" }
                }
            }
            if can_advance {
                div { class: "solution__next",
                    button {
                        class: "solution__next-btn",
                        id: "session-next",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SessionIntent::NextQuestion),
                        "NEXT QUESTION"
                    }
                }
            }
        }
    }
}
