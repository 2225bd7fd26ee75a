use dioxus::prelude::*;

use crate::vm::CompletionVm;

/// Outcome of the last report export: the written path, or an error message.
pub type ExportStatus = Option<Result<String, String>>;

#[component]
pub fn CompletionPanel(
    completion: CompletionVm,
    export: ExportStatus,
    on_download: EventHandler<()>,
    on_home: EventHandler<()>,
) -> Element {
    let CompletionVm {
        total_time_label,
        rows,
    } = completion;

    rsx! {
        div { class: "complete",
            div { class: "complete__card",
                div { class: "complete__icon", "🎉" }
                h2 { class: "complete__title", "Complete!" }
                p { class: "complete__total", "Total time: {total_time_label}" }
                table { class: "complete__table",
                    thead {
                        tr {
                            th { "Question" }
                            th { "Answers" }
                            th { "Time" }
                            th { "Steps fixed" }
                        }
                    }
                    tbody {
                        for row in rows {
                            tr { key: "{row.question}",
                                td { "{row.question}" }
                                td { "{row.first_try_label}" }
                                td { "{row.time_label}" }
                                td { "{row.steps_fixed}" }
                            }
                        }
                    }
                }
                button {
                    class: "complete__download",
                    id: "session-download",
                    r#type: "button",
                    onclick: move |_| on_download.call(()),
                    "Download Report"
                }
                match export {
                    Some(Ok(path)) => rsx! {
                        p { class: "complete__saved", "Saved to {path}" }
                    },
                    Some(Err(message)) => rsx! {
                        p { class: "complete__error", role: "alert", "{message}" }
                    },
                    None => rsx! {},
                }
                button {
                    class: "complete__home",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Back to start"
                }
            }
        }
    }
}
