use dioxus::prelude::*;

/// Pre-sanitized HTML that may contain TeX for MathJax.
#[component]
pub fn MathContent(html: String, #[props(default)] class: String) -> Element {
    rsx! {
        div { class: "math-container {class}", dangerous_inner_html: "{html}" }
    }
}
