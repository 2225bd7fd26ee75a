use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

pub const APP_NAME: &str = "Tutor Practice Dashboard";

const MATHJAX_CONFIG: &str = r"window.MathJax = {
    tex: { inlineMath: [['$', '$'], ['\\(', '\\)']], displayMath: [['$$', '$$'], ['\\[', '\\]']] },
    startup: { typeset: false }
};";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Script { "{MATHJAX_CONFIG}" }
        document::Script {
            src: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js",
            r#async: true,
        }

        document::Title { "{APP_NAME}" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
