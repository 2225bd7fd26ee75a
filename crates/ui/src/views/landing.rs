use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::app::APP_NAME;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn LandingView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut code = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let start = use_callback(move |raw: String| {
        if loading() {
            return;
        }
        let ctx = ctx.clone();
        loading.set(true);
        error.set(None);
        spawn(async move {
            match ctx.practice().start_session(&raw).await {
                Ok(session) => {
                    let code = session.code().to_string();
                    ctx.hand_off(session);
                    loading.set(false);
                    let _ = navigator.push(Route::Session { code });
                }
                Err(err) => {
                    loading.set(false);
                    error.set(Some(ViewError::from_catalog(&err)));
                }
            }
        });
    });

    let launch_ctx = use_context::<AppContext>();
    use_effect(move || {
        if let Some(launch) = launch_ctx.take_launch_code() {
            code.set(launch.clone());
            start.call(launch);
        }
    });

    let busy = loading();
    let can_submit = !busy && !code.read().trim().is_empty();
    let error_message = error.read().as_ref().map(|err| err.message().to_string());

    rsx! {
        div { class: "page landing",
            div { class: "landing__card",
                div { class: "landing__logo" }
                h1 { class: "landing__title", "{APP_NAME}" }
                form {
                    class: "landing__form",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        start.call(code.read().clone());
                    },
                    input {
                        class: "landing__code",
                        id: "landing-code",
                        r#type: "text",
                        placeholder: "Session Code",
                        autofocus: true,
                        value: "{code}",
                        oninput: move |evt: FormEvent| code.set(evt.value()),
                    }
                    button {
                        class: "landing__start",
                        id: "landing-start",
                        r#type: "submit",
                        disabled: !can_submit,
                        if busy { "CONNECTING..." } else { "START SESSION" }
                    }
                }
                if let Some(message) = error_message {
                    div { class: "landing__error", role: "alert", "⚠️ {message}" }
                }
            }
        }
    }
}
