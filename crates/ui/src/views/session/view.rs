use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::normalize_session_code;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{IntentEffect, SessionIntent, SessionSnapshot, SessionVm, map_completion};

use super::complete::{CompletionPanel, ExportStatus};
use super::guidance::GuidancePanel;
use super::problem::{AnswerPanel, ProblemPanel};
use super::scripts::typeset_script;
use super::solution::SolutionPanel;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const ROOT_ID: &str = "session-root";
const CLOCK_TICK: Duration = Duration::from_secs(1);

#[component]
pub fn SessionView(code: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let practice = ctx.practice();
    let reports = ctx.reports();
    let asset_base = ctx.asset_base().to_string();

    let vm = use_signal(|| {
        ctx.take_session(&code)
            .map(|session| SessionVm::new(session, asset_base.clone()))
    });
    let now = use_signal(|| practice.now());
    let export: Signal<ExportStatus> = use_signal(|| None);

    let resource = {
        let practice = practice.clone();
        use_resource(move || {
            let practice = practice.clone();
            let asset_base = asset_base.clone();
            let code = code.clone();
            let mut vm = vm;

            async move {
                if vm.peek().is_some() {
                    return Ok::<_, ViewError>(());
                }
                let session = practice
                    .start_session(&code)
                    .await
                    .map_err(|err| ViewError::from_catalog(&err))?;
                vm.set(Some(SessionVm::new(session, asset_base)));
                Ok(())
            }
        })
    };

    {
        let practice = practice.clone();
        use_future(move || {
            let practice = practice.clone();
            let mut now = now;
            async move {
                loop {
                    tokio::time::sleep(CLOCK_TICK).await;
                    let running = vm
                        .peek()
                        .as_ref()
                        .is_some_and(|vm| !vm.is_finished());
                    if running {
                        now.set(practice.now());
                    }
                }
            }
        });
    }

    let dispatch_intent = {
        let practice = practice.clone();
        use_callback(move |intent: SessionIntent| {
            let practice = practice.clone();
            let mut vm = vm;
            let mut now = now;

            let at = practice.now();
            now.set(at);
            let effect = vm
                .write()
                .as_mut()
                .map_or(IntentEffect::None, |vm| vm.apply(intent, at));

            match effect {
                IntentEffect::AcknowledgeAfter { delay, gate } => {
                    spawn(async move {
                        tokio::time::sleep(delay).await;
                        let at = practice.now();
                        if let Some(vm) = vm.write().as_mut() {
                            vm.acknowledge(gate, at);
                        }
                    });
                }
                IntentEffect::Finished => {
                    if let Some(vm) = vm.read().as_ref() {
                        info!(
                            code = vm.code(),
                            questions = vm.session().results().len(),
                            "session finished"
                        );
                    }
                }
                IntentEffect::None => {}
            }
        })
    };

    let on_download = {
        let practice = practice.clone();
        use_callback(move |()| {
            let reports = reports.clone();
            let mut export = export;
            let Some((report, code)) = vm.read().as_ref().and_then(|vm| {
                let code = normalize_session_code(vm.code()).ok()?;
                Some((vm.report(practice.now()), code))
            }) else {
                return;
            };
            spawn(async move {
                match reports.export(&report, &code).await {
                    Ok(path) => export.set(Some(Ok(path.display().to_string()))),
                    Err(err) => {
                        warn!(%code, error = %err, "report export failed");
                        export.set(Some(Err(err.to_string())));
                    }
                }
            });
        })
    };

    let on_home = use_callback(move |()| {
        let _ = navigator.push(Route::Landing {});
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SessionTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let typeset_key = use_memo(move || vm.read().as_ref().map(SessionVm::typeset_key));
    use_effect(move || {
        if typeset_key.read().is_some() {
            let _ = eval(&typeset_script(ROOT_ID));
        }
    });

    let state = view_state_from_resource(&resource);
    let at = now();
    let vm_guard = vm.read();
    let completion = vm_guard
        .as_ref()
        .filter(|vm| vm.is_finished())
        .map(|vm| map_completion(&vm.report(at)));
    let snapshot = vm_guard
        .as_ref()
        .filter(|vm| !vm.is_finished())
        .map(|vm| vm.snapshot(at));
    drop(vm_guard);

    rsx! {
        div { class: "page session", id: ROOT_ID,
            if let Some(completion) = completion {
                CompletionPanel {
                    completion,
                    export: export(),
                    on_download,
                    on_home,
                }
            } else if let Some(snapshot) = snapshot {
                SessionBody { snapshot, on_intent: dispatch_intent }
            } else {
                match state {
                    ViewState::Error(err) => rsx! {
                        div { class: "session__error", role: "alert",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| on_home.call(()),
                                "Back"
                            }
                        }
                    },
                    ViewState::Loading | ViewState::Ready(()) => rsx! {
                        p { class: "session__loading", "Loading session..." }
                    },
                }
            }
        }
    }
}

#[component]
fn SessionBody(snapshot: SessionSnapshot, on_intent: EventHandler<SessionIntent>) -> Element {
    let wide = snapshot.is_wide_layout();
    let SessionSnapshot {
        elapsed_label,
        progress_label,
        problem,
        answers,
        inputs_locked,
        feedback,
        show_fix_prompt,
        guidance,
        solution,
        can_advance,
    } = snapshot;
    let grid_class = if wide {
        "session-grid session-grid--wide"
    } else {
        "session-grid"
    };

    rsx! {
        header { class: "session-header",
            div { class: "session-header__brand",
                div { class: "session-header__logo" }
                h1 { class: "session-header__title", "Dashboard" }
            }
            div { class: "session-header__meta",
                span { class: "session-header__timer", id: "session-timer", "{elapsed_label}" }
                div { class: "session-header__progress", "{progress_label}" }
            }
        }
        div { class: "{grid_class}",
            div { class: "session-main",
                ProblemPanel { problem }
                AnswerPanel {
                    answers,
                    locked: inputs_locked,
                    feedback,
                    show_fix_prompt,
                    on_intent,
                }
            }
            if let Some(guidance) = guidance {
                GuidancePanel { guidance, on_intent }
            }
            if let Some(solution) = solution {
                SolutionPanel { solution, can_advance, on_intent }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SessionTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SessionVm>>>>>,
}

#[cfg(test)]
impl SessionTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<SessionIntent>,
        vm: Signal<Option<SessionVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionIntent> {
        (*self.dispatch.borrow()).expect("session dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<SessionVm>> {
        (*self.vm.borrow()).expect("session vm registered")
    }
}
