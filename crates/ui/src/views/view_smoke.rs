use dioxus::prelude::*;
use crate::vm::SessionIntent;
use tutor_core::model::AnswerId;

use super::test_harness::{ViewKind, setup_view_harness};

fn input(id: &str, value: &str) -> SessionIntent {
    SessionIntent::Input {
        id: AnswerId::from(id),
        value: value.to_string(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn landing_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Landing, None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Tutor Practice Dashboard"), "missing title in {html}");
    assert!(html.contains("Session Code"), "missing input in {html}");
    assert!(html.contains("START SESSION"), "missing button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn landing_view_shows_not_found_for_launch_code() {
    let mut harness = setup_view_harness(ViewKind::Landing, Some("nope"));
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Session &quot;NOPE&quot; not found on server.")
            || html.contains("Session \"NOPE\" not found on server."),
        "missing error in {html}"
    );
    assert!(html.contains("START SESSION"), "button should be idle again in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_loads_first_question() {
    let mut harness = setup_view_harness(ViewKind::Session("phys1".to_string()), None);
    harness.rebuild();
    assert!(harness.render().contains("Loading session..."));

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Problem Statement"), "missing problem in {html}");
    assert!(html.contains("A cart accelerates"), "missing text in {html}");
    assert!(html.contains("1 / 2"), "missing progress in {html}");
    assert!(html.contains("0s"), "missing clock in {html}");
    assert!(html.contains("https://host/sessions/img/cart.png"), "missing image in {html}");
    assert!(html.contains("Final velocity"), "missing answer label in {html}");
    assert!(html.contains("CHECK ANSWERS"), "missing submit in {html}");
    assert!(!html.contains("Guided Support"), "guidance shown too early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_unknown_code_shows_error() {
    let mut harness = setup_view_harness(ViewKind::Session("wk9".to_string()), None);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("not found on server."), "missing error in {html}");
    assert!(html.contains("Back"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_guides_after_partial_answer() {
    let mut harness = setup_view_harness(ViewKind::Session("phys1".to_string()), None);
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(input("v", "6"));
    harness.dispatch(input("d", "4.5"));
    harness.dispatch(SessionIntent::Submit);
    let html = harness.render();
    assert!(html.contains("Partially correct (1/2)"), "missing feedback in {html}");
    assert!(html.contains("Guided Support"), "missing guidance in {html}");
    assert!(html.contains("Step 1"), "missing step heading in {html}");
    assert!(html.contains("Check 1"), "missing first gate in {html}");
    assert!(!html.contains("Check 2"), "second gate shown too early in {html}");
    assert!(html.contains("Solution Workspace"), "missing solution image in {html}");
    assert!(html.contains("answer-input--wrong"), "missing wrong marker in {html}");

    harness.dispatch(SessionIntent::Choose(1));
    assert!(harness.render().contains("Try again!"));

    harness.dispatch(SessionIntent::Choose(0));
    assert!(harness.render().contains("Correct!"));

    harness.dispatch(SessionIntent::AcknowledgeGate);
    let html = harness.render();
    assert!(html.contains("Check 2"), "missing second gate in {html}");
    assert!(html.contains("Reveal Reasoning"), "missing reveal button in {html}");

    harness.dispatch(SessionIntent::RevealReasoning);
    harness.dispatch(SessionIntent::AcknowledgeGate);
    let html = harness.render();
    assert!(html.contains("The net force does not change."), "missing reasoning in {html}");
    assert!(html.contains("Does your logic match?"), "missing self report in {html}");

    harness.dispatch(SessionIntent::SelfReport { got_it: false });
    let html = harness.render();
    assert!(html.contains("Review tips and update your values."), "missing fix prompt in {html}");
    assert!(html.contains("CONTINUE TO NEXT STEP"), "missing continue in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_reaches_completion() {
    let mut harness = setup_view_harness(ViewKind::Session("single".to_string()), None);
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(input("s", "2"));
    harness.dispatch(SessionIntent::Submit);
    let html = harness.render();
    assert!(html.contains("Brilliant! All answers are correct."), "missing success in {html}");
    assert!(html.contains("NEXT QUESTION"), "missing next in {html}");
    assert!(html.contains("Solution Logic"), "missing read-only logic in {html}");

    harness.dispatch(SessionIntent::NextQuestion);
    let html = harness.render();
    assert!(html.contains("Complete!"), "missing completion in {html}");
    assert!(html.contains("Download Report"), "missing download in {html}");
    assert!(html.contains("1 / 1 first try"), "missing summary row in {html}");

    let vm = harness
        .session_handles
        .as_ref()
        .expect("session handles")
        .vm();
    let finished = harness
        .dom
        .in_runtime(|| vm.read().as_ref().is_some_and(|vm| vm.is_finished()));
    assert!(finished);
}
