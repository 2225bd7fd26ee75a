use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{Clock, InMemoryCatalog, PracticeService, ReportService};
use tutor_core::model::QuestionSet;
use tutor_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::session::SessionTestHandles;
use crate::views::{LandingView, SessionView};
use crate::vm::SessionIntent;

pub const PHYSICS_SET: &str = r#"[
    {
        "id": "q1",
        "text": "A cart accelerates at $2\\,\\text{m/s}^2$ for 3 s. Find $v$ and $d$.",
        "questionImageUrl": "img/cart.png",
        "solutionImageUrl": "img/cart_solution.png",
        "finalAnswers": [
            { "id": "v", "label": "Final velocity", "value": 6, "tolerance": 0.05 },
            { "id": "d", "label": "Distance", "value": 9, "tolerance": 0.05 }
        ],
        "steps": [
            {
                "id": "s1",
                "region": { "x": 0, "y": 0, "w": 1, "h": 0.5 },
                "tips": ["Use $v = at$."],
                "gates": [
                    { "type": "MCQ", "question": "Which relation gives $v$?", "options": ["$v = at$", "$v = d/t$"], "correctIndex": 0 },
                    { "type": "SelfCheck", "question": "Why is $a$ constant?", "revealText": "The net force does not change." }
                ]
            },
            {
                "id": "s2",
                "region": { "x": 0, "y": 0.5, "w": 1, "h": 0.5 },
                "tips": ["Use $d = \\tfrac12 a t^2$."]
            }
        ]
    },
    {
        "id": "q2",
        "text": "What is $3 \\times 4$?",
        "solutionImageUrl": "img/times.png",
        "finalAnswers": [{ "id": "p", "label": "Product", "value": 12, "tolerance": 0 }],
        "steps": []
    }
]"#;

pub const SINGLE_SET: &str = r#"[
    {
        "id": "only",
        "text": "What is $1 + 1$?",
        "solutionImageUrl": "img/sum.png",
        "finalAnswers": [{ "id": "s", "label": "Sum", "value": 2, "tolerance": 0 }],
        "steps": []
    }
]"#;

#[derive(Clone)]
struct TestApp {
    launch_code: Option<String>,
    practice: Arc<PracticeService>,
    reports: Arc<ReportService>,
}

impl UiApp for TestApp {
    fn asset_base(&self) -> String {
        "https://host/sessions/".to_string()
    }

    fn launch_code(&self) -> Option<String> {
        self.launch_code.clone()
    }

    fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Session(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session_handles: Option<SessionTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.session_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Session(code) => rsx! { SessionView { code } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub session_handles: Option<SessionTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive a few rounds so spawned tasks and the renders they trigger settle.
    pub async fn settle(&mut self) {
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn dispatch(&mut self, intent: SessionIntent) {
        let handles = self
            .session_handles
            .as_ref()
            .expect("session handles registered");
        let dispatch = handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, launch_code: Option<&str>) -> ViewHarness {
    let catalog = InMemoryCatalog::new()
        .with_set("phys1", QuestionSet::from_json(PHYSICS_SET).expect("physics set"))
        .with_set("single", QuestionSet::from_json(SINGLE_SET).expect("single set"));
    let practice = Arc::new(PracticeService::new(
        Clock::fixed(fixed_now()),
        Arc::new(catalog),
    ));
    let reports = Arc::new(ReportService::new(
        std::env::temp_dir().join(format!("tutor-ui-{}", std::process::id())),
    ));

    let session_handles = match view {
        ViewKind::Session(_) => Some(SessionTestHandles::default()),
        ViewKind::Landing => None,
    };

    let app = Arc::new(TestApp {
        launch_code: launch_code.map(str::to_string),
        practice,
        reports,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            session_handles: session_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        session_handles,
    }
}
