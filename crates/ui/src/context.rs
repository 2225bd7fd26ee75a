use std::sync::{Arc, Mutex};

use services::{PracticeService, ReportService};
use tutor_core::PracticeSession;

pub trait UiApp: Send + Sync {
    fn asset_base(&self) -> String;
    /// Session code passed on the command line, opened once at launch.
    fn launch_code(&self) -> Option<String>;

    fn practice(&self) -> Arc<PracticeService>;
    fn reports(&self) -> Arc<ReportService>;
}

#[derive(Clone)]
pub struct AppContext {
    asset_base: String,
    launch_code_once: Arc<Mutex<Option<String>>>,
    handoff: Arc<Mutex<Option<PracticeSession>>>,

    practice: Arc<PracticeService>,
    reports: Arc<ReportService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            asset_base: app.asset_base(),
            launch_code_once: Arc::new(Mutex::new(app.launch_code())),
            handoff: Arc::new(Mutex::new(None)),
            practice: app.practice(),
            reports: app.reports(),
        }
    }

    #[must_use]
    pub fn asset_base(&self) -> &str {
        &self.asset_base
    }

    #[must_use]
    pub fn take_launch_code(&self) -> Option<String> {
        self.launch_code_once
            .lock()
            .ok()
            .and_then(|mut code| code.take())
    }

    /// Park a session loaded on the landing page for the session route to pick up.
    pub fn hand_off(&self, session: PracticeSession) {
        if let Ok(mut slot) = self.handoff.lock() {
            *slot = Some(session);
        }
    }

    /// Take the parked session if it was started for `code`.
    #[must_use]
    pub fn take_session(&self, code: &str) -> Option<PracticeSession> {
        let mut slot = self.handoff.lock().ok()?;
        if slot
            .as_ref()
            .is_some_and(|session| session.code().eq_ignore_ascii_case(code.trim()))
        {
            return slot.take();
        }
        None
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.reports)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
