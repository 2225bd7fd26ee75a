use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use tutor_core::PracticeSession;

use crate::Clock;
use crate::catalog::{QuestionSource, normalize_session_code};
use crate::error::CatalogError;

/// Presentation-facing entry point that turns a typed session code into a running session.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self { clock, source }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fetch the question set for `raw_code` and start timing the session.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for a blank code or when the set cannot be loaded.
    pub async fn start_session(&self, raw_code: &str) -> Result<PracticeSession, CatalogError> {
        let code = normalize_session_code(raw_code)?;
        let set = self.source.fetch(&code).await.inspect_err(|err| {
            warn!(%code, error = %err, "failed to start session");
        })?;
        info!(%code, questions = set.len(), "session started");
        Ok(PracticeSession::start(code.as_str(), set, self.clock.now()))
    }
}
