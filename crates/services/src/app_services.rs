use std::sync::Arc;

use crate::Clock;
use crate::catalog::{QuestionSource, RemoteCatalog};
use crate::config::TutorConfig;
use crate::practice::PracticeService;
use crate::report::ReportService;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    asset_base: String,
    practice: Arc<PracticeService>,
    reports: Arc<ReportService>,
}

impl AppServices {
    /// Build services that load question sets from the configured session base.
    #[must_use]
    pub fn from_config(config: &TutorConfig, clock: Clock) -> Self {
        Self::with_source(config, clock, Arc::new(RemoteCatalog::from_config(config)))
    }

    #[must_use]
    pub fn with_source(
        config: &TutorConfig,
        clock: Clock,
        source: Arc<dyn QuestionSource>,
    ) -> Self {
        Self {
            asset_base: config.asset_base(),
            practice: Arc::new(PracticeService::new(clock, source)),
            reports: Arc::new(ReportService::new(config.report_dir.clone())),
        }
    }

    #[must_use]
    pub fn asset_base(&self) -> &str {
        &self.asset_base
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
