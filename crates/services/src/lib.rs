#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod error;
pub mod practice;
pub mod report;

pub use tutor_core::Clock;

pub use app_services::AppServices;
pub use catalog::{
    DEMO_CODE, InMemoryCatalog, QuestionSource, RemoteCatalog, SessionCode,
    normalize_session_code,
};
pub use config::{SessionBase, SessionLocation, TutorConfig};
pub use error::{CatalogError, ConfigError, ReportError};
pub use practice::PracticeService;
pub use report::ReportService;
