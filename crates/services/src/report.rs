use std::path::{Path, PathBuf};

use tracing::info;

use tutor_core::model::SessionReport;

use crate::catalog::SessionCode;
use crate::error::ReportError;

/// Writes session reports as pretty-printed JSON files.
#[derive(Clone, Debug)]
pub struct ReportService {
    report_dir: PathBuf,
}

impl ReportService {
    #[must_use]
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// # Errors
    ///
    /// Returns `ReportError::Serialize` if the report cannot be encoded.
    pub fn render(&self, report: &SessionReport) -> Result<String, ReportError> {
        Ok(report.to_pretty_json()?)
    }

    #[must_use]
    pub fn file_name(code: &SessionCode) -> String {
        format!("report_{code}.json")
    }

    /// Write `report_<code>.json` into the report directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` on serialization or filesystem failures.
    pub async fn export(
        &self,
        report: &SessionReport,
        code: &SessionCode,
    ) -> Result<PathBuf, ReportError> {
        let body = self.render(report)?;
        tokio::fs::create_dir_all(&self.report_dir)
            .await
            .map_err(|source| ReportError::Io {
                path: self.report_dir.clone(),
                source,
            })?;

        let path = self.report_dir.join(Self::file_name(code));
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        info!(
            path = %path.display(),
            questions = report.questions.len(),
            "session report exported"
        );
        Ok(path)
    }
}
