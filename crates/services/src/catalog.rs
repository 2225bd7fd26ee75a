use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use tutor_core::model::QuestionSet;

use crate::config::{SessionBase, SessionLocation, TutorConfig};
use crate::error::CatalogError;

/// Session code that selects the bundled demo set.
pub const DEMO_CODE: &str = "demo";
const DEMO_FILE: &str = "questions.json";

/// Trimmed, lower-cased session code as typed on the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionCode(String);

impl SessionCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Question-set file for this code, relative to the session base.
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.0 == DEMO_CODE {
            DEMO_FILE.to_string()
        } else {
            format!("{}.json", self.0)
        }
    }

    fn not_found(&self) -> CatalogError {
        CatalogError::NotFound {
            code: self.0.to_uppercase(),
        }
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// # Errors
///
/// Returns `CatalogError::EmptyCode` for blank input.
pub fn normalize_session_code(raw: &str) -> Result<SessionCode, CatalogError> {
    let code = raw.trim().to_lowercase();
    if code.is_empty() {
        return Err(CatalogError::EmptyCode);
    }
    Ok(SessionCode(code))
}

/// Anything that can hand out a question set for a session code.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown codes, or transport/validation errors.
    async fn fetch(&self, code: &SessionCode) -> Result<QuestionSet, CatalogError>;
}

//
// ─── REMOTE / FILESYSTEM ───────────────────────────────────────────────────────
//

/// Loads question sets over HTTP or from a local directory.
#[derive(Clone)]
pub struct RemoteCatalog {
    client: Client,
    base: SessionBase,
    mapping_url: Option<Url>,
}

impl RemoteCatalog {
    #[must_use]
    pub fn new(base: SessionBase, mapping_url: Option<Url>) -> Self {
        Self {
            client: Client::new(),
            base,
            mapping_url,
        }
    }

    #[must_use]
    pub fn from_config(config: &TutorConfig) -> Self {
        Self::new(config.session_base.clone(), config.mapping_url.clone())
    }

    async fn resolve(&self, code: &SessionCode) -> Result<SessionLocation, CatalogError> {
        if let Some(mapping_url) = self.mapping_url.as_ref() {
            let mapping = self.fetch_mapping(mapping_url).await?;
            if let Some(target) = lookup_mapping(&mapping, code) {
                debug!(%code, mapped = target, "session code found in mapping");
                return match Url::parse(target) {
                    Ok(url) => Ok(SessionLocation::Remote(url)),
                    Err(_) => Ok(self.base.locate(target)?),
                };
            }
            debug!(%code, "session code not in mapping, using session base");
        }
        Ok(self.base.locate(&code.file_name())?)
    }

    async fn fetch_mapping(&self, url: &Url) -> Result<HashMap<String, String>, CatalogError> {
        let location = SessionLocation::Remote(url.clone());
        let Some(body) = self.load_text(&location).await? else {
            warn!(%url, "session mapping not found");
            return Ok(HashMap::new());
        };
        serde_json::from_str(&body).map_err(CatalogError::Mapping)
    }

    /// `Ok(None)` means the document does not exist or the server refused it.
    async fn load_text(&self, location: &SessionLocation) -> Result<Option<String>, CatalogError> {
        match location {
            SessionLocation::Remote(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => read_file(&path).await,
                Err(()) => Ok(None),
            },
            SessionLocation::Remote(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    warn!(%url, %status, "request did not succeed");
                    return Ok(None);
                }
                Ok(Some(response.text().await?))
            }
            SessionLocation::File(path) => read_file(path).await,
        }
    }
}

async fn read_file(path: &Path) -> Result<Option<String>, CatalogError> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Some(body)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn lookup_mapping<'a>(mapping: &'a HashMap<String, String>, code: &SessionCode) -> Option<&'a str> {
    mapping
        .iter()
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(code.as_str()))
        .map(|(_, value)| value.as_str())
}

#[async_trait]
impl QuestionSource for RemoteCatalog {
    async fn fetch(&self, code: &SessionCode) -> Result<QuestionSet, CatalogError> {
        let location = self.resolve(code).await?;
        info!(%code, ?location, "loading question set");
        let body = self
            .load_text(&location)
            .await?
            .ok_or_else(|| code.not_found())?;
        let set = QuestionSet::from_json(&body)?;
        info!(%code, questions = set.len(), "question set loaded");
        Ok(set)
    }
}

//
// ─── IN MEMORY ─────────────────────────────────────────────────────────────────
//

/// Fixed code-to-set table for tests and offline demos.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    sets: HashMap<String, QuestionSet>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if `code` is blank.
    #[must_use]
    pub fn with_set(mut self, code: &str, set: QuestionSet) -> Self {
        let code = normalize_session_code(code).expect("in-memory session code must not be blank");
        self.sets.insert(code.0, set);
        self
    }
}

#[async_trait]
impl QuestionSource for InMemoryCatalog {
    async fn fetch(&self, code: &SessionCode) -> Result<QuestionSet, CatalogError> {
        self.sets
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| code.not_found())
    }
}
