use std::env;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SESSION_DIR: &str = "sessions";
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Where question sets (and their images) live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionBase {
    Url(Url),
    Directory(PathBuf),
}

/// Concrete place to load one document from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionLocation {
    Remote(Url),
    File(PathBuf),
}

impl SessionBase {
    /// `http:`, `https:` and `file:` inputs are URLs; everything else is a directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for blank input or an unparsable URL.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptySessionBase);
        }
        let has_url_scheme = Url::parse(trimmed)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https" | "file"));
        if !has_url_scheme {
            return Ok(Self::Directory(PathBuf::from(trimmed)));
        }

        // Joining drops the last path segment unless the base ends with a slash.
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidUrl {
            raw: trimmed.to_string(),
            source,
        })?;
        Ok(Self::Url(url))
    }

    /// Location of a file relative to this base.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the file name cannot be joined onto a URL base.
    pub fn locate(&self, file_name: &str) -> Result<SessionLocation, url::ParseError> {
        match self {
            SessionBase::Url(base) => base.join(file_name).map(SessionLocation::Remote),
            SessionBase::Directory(dir) => Ok(SessionLocation::File(dir.join(file_name))),
        }
    }

    /// Prefix that relative image paths from question sets are appended to.
    #[must_use]
    pub fn asset_base(&self) -> String {
        match self {
            SessionBase::Url(url) => url.to_string(),
            SessionBase::Directory(dir) => directory_url(dir),
        }
    }
}

fn directory_url(dir: &Path) -> String {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(dir)
    };
    Url::from_directory_path(&absolute)
        .map_or_else(|()| format!("{}/", absolute.display()), String::from)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TutorConfig {
    pub session_base: SessionBase,
    /// Optional JSON document mapping session codes to question-set URLs.
    pub mapping_url: Option<Url>,
    pub report_dir: PathBuf,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            session_base: SessionBase::Directory(PathBuf::from(DEFAULT_SESSION_DIR)),
            mapping_url: None,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

impl TutorConfig {
    /// Read `TUTOR_SESSION_BASE`, `TUTOR_SESSION_MAPPING_URL` and `TUTOR_REPORT_DIR`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = non_empty_var("TUTOR_SESSION_BASE") {
            config.session_base = SessionBase::parse(&raw)?;
        }
        if let Some(raw) = non_empty_var("TUTOR_SESSION_MAPPING_URL") {
            config.mapping_url = Some(parse_mapping_url(&raw)?);
        }
        if let Some(raw) = non_empty_var("TUTOR_REPORT_DIR") {
            config.report_dir = PathBuf::from(raw);
        }
        Ok(config)
    }

    #[must_use]
    pub fn asset_base(&self) -> String {
        self.session_base.asset_base()
    }
}

/// # Errors
///
/// Returns `ConfigError::InvalidUrl` when `raw` is not an absolute URL.
pub fn parse_mapping_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        raw: raw.to_string(),
        source,
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_bases_gain_a_trailing_slash() {
        let base = SessionBase::parse("https://host/sets").unwrap();
        assert_eq!(base.asset_base(), "https://host/sets/");
        assert_eq!(
            base.locate("questions.json").unwrap(),
            SessionLocation::Remote(Url::parse("https://host/sets/questions.json").unwrap())
        );
    }

    #[test]
    fn plain_paths_are_directories() {
        let base = SessionBase::parse("data/sessions").unwrap();
        assert_eq!(
            base.locate("abc.json").unwrap(),
            SessionLocation::File(PathBuf::from("data/sessions/abc.json"))
        );
        assert!(base.asset_base().starts_with("file://"));
        assert!(base.asset_base().ends_with('/'));
    }

    #[test]
    fn file_scheme_without_authority_is_a_url() {
        let base = SessionBase::parse("file:/srv/sets").unwrap();
        assert_eq!(
            base,
            SessionBase::Url(Url::parse("file:///srv/sets/").unwrap())
        );
    }

    #[test]
    fn other_schemes_stay_directories() {
        let base = SessionBase::parse("c:sessions").unwrap();
        assert_eq!(base, SessionBase::Directory(PathBuf::from("c:sessions")));
    }

    #[test]
    fn blank_base_is_rejected() {
        assert!(matches!(
            SessionBase::parse("  "),
            Err(ConfigError::EmptySessionBase)
        ));
    }

    #[test]
    fn mapping_url_must_be_absolute() {
        assert!(parse_mapping_url("not a url").is_err());
        assert!(parse_mapping_url("https://gist.example/raw").is_ok());
    }
}
