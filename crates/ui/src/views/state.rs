use dioxus::prelude::*;

use services::CatalogError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// A message that is safe to show the learner as-is.
    Catalog(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn from_catalog(err: &CatalogError) -> Self {
        match err {
            CatalogError::EmptyCode | CatalogError::NotFound { .. } => {
                Self::Catalog(err.to_string())
            }
            other => Self::Catalog(format!("Could not load session: {other}")),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Catalog(message) => message,
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Pending | UseResourceState::Paused | UseResourceState::Stopped => {
            ViewState::Loading
        }
    }
}
