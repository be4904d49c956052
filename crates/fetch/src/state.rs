//! Load status of a chart's assets.

use std::fmt::Display;

/// Where a chart stands with its data.
///
/// Every chart starts in `Loading` and moves once to `Failed` or `Ready`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    /// Settle a load, keeping only the error's message.
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            LoadState::Loading | LoadState::Failed(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Failed(message) => LoadState::Failed(message),
            LoadState::Ready(value) => LoadState::Ready(f(value)),
        }
    }

    /// Chain a fallible step, turning its error into `Failed`.
    pub fn and_then<U, E: Display, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Failed(message) => LoadState::Failed(message),
            LoadState::Ready(value) => LoadState::from_result(f(value)),
        }
    }
}
