use std::path::PathBuf;
use thiserror::Error;

/// Result type for asset loading.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while loading an asset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Names must be relative paths without `..` components.
    #[error("Invalid asset name: '{0}'")]
    InvalidName(String),

    #[error("Failed to decode workbook: {0}")]
    Sheet(#[from] eurochart_sheet::SheetError),

    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
