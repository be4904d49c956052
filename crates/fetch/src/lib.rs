//! # eurochart-fetch
//!
//! One-shot loading of the dashboard's static assets.
//!
//! Assets live either in a local directory or under an HTTP base URL. Each
//! load is a single read or GET: no retries, no caching, no cancellation.
//! HTTP/2 is negotiated via ALPN with fallback to HTTP/1.1.

mod error;
mod state;

pub use error::{FetchError, FetchResult};
pub use state::LoadState;

use eurochart_sheet::{Book, SheetFormat};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Where assets are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Dir(PathBuf),
    /// Base URL; asset names are appended after a `/`.
    Url(String),
}

impl AssetSource {
    /// `http://` and `https://` locations are URLs, anything else a directory.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            AssetSource::Url(location.to_string())
        } else {
            AssetSource::Dir(PathBuf::from(location))
        }
    }

    /// Full location of an asset, as a path or URL string.
    #[must_use]
    pub fn locate(&self, name: &str) -> String {
        match self {
            AssetSource::Dir(dir) => dir.join(name).display().to_string(),
            AssetSource::Url(base) => format!("{}/{}", base.trim_end_matches('/'), name),
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Dir(dir) => write!(f, "{}", dir.display()),
            AssetSource::Url(base) => write!(f, "{base}"),
        }
    }
}

/// Loads assets from one [`AssetSource`].
#[derive(Debug, Clone)]
pub struct AssetClient {
    source: AssetSource,
    client: Client,
}

impl AssetClient {
    /// Constructs a client with a 30-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if building the HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use eurochart_fetch::{AssetClient, AssetSource};
    /// let client = AssetClient::new(AssetSource::parse("public/assets")).unwrap();
    /// ```
    pub fn new(source: AssetSource) -> FetchResult<Self> {
        Self::with_timeout(source, 30)
    }

    /// Constructs a client with a custom request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if building the HTTP client fails.
    pub fn with_timeout(source: AssetSource, timeout_secs: u64) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()?;

        Ok(Self { source, client })
    }

    #[must_use]
    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Load the raw bytes of one asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain relative path, the file
    /// cannot be read, or the server answers with a non-success status.
    pub async fn fetch(&self, name: &str) -> FetchResult<Vec<u8>> {
        validate_name(name)?;

        let bytes = match &self.source {
            AssetSource::Dir(dir) => {
                let path = dir.join(name);
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| FetchError::Io { path, source })?
            }
            AssetSource::Url(_) => {
                let url = self.source.locate(name);
                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    return Err(FetchError::Http {
                        url,
                        status: response.status().as_u16(),
                    });
                }
                response.bytes().await?.to_vec()
            }
        };

        debug!(asset = name, bytes = bytes.len(), "loaded asset");
        Ok(bytes)
    }

    /// Load several assets concurrently.
    ///
    /// Results come back in the order of `names`; one failure does not
    /// affect the others.
    pub async fn fetch_all(&self, names: &[&str]) -> Vec<FetchResult<Vec<u8>>> {
        let futures: Vec<_> = names.iter().map(|name| self.fetch(name)).collect();
        let results = futures::future::join_all(futures).await;

        for (name, result) in names.iter().zip(&results) {
            if let Err(e) = result {
                warn!(asset = *name, error = %e, "failed to load asset");
            }
        }
        results
    }

    /// Load and decode a workbook, choosing the reader from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the bytes are not a workbook.
    pub async fn fetch_book(&self, name: &str) -> FetchResult<Book> {
        // Reject unknown formats before spending a request on them
        SheetFormat::from_path(name)?;
        let bytes = self.fetch(name).await?;
        Ok(Book::from_bytes(name, bytes)?)
    }

    /// Load and deserialize a JSON asset.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the JSON does not match `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, name: &str) -> FetchResult<T> {
        let bytes = self.fetch(name).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn validate_name(name: &str) -> FetchResult<()> {
    let path = Path::new(name);
    let plain = !name.trim().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(())
    } else {
        Err(FetchError::InvalidName(name.to_string()))
    }
}
