//! Dataset loading.
//!
//! Provides the `DatasetSource` trait and its implementations:
//! - `HttpSource`: reads the dataset from a web server
//! - `FileSource`: reads it from a local directory
//! - `MemorySource`: serves fixed bodies, for tests and demos
//!
//! Every read is single-shot: no retry and no cache.

use comparely_model::Dataset;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading a document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to load {path}: {reason}")]
    Transport { path: String, reason: String },

    #[error("Failed to load {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {path}: invalid JSON: {reason}")]
    Parse { path: String, reason: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl LoadError {
    /// The path that failed, if the error concerns one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Status { path, .. }
            | Self::Transport { path, .. }
            | Self::Io { path, .. }
            | Self::Parse { path, .. } => Some(path),
            Self::Client(_) => None,
        }
    }
}

/// Trait for places a JSON document can be read from.
pub trait DatasetSource {
    /// Read `path` and parse it as JSON.
    fn fetch_json<T: DeserializeOwned + Send>(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<T, LoadError>> + Send;

    /// Get the source name for logging.
    fn name(&self) -> &'static str;
}

/// Load and parse the product dataset at `path`.
pub async fn load_dataset<S: DatasetSource>(source: &S, path: &str) -> Result<Dataset, LoadError> {
    let dataset: Dataset = source.fetch_json(path).await?;
    tracing::debug!(
        source = source.name(),
        path,
        products = dataset.products.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

fn parse_body<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T, LoadError> {
    serde_json::from_slice(body).map_err(|e| LoadError::Parse {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// HTTP source configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL the dataset path is resolved against
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Reads documents over HTTP.
pub struct HttpSource {
    config: FetchConfig,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: FetchConfig) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LoadError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Use a preconfigured client. `timeout_secs` is then ignored.
    pub fn with_client(config: FetchConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Resolve a dataset path against the base URL.
    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl DatasetSource for HttpSource {
    async fn fetch_json<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, LoadError> {
        let url = self.url_for(path);
        tracing::debug!(url = %url, "Fetching document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Transport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| LoadError::Transport {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        parse_body(path, &body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for FileSource {
    async fn fetch_json<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, LoadError> {
        let full = self.root.join(path);
        tracing::debug!(path = %full.display(), "Reading document");

        let body = tokio::fs::read(&full).await.map_err(|e| LoadError::Io {
            path: path.to_string(),
            source: e,
        })?;

        parse_body(path, &body)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Serves fixed bodies by path. Unknown paths answer 404.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(path.into(), body.into());
        self
    }

    /// Serve `dataset` as JSON under `path`.
    pub fn with_dataset(self, path: impl Into<String>, dataset: &Dataset) -> Self {
        let body = serde_json::to_string(dataset).unwrap_or_default();
        self.with_document(path, body)
    }
}

impl DatasetSource for MemorySource {
    async fn fetch_json<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, LoadError> {
        match self.documents.get(path) {
            Some(body) => parse_body(path, body.as_bytes()),
            None => Err(LoadError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
