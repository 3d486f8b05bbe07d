use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry_if, RetryConfig};

pub const PYPI_API_BASE: &str = "https://pypi.org/pypi";
pub const DEFAULT_USER_AGENT: &str = concat!("depscout/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum PyPIError {
    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl PyPIError {
    /// Whether waiting and asking again has any chance of helping
    pub fn is_retryable(&self) -> bool {
        match self {
            PyPIError::NotFound(_) | PyPIError::ParseError(_) => false,
            PyPIError::RateLimitExceeded | PyPIError::RequestFailed(_) => true,
            PyPIError::NetworkError(e) => !e.is_decode(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PyPIError>;

/// `GET /pypi/<name>/json` response, trimmed to what the crawler reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyPIPackage {
    pub info: PyPIInfo,
    /// Files of the latest release
    #[serde(default)]
    pub urls: Vec<PyPIFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyPIInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub requires_dist: Option<Vec<String>>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_expression: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyPIFile {
    pub filename: String,
    #[serde(default)]
    pub packagetype: Option<String>,
    pub size: u64,
}

pub struct PyPIClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    retry_config: RetryConfig,
}

impl PyPIClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(PYPI_API_BASE.to_string(), timeout, DEFAULT_USER_AGENT)
    }

    /// For mirrors and devpi-style indexes that expose the same JSON API
    pub fn with_base_url(base_url: String, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{}/json", self.base_url, urlencoding::encode(name))
    }

    /// Fetch the metadata document for the latest release of `name`
    pub async fn get_package(&self, name: &str) -> Result<PyPIPackage> {
        let url = self.package_url(name);
        debug!("Fetching {}", url);

        with_retry_if(
            &self.retry_config,
            || async {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(PyPIError::NotFound(name.to_string()));
                }

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(PyPIError::RateLimitExceeded);
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    let err = PyPIError::RequestFailed(format!("Status {}: {}", status, body));
                    if is_retryable_status(status) {
                        return Err(err);
                    }
                    // 4xx other than 404/429 won't improve, report it as not found
                    return Err(PyPIError::NotFound(format!("{} ({})", name, status)));
                }

                let body = response.text().await?;
                let package: PyPIPackage = serde_json::from_str(&body)?;
                Ok(package)
            },
            PyPIError::is_retryable,
        )
        .await
    }
}
