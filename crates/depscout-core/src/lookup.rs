use crate::license::LicenseFields;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a metadata source knows about one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Raw requirement strings, version constraints and markers included
    pub dependency_specifiers: Vec<String>,
    /// Byte sizes of the release's distribution files
    pub artifact_sizes: Vec<u64>,
    pub license: LicenseFields,
}

impl PackageMetadata {
    /// Largest artifact, `None` for a release without files
    pub fn max_artifact_size(&self) -> Option<u64> {
        self.artifact_sizes.iter().copied().max()
    }
}

/// Why a lookup produced no metadata
///
/// The resolver treats both kinds the same way; the split exists for
/// reporting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("package not found: {0}")]
    NotFound(String),

    #[error("lookup failed: {0}")]
    Transient(String),
}

/// Trait for metadata sources - the resolver's only view of a registry
///
/// Implementations own their transport concerns (timeouts, retries).
/// By the time an error comes back here it is final for this run.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<PackageMetadata, LookupError>;
}

/// Lets a resolver borrow a source the caller keeps using afterwards
#[async_trait::async_trait]
impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    async fn lookup(&self, name: &str) -> Result<PackageMetadata, LookupError> {
        (**self).lookup(name).await
    }
}
