// PyPI provider - bridges the JSON API client with the MetadataSource trait
use async_trait::async_trait;
use depscout_api::{PyPIClient, PyPIError, PyPIPackage};

use crate::{
    config::{RegistryConfig, RetrySettings},
    license::LicenseFields,
    lookup::{LookupError, MetadataSource, PackageMetadata},
    Error, Result,
};

/// Wrapper around PyPIClient that implements MetadataSource
pub struct PyPIProvider {
    client: PyPIClient,
}

impl PyPIProvider {
    pub fn new(client: PyPIClient) -> Self {
        Self { client }
    }

    pub fn from_config(registry: &RegistryConfig, retry: &RetrySettings) -> Result<Self> {
        let client = PyPIClient::with_base_url(
            registry.base_url.clone(),
            registry.timeout(),
            &registry.user_agent,
        )
        .map_err(|e| Error::ApiError(e.to_string()))?
        .with_retry_config(retry.to_retry_config());

        Ok(Self::new(client))
    }
}

#[async_trait]
impl MetadataSource for PyPIProvider {
    async fn lookup(&self, name: &str) -> std::result::Result<PackageMetadata, LookupError> {
        let package = self
            .client
            .get_package(name)
            .await
            .map_err(pypi_to_lookup_error)?;

        Ok(pypi_to_metadata(package))
    }
}

fn pypi_to_lookup_error(err: PyPIError) -> LookupError {
    match err {
        PyPIError::NotFound(name) => LookupError::NotFound(name),
        other => LookupError::Transient(other.to_string()),
    }
}

/// Convert a PyPI document to our registry-agnostic metadata
fn pypi_to_metadata(pkg: PyPIPackage) -> PackageMetadata {
    PackageMetadata {
        dependency_specifiers: pkg.info.requires_dist.unwrap_or_default(),
        artifact_sizes: pkg.urls.iter().map(|f| f.size).collect(),
        license: LicenseFields {
            license_expression: pkg.info.license_expression,
            license: pkg.info.license,
            classifiers: pkg.info.classifiers,
        },
    }
}
