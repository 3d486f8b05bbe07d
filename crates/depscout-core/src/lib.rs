// Core crawl logic lives here - the brain of the operation
pub mod config;
pub mod error;
pub mod export;
pub mod license;
pub mod loader;
pub mod lookup;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod seeds;

pub use config::Config;
pub use error::Error;
pub use export::{ExportPaths, Exporter};
pub use license::{License, LicenseFields};
pub use loader::{GraphLoader, GraphStore};
pub use lookup::{LookupError, MetadataSource, PackageMetadata};
pub use models::{DependencyEdge, DependencyGraph, PackageNode};
pub use resolver::{CrawlReport, FailureKind, LookupFailure, Resolver};
pub use seeds::SeedList;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
