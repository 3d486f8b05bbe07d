// HTTP clients for everything the crawler talks to
pub mod neo4j;
pub mod pypi;
pub mod ranking;
pub mod retry;

// Re-export common types
pub use neo4j::{Neo4jClient, Neo4jError};
pub use pypi::{DEFAULT_USER_AGENT, PyPIClient, PyPIError, PyPIFile, PyPIInfo, PyPIPackage};
pub use ranking::{RankingClient, RankingError, TOP_PYPI_PACKAGES_URL};
pub use retry::RetryConfig;
