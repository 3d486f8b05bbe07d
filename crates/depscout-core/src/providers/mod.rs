// Implementations of the resolver's and loader's external seams
pub mod neo4j;
pub mod pypi;

pub use neo4j::Neo4jStore;
pub use pypi::PyPIProvider;
