use crate::Result;
use tracing::info;

/// Anything that can execute bulk-load statements
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    async fn run(&self, statement: &str) -> Result<()>;
}

/// Runs the exporter's statements against a graph store, in order
pub struct GraphLoader<G> {
    store: G,
}

impl<G: GraphStore> GraphLoader<G> {
    pub fn new(store: G) -> Self {
        Self { store }
    }

    /// Run every statement, stopping at the first one the store rejects
    ///
    /// Returns how many statements ran.
    pub async fn load(&self, statements: &[String]) -> Result<usize> {
        for (i, statement) in statements.iter().enumerate() {
            info!("Running load step {}/{}", i + 1, statements.len());
            self.store.run(statement).await?;
        }
        Ok(statements.len())
    }
}
