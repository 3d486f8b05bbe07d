// Neo4j store - bridges the HTTP client with the GraphStore trait
use async_trait::async_trait;
use depscout_api::{Neo4jClient, Neo4jError};

use crate::{config::Neo4jConfig, loader::GraphStore, Error, Result};

pub struct Neo4jStore {
    client: Neo4jClient,
}

impl Neo4jStore {
    pub fn from_config(config: &Neo4jConfig, user_agent: &str) -> Result<Self> {
        let client = Neo4jClient::new(
            &config.url,
            &config.database,
            &config.user,
            &config.password,
            user_agent,
        )
        .map_err(|e| Error::ApiError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn run(&self, statement: &str) -> Result<()> {
        self.client.run(statement).await.map_err(neo4j_to_error)
    }
}

fn neo4j_to_error(err: Neo4jError) -> Error {
    match err {
        Neo4jError::NetworkError(e) => Error::NetworkError(e),
        other => Error::GraphStoreError(other.to_string()),
    }
}
