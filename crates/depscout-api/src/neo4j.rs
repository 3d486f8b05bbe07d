// Neo4j HTTP transactional endpoint client, used for bulk loading
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Neo4jError {
    #[error("Authentication failed")]
    AuthFailed,

    #[error("Neo4j rejected statement: {code}: {message}")]
    Statement { code: String, message: String },

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Neo4jError>;

#[derive(Debug, Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Debug, Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

pub struct Neo4jClient {
    client: reqwest::Client,
    url: String,
    database: String,
    user: String,
    password: String,
    user_agent: String,
}

impl Neo4jClient {
    pub fn new(
        url: &str,
        database: &str,
        user: &str,
        password: &str,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            // LOAD CSV over a big crawl takes a while
            .timeout(Duration::from_secs(600))
            .build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            database: database.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            user_agent: user_agent.to_string(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn commit_url(&self) -> String {
        format!("{}/db/{}/tx/commit", self.url, self.database)
    }

    /// Run one statement in its own auto-committed transaction
    pub async fn run(&self, statement: &str) -> Result<()> {
        debug!("Running statement: {}", statement);

        let body = TxRequest {
            statements: vec![TxStatement { statement }],
        };

        let response = self
            .client
            .post(self.commit_url())
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Neo4jError::AuthFailed);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Neo4jError::RequestFailed(format!("Status {}: {}", status, text)));
        }

        let tx: TxResponse = response.json().await?;
        check_errors(tx)
    }
}

fn check_errors(tx: TxResponse) -> Result<()> {
    match tx.errors.into_iter().next() {
        Some(err) => Err(Neo4jError::Statement {
            code: err.code,
            message: err.message,
        }),
        None => Ok(()),
    }
}
