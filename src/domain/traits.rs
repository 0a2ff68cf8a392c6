//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{AccountAddress, AccountData, AccountResource, LedgerInfo, ViewRequest};

/// Blockchain network client trait for fullnode reads
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Base URL of the fullnode this client talks to
    fn endpoint(&self) -> &str;

    /// Check fullnode connectivity
    async fn health_check(&self) -> Result<(), AppError> {
        self.get_ledger_info().await.map(|_| ())
    }

    /// Get the current ledger summary
    async fn get_ledger_info(&self) -> Result<LedgerInfo, AppError>;

    /// Get sequence number and authentication key of an account
    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData, AppError>;

    /// Get a single resource stored under an account
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, AppError>;

    /// Execute a view function and return its JSON-encoded results
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, AppError>;
}

/// Database client trait for query execution
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Execute a statement and return the number of affected rows.
    /// Parameters are bound as text; cast in SQL where needed (`$1::int`).
    async fn execute(&self, sql: &str, params: &[String]) -> Result<u64, AppError>;

    /// Run a query and return each row as a JSON object
    async fn query(&self, sql: &str, params: &[String])
    -> Result<Vec<serde_json::Value>, AppError>;
}

/// Source of configuration values, normally the process environment.
pub trait ConfigSource: Send + Sync {
    /// Returns the value for `key`, or `None` if unset.
    fn var(&self, key: &str) -> Option<String>;
}
