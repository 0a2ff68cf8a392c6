//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::{
    AccountAddress, AccountData, AccountResource, AppError, BlockchainError, ConfigSource,
    DatabaseClient, DatabaseError, LedgerInfo, NetworkClient, ViewRequest,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

/// In-memory configuration source.
///
/// # Example
///
/// ```
/// use aptos_client_factory::domain::ConfigSource;
/// use aptos_client_factory::test_utils::MapSource;
///
/// let source = MapSource::new().with("PRIVATE_KEY", "to_fill");
/// assert_eq!(source.var("PRIVATE_KEY").as_deref(), Some("to_fill"));
/// ```
#[derive(Debug, Default)]
pub struct MapSource {
    values: RwLock<HashMap<String, String>>,
}

impl MapSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().unwrap().remove(key);
    }
}

impl ConfigSource for MapSource {
    fn var(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }
}

/// Endpoint reported by [`MockNetworkClient`].
pub const MOCK_ENDPOINT: &str = "mock://fullnode";

/// Mock network client for testing.
///
/// Simulates fullnode reads without network calls. View calls are recorded
/// and answered with a configurable result.
///
/// # Example
///
/// ```
/// use aptos_client_factory::test_utils::{MockNetworkClient, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockNetworkClient::new();
///
/// // Create a mock that fails
/// let failing_mock = MockNetworkClient::with_config(MockConfig::failure("API error"));
/// ```
pub struct MockNetworkClient {
    view_requests: Arc<Mutex<Vec<ViewRequest>>>,
    view_result: Mutex<Vec<serde_json::Value>>,
    accounts: Mutex<HashMap<AccountAddress, AccountData>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
    ledger_version: AtomicU64,
}

impl MockNetworkClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            view_requests: Arc::new(Mutex::new(Vec::new())),
            view_result: Mutex::new(Vec::new()),
            accounts: Mutex::new(HashMap::new()),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
            ledger_version: AtomicU64::new(1000),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Sets the value returned by every view call.
    pub fn set_view_result(&self, result: Vec<serde_json::Value>) {
        *self.view_result.lock().unwrap() = result;
    }

    /// Gets all recorded view requests.
    pub fn view_requests(&self) -> Vec<ViewRequest> {
        self.view_requests.lock().unwrap().clone()
    }

    /// Registers an on-chain account.
    pub fn insert_account(&self, address: AccountAddress, data: AccountData) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    /// Sets the mock ledger version.
    pub fn set_ledger_version(&self, version: u64) {
        self.ledger_version.store(version, Ordering::Relaxed);
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock network error".to_string());
            return Err(AppError::Blockchain(BlockchainError::Api(msg)));
        }
        Ok(())
    }
}

impl Default for MockNetworkClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkClient for MockNetworkClient {
    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Blockchain(BlockchainError::Connection(
                "Mock network unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn get_ledger_info(&self) -> Result<LedgerInfo, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        let version = self.ledger_version.load(Ordering::Relaxed);
        Ok(LedgerInfo {
            chain_id: 2,
            epoch: 1,
            ledger_version: version,
            oldest_ledger_version: 0,
            ledger_timestamp: 0,
            block_height: version / 10,
            oldest_block_height: 0,
            node_role: "full_node".to_string(),
        })
    }

    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        self.accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| {
                AppError::Blockchain(BlockchainError::NotFound(format!(
                    "account_not_found: {address}"
                )))
            })
    }

    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        Err(AppError::Blockchain(BlockchainError::NotFound(format!(
            "resource_not_found: {resource_type} at {address}"
        ))))
    }

    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        self.view_requests.lock().unwrap().push(request.clone());
        Ok(self.view_result.lock().unwrap().clone())
    }
}

/// Mock database client for testing.
///
/// Records executed statements and answers queries with configured rows.
pub struct MockDatabaseClient {
    statements: Arc<Mutex<Vec<String>>>,
    rows: Mutex<Vec<serde_json::Value>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            statements: Arc::new(Mutex::new(Vec::new())),
            rows: Mutex::new(Vec::new()),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Sets the rows returned by `query`.
    pub fn set_rows(&self, rows: Vec<serde_json::Value>) {
        *self.rows.lock().unwrap() = rows;
    }

    /// Gets all statements passed to `execute` or `query`.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn execute(&self, sql: &str, _params: &[String]) -> Result<u64, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        self.statements.lock().unwrap().push(sql.to_string());
        Ok(1)
    }

    async fn query(
        &self,
        sql: &str,
        _params: &[String],
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.increment_call_count();
        self.check_should_fail()?;

        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.rows.lock().unwrap().clone())
    }
}
