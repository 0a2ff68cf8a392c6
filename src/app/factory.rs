//! Process-wide client context.
//!
//! [`ClientFactory`] is built once at startup and then shared (usually behind
//! an `Arc`) with everything that needs the network, contract or database
//! handles. Construction is where configuration errors surface; once built,
//! the handles never change.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::domain::{
    AccountAddress, AppError, ConfigError, ConfigSource, DatabaseClient, HealthResponse, HealthStatus,
    MoveModuleAbi, NetworkClient,
};
use crate::infra::blockchain::{Account, PRIVATE_KEY_ENV, PRIVATE_KEY_PLACEHOLDER};
use crate::infra::config::non_empty;
use crate::infra::{AppConfig, AptosClient, ContractClient, PostgresClient, ProcessEnv};

/// Shared clients for the lifetime of the process.
///
/// All contained handles are `Arc`s to immutable, `Send + Sync` clients, so
/// the accessors are plain reads and may be called from any task.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env()?;
/// let factory = ClientFactory::from_config(&config, Arc::new(ProcessEnv))?
///     .with_contract_at(&MESSAGE_BOARD_ABI, board_address);
///
/// let ledger = factory.network_client().get_ledger_info().await?;
/// let signer = factory.account()?;
/// ```
#[derive(Clone)]
pub struct ClientFactory {
    network_client: Arc<dyn NetworkClient>,
    contract_client: Option<Arc<ContractClient>>,
    db_client: Arc<dyn DatabaseClient>,
    config_source: Arc<dyn ConfigSource>,
}

impl ClientFactory {
    /// Creates a factory from already-constructed clients.
    ///
    /// # Arguments
    ///
    /// * `network_client` - Network client shared by all callers.
    /// * `db_client` - Database handle shared by all callers.
    /// * `config_source` - Where `PRIVATE_KEY` is looked up on each `account()` call.
    #[must_use]
    pub fn new(
        network_client: Arc<dyn NetworkClient>,
        db_client: Arc<dyn DatabaseClient>,
        config_source: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            network_client,
            contract_client: None,
            db_client,
            config_source,
        }
    }

    /// Builds the testnet network client and the database pool.
    ///
    /// Fails if the database connection string is malformed; callers are
    /// expected to abort startup on error.
    ///
    /// # Panics
    ///
    /// The pool spawns its maintenance tasks on creation, so this must be
    /// called from within a Tokio runtime.
    pub fn from_config(
        config: &AppConfig,
        config_source: Arc<dyn ConfigSource>,
    ) -> Result<Self, AppError> {
        let network_client = AptosClient::new(config.network_config())?;
        let db_client = PostgresClient::new(&config.database_url, config.postgres_config())?;

        info!("Client factory initialized");
        Ok(Self::new(
            Arc::new(network_client),
            Arc::new(db_client),
            config_source,
        ))
    }

    /// Reads configuration from the process environment and builds the factory.
    ///
    /// Like [`Self::from_config`], must be called from within a Tokio runtime.
    pub fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        Self::from_config(&config, Arc::new(ProcessEnv))
    }

    /// Binds a contract ABI to the network client, enabling [`Self::contract_client`].
    pub fn with_contract(mut self, abi: &'static MoveModuleAbi) -> Result<Self, AppError> {
        let contract = ContractClient::new(Arc::clone(&self.network_client), abi)?;
        info!(module = %abi.name, address = %contract.module_address(), "Bound contract ABI");
        self.contract_client = Some(Arc::new(contract));
        Ok(self)
    }

    /// Binds a contract ABI published at `address`, enabling [`Self::contract_client`].
    #[must_use]
    pub fn with_contract_at(mut self, abi: &'static MoveModuleAbi, address: AccountAddress) -> Self {
        let contract = ContractClient::at(Arc::clone(&self.network_client), abi, address);
        info!(module = %abi.name, address = %address, "Bound contract ABI");
        self.contract_client = Some(Arc::new(contract));
        self
    }

    /// The shared network client.
    #[must_use]
    pub fn network_client(&self) -> Arc<dyn NetworkClient> {
        Arc::clone(&self.network_client)
    }

    /// The shared contract client, if an ABI was bound.
    #[must_use]
    pub fn contract_client(&self) -> Option<Arc<ContractClient>> {
        self.contract_client.clone()
    }

    /// The shared database handle.
    #[must_use]
    pub fn database(&self) -> Arc<dyn DatabaseClient> {
        Arc::clone(&self.db_client)
    }

    /// Derives the signer account from `PRIVATE_KEY`.
    ///
    /// The key is re-read on every call and the account is not cached.
    ///
    /// # Errors
    ///
    /// * `ConfigError::MissingEnvVar` if the key is unset or blank.
    /// * `ConfigError::PlaceholderValue` if it is still `"to_fill"`.
    /// * `ConfigError::InvalidValue` if it is not a 32-byte hex key.
    pub fn account(&self) -> Result<Account, AppError> {
        let raw = non_empty(self.config_source.as_ref(), PRIVATE_KEY_ENV)
            .ok_or_else(|| ConfigError::MissingEnvVar(PRIVATE_KEY_ENV.to_string()))?;
        if raw.trim() == PRIVATE_KEY_PLACEHOLDER {
            return Err(ConfigError::PlaceholderValue(PRIVATE_KEY_ENV.to_string()).into());
        }
        Ok(Account::from_private_key(&SecretString::from(raw))?)
    }

    /// Checks the network and database handles concurrently.
    pub async fn health(&self) -> HealthResponse {
        let (database, network) = tokio::join!(
            self.db_client.health_check(),
            self.network_client.health_check()
        );

        let database = match database {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };
        let network = match network {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = %e, "Network health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(database, network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatabaseError;
    use crate::infra::{MESSAGE_BOARD_ABI, Network};
    use crate::infra::config::DATABASE_URL_ENV;
    use crate::test_utils::{MapSource, MockDatabaseClient, MockNetworkClient};

    const KEY: &str = "0x0707070707070707070707070707070707070707070707070707070707070707";

    fn factory_with(source: MapSource) -> ClientFactory {
        ClientFactory::new(
            Arc::new(MockNetworkClient::new()),
            Arc::new(MockDatabaseClient::new()),
            Arc::new(source),
        )
    }

    #[test]
    fn test_network_client_is_shared() {
        let factory = factory_with(MapSource::new());
        assert!(Arc::ptr_eq(
            &factory.network_client(),
            &factory.network_client()
        ));
        assert!(Arc::ptr_eq(&factory.database(), &factory.database()));
    }

    #[test]
    fn test_contract_client_optional() {
        let factory = factory_with(MapSource::new());
        assert!(factory.contract_client().is_none());

        let factory = factory.with_contract(&MESSAGE_BOARD_ABI).unwrap();
        let first = factory.contract_client().unwrap();
        let second = factory.contract_client().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clone_shares_handles() {
        let factory = factory_with(MapSource::new())
            .with_contract(&MESSAGE_BOARD_ABI)
            .unwrap();
        let cloned = factory.clone();

        assert!(Arc::ptr_eq(
            &factory.network_client(),
            &cloned.network_client()
        ));
        assert!(Arc::ptr_eq(
            &factory.contract_client().unwrap(),
            &cloned.contract_client().unwrap()
        ));
    }

    #[test]
    fn test_account_missing_key() {
        let factory = factory_with(MapSource::new());
        assert!(matches!(
            factory.account(),
            Err(AppError::Config(ConfigError::MissingEnvVar(key))) if key == PRIVATE_KEY_ENV
        ));
    }

    #[test]
    fn test_account_placeholder_key() {
        let factory = factory_with(MapSource::new().with(PRIVATE_KEY_ENV, "to_fill"));
        assert!(matches!(
            factory.account(),
            Err(AppError::Config(ConfigError::PlaceholderValue(_)))
        ));
    }

    #[test]
    fn test_account_is_deterministic() {
        let factory = factory_with(MapSource::new().with(PRIVATE_KEY_ENV, KEY));
        let first = factory.account().unwrap();
        let second = factory.account().unwrap();

        assert_eq!(first.address(), second.address());
        assert_eq!(first.public_key(), second.public_key());
    }

    #[test]
    fn test_account_rereads_source() {
        let source = Arc::new(MapSource::new());
        let factory = ClientFactory::new(
            Arc::new(MockNetworkClient::new()),
            Arc::new(MockDatabaseClient::new()),
            Arc::clone(&source) as _,
        );
        assert!(factory.account().is_err());

        source.set(PRIVATE_KEY_ENV, KEY);
        assert!(factory.account().is_ok());
    }

    #[tokio::test]
    async fn test_from_config_builds_real_clients() {
        let source = MapSource::new().with(DATABASE_URL_ENV, "postgres://u:p@db.example.invalid/app");
        let config = AppConfig::from_source(&source).unwrap();

        let factory = ClientFactory::from_config(&config, Arc::new(source)).unwrap();
        assert!(factory.contract_client().is_none());
        assert!(factory.account().is_err());
    }

    #[tokio::test]
    async fn test_from_config_binds_testnet() {
        let source = MapSource::new().with(DATABASE_URL_ENV, "postgres://u:p@db.example.invalid/app");
        let config = AppConfig::from_source(&source).unwrap();

        let factory = ClientFactory::from_config(&config, Arc::new(source)).unwrap();
        assert_eq!(
            factory.network_client().endpoint(),
            Network::Testnet.fullnode_url()
        );
    }

    #[tokio::test]
    async fn test_from_config_rejects_malformed_url() {
        for url in ["::not a url::", "redis://cache:6379", "localhost:5432/app"] {
            let source = MapSource::new().with(DATABASE_URL_ENV, url);
            let config = AppConfig::from_source(&source).unwrap();

            assert!(
                matches!(
                    ClientFactory::from_config(&config, Arc::new(source)),
                    Err(AppError::Database(DatabaseError::InvalidUrl(_)))
                ),
                "{url} should abort startup"
            );
        }
    }

    #[test]
    fn test_with_contract_at_uses_given_address() {
        let address: AccountAddress = "0xb0a2d".parse().unwrap();
        let factory = factory_with(MapSource::new()).with_contract_at(&MESSAGE_BOARD_ABI, address);

        let contract = factory.contract_client().unwrap();
        assert_eq!(contract.module_address(), address);
        assert_eq!(
            contract.function_id("exist_message"),
            format!("{address}::message_board::exist_message")
        );
    }

    #[tokio::test]
    async fn test_health_reports_each_client() {
        let network = Arc::new(MockNetworkClient::new());
        let db = Arc::new(MockDatabaseClient::new());
        let factory = ClientFactory::new(
            Arc::clone(&network) as _,
            Arc::clone(&db) as _,
            Arc::new(MapSource::new()),
        );

        assert_eq!(factory.health().await.status, HealthStatus::Healthy);

        db.set_healthy(false);
        let report = factory.health().await;
        assert_eq!(report.database, HealthStatus::Unhealthy);
        assert_eq!(report.network, HealthStatus::Healthy);
        assert_eq!(report.status, HealthStatus::Degraded);
    }
}
