//! REST client for an Aptos fullnode.
//!
//! Reads go through the fullnode's JSON API. Transport failures and
//! 5xx/429 responses are retried; other API errors are returned as-is.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::domain::{
    AccountAddress, AccountData, AccountResource, AppError, BlockchainError, LedgerInfo,
    NetworkClient, ViewRequest,
};

/// Networks a client can be bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
    /// Any other fullnode REST base URL
    Custom(String),
}

impl Network {
    /// Base URL of the fullnode REST API
    #[must_use]
    pub fn fullnode_url(&self) -> &str {
        match self {
            Network::Mainnet => "https://api.mainnet.aptoslabs.com/v1",
            Network::Testnet => "https://api.testnet.aptoslabs.com/v1",
            Network::Devnet => "https://api.devnet.aptoslabs.com/v1",
            Network::Local => "http://127.0.0.1:8080/v1",
            Network::Custom(url) => url,
        }
    }

    /// Chain id for networks with a fixed one. Devnet is reset periodically.
    #[must_use]
    pub fn chain_id(&self) -> Option<u8> {
        match self {
            Network::Mainnet => Some(1),
            Network::Testnet => Some(2),
            Network::Local => Some(4),
            Network::Devnet | Network::Custom(_) => None,
        }
    }
}

/// Configuration for the fullnode client
#[derive(Debug)]
pub struct NetworkConfig {
    pub network: Network,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl NetworkConfig {
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.api_key = api_key;
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(Network::Testnet)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    error_code: Option<String>,
}

/// Aptos fullnode REST client
pub struct AptosClient {
    http_client: Client,
    base_url: String,
    config: NetworkConfig,
}

impl AptosClient {
    /// Create a new client with custom configuration
    pub fn new(config: NetworkConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Blockchain(BlockchainError::Connection(e.to_string())))?;
        let base_url = config
            .network
            .fullnode_url()
            .trim_end_matches('/')
            .to_string();
        info!(url = %base_url, network = ?config.network, "Created network client");
        Ok(Self {
            http_client,
            base_url,
            config,
        })
    }

    /// Create a testnet client with default configuration
    pub fn testnet() -> Result<Self, AppError> {
        Self::new(NetworkConfig::default())
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.config.network
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with retries. `build` is called once per attempt.
    #[instrument(skip(self, build))]
    async fn request<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        build: impl Fn() -> RequestBuilder + Send + Sync,
    ) -> Result<R, AppError> {
        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay).await;
            }
            match self.send_once(build()).await {
                Ok(result) => return Ok(result),
                Err(e) if is_retryable(&e) => {
                    warn!(attempt = attempt, error = ?e, endpoint = %endpoint, "Fullnode request failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            AppError::Blockchain(BlockchainError::Api("Unknown error".to_string()))
        }))
    }

    /// Execute a single request
    async fn send_once<R: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<R, AppError> {
        let builder = match &self.config.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Blockchain(BlockchainError::Timeout(e.to_string()))
            } else {
                AppError::Blockchain(BlockchainError::Connection(e.to_string()))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::Deserialization(e.to_string()));
        }

        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => match body.error_code {
                Some(code) => format!("{code}: {}", body.message),
                None => body.message,
            },
            Err(_) => status.to_string(),
        };

        Err(AppError::Blockchain(match status {
            StatusCode::NOT_FOUND => BlockchainError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => BlockchainError::Unavailable(message),
            s if s.is_server_error() => BlockchainError::Unavailable(message),
            s => BlockchainError::Api(format!("{}: {}", s.as_u16(), message)),
        }))
    }
}

fn is_retryable(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Blockchain(
            BlockchainError::Connection(_)
                | BlockchainError::Timeout(_)
                | BlockchainError::Unavailable(_)
        )
    )
}

#[async_trait]
impl NetworkClient for AptosClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    async fn get_ledger_info(&self) -> Result<LedgerInfo, AppError> {
        let url = self.url("/");
        self.request("ledger_info", || self.http_client.get(&url)).await
    }

    #[instrument(skip(self, address), fields(address = %address))]
    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData, AppError> {
        let url = self.url(&format!("/accounts/{address}"));
        self.request("account", || self.http_client.get(&url)).await
    }

    #[instrument(skip(self, address), fields(address = %address))]
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<AccountResource, AppError> {
        let url = self.url(&format!("/accounts/{address}/resource/{resource_type}"));
        self.request("account_resource", || self.http_client.get(&url)).await
    }

    #[instrument(skip(self, request), fields(function = %request.function))]
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, AppError> {
        let url = self.url("/view");
        self.request("view", || self.http_client.post(&url).json(request)).await
    }
}
