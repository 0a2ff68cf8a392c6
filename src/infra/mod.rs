//! Infrastructure layer implementations.

pub mod blockchain;
pub mod config;
pub mod database;
pub mod observability;

pub use blockchain::{
    Account, AptosClient, ContractClient, MESSAGE_BOARD_ABI, MessageBoard, Network, NetworkConfig,
};
pub use config::{AppConfig, LogFormat, ProcessEnv};
pub use database::{PostgresClient, PostgresConfig};
pub use observability::init_tracing;
