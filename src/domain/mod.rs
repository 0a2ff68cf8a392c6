//! Domain layer containing core types, traits, and error definitions.

pub mod abi;
pub mod error;
pub mod traits;
pub mod types;

pub use abi::{MoveFunctionAbi, MoveModuleAbi, Visibility};
pub use error::{AppError, BlockchainError, ConfigError, ContractError, DatabaseError};
pub use traits::{ConfigSource, DatabaseClient, NetworkClient};
pub use types::{
    AccountAddress, AccountData, AccountResource, EntryFunctionPayload, HealthResponse,
    HealthStatus, LedgerInfo, ViewRequest,
};
