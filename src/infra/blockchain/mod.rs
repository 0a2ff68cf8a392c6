//! Blockchain client implementations.

pub mod account;
pub mod aptos;
pub mod contract;
pub mod message_board;

pub use account::{Account, PRIVATE_KEY_ENV, PRIVATE_KEY_PLACEHOLDER};
pub use aptos::{AptosClient, Network, NetworkConfig};
pub use contract::ContractClient;
pub use message_board::{MESSAGE_BOARD_ABI, MessageBoard};
