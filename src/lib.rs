//! Aptos Client Factory
//!
//! Builds the clients a service needs to talk to the Aptos testnet and a
//! hosted Postgres database, once, from environment configuration, and hands
//! out shared handles to them.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Application Layer              │
//! │   ClientFactory: shared handles, accessors   │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │     Traits, types, ABI descriptors, errors   │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │ Fullnode REST, contract ABI, signer, sqlx pg │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Handles
//!
//! - **Network client**: fullnode REST client bound to testnet
//! - **Contract client**: optional, typed calls checked against a static module ABI
//! - **Account**: Ed25519 signer derived from `PRIVATE_KEY` on every request
//! - **Database**: lazily-connecting Postgres pool from `DATABASE_URL`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use aptos_client_factory::app::ClientFactory;
//! use aptos_client_factory::infra::{AppConfig, MESSAGE_BOARD_ABI, ProcessEnv};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let board = "0xb0a2d".parse()?;
//!     let factory = ClientFactory::from_config(&config, Arc::new(ProcessEnv))?
//!         .with_contract_at(&MESSAGE_BOARD_ABI, board);
//!
//!     let ledger = factory.network_client().get_ledger_info().await?;
//!     let rows = factory.database().query("SELECT now() AS now", &[]).await?;
//!     let signer = factory.account()?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
