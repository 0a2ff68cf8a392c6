use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::{info, warn};

use aptos_client_factory::app::ClientFactory;
use aptos_client_factory::infra::{
    AppConfig, MESSAGE_BOARD_ABI, MessageBoard, ProcessEnv, init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format)?;

    // Any failure here aborts startup
    let mut factory = ClientFactory::from_config(&config, Arc::new(ProcessEnv))?;
    match config.message_board_address {
        Some(address) => factory = factory.with_contract_at(&MESSAGE_BOARD_ABI, address),
        None => info!("MESSAGE_BOARD_ADDRESS not set, message board disabled"),
    }

    let health = factory.health().await;
    println!("{}", serde_json::to_string_pretty(&health)?);

    match factory.account() {
        Ok(account) => info!(address = %account.address(), "Using signer account"),
        Err(e) => warn!(error = %e, "Signer account unavailable"),
    }

    if let Some(contract) = factory.contract_client() {
        let board = MessageBoard::new(contract);
        match board.exist_message().await {
            Ok(true) => match board.get_message_content().await {
                Ok(content) => info!(content = %content, "Current board message"),
                Err(e) => warn!(error = %e, "Could not read message board"),
            },
            Ok(false) => info!("Message board is empty"),
            Err(e) => warn!(error = %e, "Could not read message board"),
        }
    }

    Ok(())
}
