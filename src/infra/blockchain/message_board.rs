//! Typed bindings for a `message_board` Move module.
//!
//! The module is published per deployment, so its address comes from
//! configuration (`MESSAGE_BOARD_ADDRESS`) rather than from the descriptor.

use std::sync::Arc;

use crate::domain::{
    AppError, ContractError, EntryFunctionPayload, MoveFunctionAbi, MoveModuleAbi, Visibility,
};

use super::contract::ContractClient;

/// Interface of the `message_board` module.
///
/// `address` is `0x0`: there is no canonical deployment. Bind it with
/// [`ContractClient::at`] or `ClientFactory::with_contract_at`.
pub static MESSAGE_BOARD_ABI: MoveModuleAbi = MoveModuleAbi {
    address: "0x0",
    name: "message_board",
    exposed_functions: &[
        MoveFunctionAbi {
            name: "exist_message",
            visibility: Visibility::Public,
            is_entry: false,
            is_view: true,
            generic_type_params: 0,
            params: &[],
            returns: &["bool"],
        },
        MoveFunctionAbi {
            name: "get_message_content",
            visibility: Visibility::Public,
            is_entry: false,
            is_view: true,
            generic_type_params: 0,
            params: &[],
            returns: &["0x1::string::String"],
        },
        MoveFunctionAbi {
            name: "post_message",
            visibility: Visibility::Public,
            is_entry: true,
            is_view: false,
            generic_type_params: 0,
            params: &["&signer", "0x1::string::String"],
            returns: &[],
        },
    ],
};

/// Strongly-typed calls on a contract client bound to [`MESSAGE_BOARD_ABI`].
pub struct MessageBoard {
    contract: Arc<ContractClient>,
}

impl MessageBoard {
    #[must_use]
    pub fn new(contract: Arc<ContractClient>) -> Self {
        Self { contract }
    }

    /// Whether a message has been posted yet.
    pub async fn exist_message(&self) -> Result<bool, AppError> {
        let values = self.contract.view("exist_message", vec![], vec![]).await?;
        values
            .first()
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| unexpected("exist_message", &values))
    }

    pub async fn get_message_content(&self) -> Result<String, AppError> {
        let values = self
            .contract
            .view("get_message_content", vec![], vec![])
            .await?;
        values
            .first()
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| unexpected("get_message_content", &values))
    }

    /// Payload replacing the board's message; sign and submit it as the poster.
    pub fn post_message(&self, content: &str) -> Result<EntryFunctionPayload, AppError> {
        self.contract
            .entry_payload("post_message", vec![], vec![serde_json::json!(content)])
    }
}

fn unexpected(function: &str, values: &[serde_json::Value]) -> AppError {
    ContractError::UnexpectedReturn {
        function: function.to_string(),
        message: format!("{values:?}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountAddress;
    use crate::test_utils::MockNetworkClient;

    fn board(network: &Arc<MockNetworkClient>) -> MessageBoard {
        let contract = ContractClient::new(Arc::clone(network) as _, &MESSAGE_BOARD_ABI).unwrap();
        MessageBoard::new(Arc::new(contract))
    }

    #[test]
    fn test_abi_address_is_valid() {
        let network = Arc::new(MockNetworkClient::new());
        assert!(ContractClient::new(network, &MESSAGE_BOARD_ABI).is_ok());
    }

    #[tokio::test]
    async fn test_bound_at_configured_address() {
        let network = Arc::new(MockNetworkClient::new());
        network.set_view_result(vec![serde_json::json!(false)]);
        let address: AccountAddress = "0xb0a2d".parse().unwrap();
        let contract = ContractClient::at(Arc::clone(&network) as _, &MESSAGE_BOARD_ABI, address);

        assert!(!MessageBoard::new(Arc::new(contract)).exist_message().await.unwrap());
        assert_eq!(
            network.view_requests()[0].function,
            format!("{address}::message_board::exist_message")
        );
    }

    #[tokio::test]
    async fn test_exist_message() {
        let network = Arc::new(MockNetworkClient::new());
        network.set_view_result(vec![serde_json::json!(true)]);

        assert!(board(&network).exist_message().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_message_content() {
        let network = Arc::new(MockNetworkClient::new());
        network.set_view_result(vec![serde_json::json!("hello aptos")]);

        let content = board(&network).get_message_content().await.unwrap();
        assert_eq!(content, "hello aptos");
        assert!(network.view_requests()[0]
            .function
            .ends_with("::message_board::get_message_content"));
    }

    #[tokio::test]
    async fn test_unexpected_return_shape() {
        let network = Arc::new(MockNetworkClient::new());
        network.set_view_result(vec![serde_json::json!(7)]);

        let result = board(&network).exist_message().await;
        assert!(matches!(
            result,
            Err(AppError::Contract(ContractError::UnexpectedReturn { .. }))
        ));
    }

    #[test]
    fn test_post_message_payload() {
        let network = Arc::new(MockNetworkClient::new());
        let payload = board(&network).post_message("gm").unwrap();

        assert!(payload.function.ends_with("::message_board::post_message"));
        assert_eq!(payload.arguments, vec![serde_json::json!("gm")]);
        assert!(payload.type_arguments.is_empty());
    }
}
