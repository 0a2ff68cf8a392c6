//! ABI-bound contract client layered over a [`NetworkClient`].
//!
//! Calls are checked against the bound module's ABI before anything is sent,
//! so a misspelled function or a wrong argument count fails locally.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{
    AccountAddress, AppError, ContractError, EntryFunctionPayload, MoveFunctionAbi,
    MoveModuleAbi, NetworkClient, ViewRequest,
};

pub struct ContractClient {
    network: Arc<dyn NetworkClient>,
    abi: &'static MoveModuleAbi,
    module_address: AccountAddress,
}

impl ContractClient {
    /// Bind a static module ABI to a network client.
    ///
    /// Fails if the ABI's module address is not a valid account address.
    pub fn new(
        network: Arc<dyn NetworkClient>,
        abi: &'static MoveModuleAbi,
    ) -> Result<Self, AppError> {
        let module_address: AccountAddress = abi.address.parse()?;
        Ok(Self::at(network, abi, module_address))
    }

    /// Bind a module ABI published at `module_address`, ignoring the
    /// address recorded in the descriptor.
    #[must_use]
    pub fn at(
        network: Arc<dyn NetworkClient>,
        abi: &'static MoveModuleAbi,
        module_address: AccountAddress,
    ) -> Self {
        Self {
            network,
            abi,
            module_address,
        }
    }

    #[must_use]
    pub fn abi(&self) -> &'static MoveModuleAbi {
        self.abi
    }

    #[must_use]
    pub fn module_address(&self) -> AccountAddress {
        self.module_address
    }

    /// Fully qualified function id, `<address>::<module>::<function>`.
    #[must_use]
    pub fn function_id(&self, function: &str) -> String {
        format!("{}::{}::{}", self.module_address, self.abi.name, function)
    }

    fn lookup(&self, function: &str) -> Result<&'static MoveFunctionAbi, ContractError> {
        self.abi
            .function(function)
            .ok_or_else(|| ContractError::UnknownFunction(function.to_string()))
    }

    fn check_arity(
        abi: &MoveFunctionAbi,
        type_arguments: &[String],
        arguments: &[serde_json::Value],
    ) -> Result<(), ContractError> {
        if type_arguments.len() != abi.generic_type_params {
            return Err(ContractError::TypeArgumentCount {
                function: abi.name.to_string(),
                expected: abi.generic_type_params,
                actual: type_arguments.len(),
            });
        }
        let expected = abi.caller_params().len();
        if arguments.len() != expected {
            return Err(ContractError::ArgumentCount {
                function: abi.name.to_string(),
                expected,
                actual: arguments.len(),
            });
        }
        Ok(())
    }

    /// Call a view function of the bound module.
    #[instrument(skip(self, type_arguments, arguments), fields(module = %self.abi.name))]
    pub async fn view(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let abi = self.lookup(function)?;
        if !abi.is_view {
            return Err(ContractError::NotView(function.to_string()).into());
        }
        Self::check_arity(abi, &type_arguments, &arguments)?;

        let request = ViewRequest {
            function: self.function_id(function),
            type_arguments,
            arguments,
        };
        debug!(function = %request.function, "Calling view function");
        self.network.view(&request).await
    }

    /// Build the payload for an entry function of the bound module.
    ///
    /// Signer parameters are supplied by the transaction sender and must not
    /// be passed in `arguments`.
    pub fn entry_payload(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> Result<EntryFunctionPayload, AppError> {
        let abi = self.lookup(function)?;
        if !abi.is_entry {
            return Err(ContractError::NotEntry(function.to_string()).into());
        }
        Self::check_arity(abi, &type_arguments, &arguments)?;

        Ok(EntryFunctionPayload::new(
            self.function_id(function),
            type_arguments,
            arguments,
        ))
    }
}
