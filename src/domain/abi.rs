//! Static Move module interface descriptors.
//!
//! These mirror the ABI shape the fullnode returns for a module, but are
//! built as `const` data so a contract client can be bound without any
//! parsing at startup.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Friend,
    Private,
}

/// One function exposed by a Move module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveFunctionAbi {
    pub name: &'static str,
    pub visibility: Visibility,
    pub is_entry: bool,
    pub is_view: bool,
    pub generic_type_params: usize,
    pub params: &'static [&'static str],
    #[serde(rename = "return")]
    pub returns: &'static [&'static str],
}

impl MoveFunctionAbi {
    /// Parameters a caller supplies, i.e. excluding leading signer references.
    pub fn caller_params(&self) -> &'static [&'static str] {
        let params: &'static [&'static str] = self.params;
        let signers = params
            .iter()
            .take_while(|p| matches!(**p, "signer" | "&signer"))
            .count();
        &params[signers..]
    }
}

/// Interface description of a deployed Move module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveModuleAbi {
    pub address: &'static str,
    pub name: &'static str,
    pub exposed_functions: &'static [MoveFunctionAbi],
}

impl MoveModuleAbi {
    pub fn function(&self, name: &str) -> Option<&'static MoveFunctionAbi> {
        self.exposed_functions.iter().find(|f| f.name == name)
    }
}
