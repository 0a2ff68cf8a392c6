//! Application layer: the shared client context.

pub mod factory;

pub use factory::ClientFactory;
