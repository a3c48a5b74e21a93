//! Helpers for tests, here and in downstream crates. Nothing in the engine itself depends on this module.
mod mock_gateway;
#[cfg(feature = "sqlite")]
pub mod prepare_env;

pub use mock_gateway::{GatewayCall, MockGateway};
