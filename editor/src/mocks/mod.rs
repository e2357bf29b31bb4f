//! Mock provider implementations for testing.
//!
//! In-memory stand-ins for the provider traits, usable from unit and
//! integration tests.

pub mod gateway;

pub use gateway::{GatewayCall, MockEntityGateway};
