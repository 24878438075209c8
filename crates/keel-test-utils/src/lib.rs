//! Test doubles for the decision gateway.

mod gateway;

pub use gateway::{FailingGateway, GatewayCall, ScriptedGateway};
