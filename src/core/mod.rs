// src/core/mod.rs
//! Configuration and the outbound gateway client

pub mod config_manager;
pub mod gateway_client;

pub use config_manager::{ChatConfig, ConfigManager, GatewayConfig, Strategy};
pub use gateway_client::{GatewayClient, RawCompletion};
