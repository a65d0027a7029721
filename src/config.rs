//! Configuration module for the deployment pipeline
//!
//! This module handles all configuration loading from TOML files,
//! environment variables, and provides structured configuration types.

use serde::{Deserialize, Serialize};

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Wallet configuration (server-side signer only)
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Confirmation polling configuration
    #[serde(default)]
    pub confirm: ConfirmConfig,

    /// Monitoring and tracing
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Commitment level used for confirmation ("processed", "confirmed", "finalized")
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file (64-byte raw or JSON array format)
    pub keypair_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: "~/.config/solana/id.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmConfig {
    /// Deadline for confirmation polling in seconds; on expiry the attempt
    /// ends with ConfirmationTimedOut and is never resubmitted
    #[serde(default = "default_confirm_deadline")]
    pub deadline_secs: u64,

    /// Interval between status polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_confirm_deadline(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Enable tracing subscriber installation
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enable_tracing: default_true(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_rpc_timeout() -> u64 {
    30
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_confirm_deadline() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    500
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                endpoint: "https://api.mainnet-beta.solana.com".to_string(),
                timeout_secs: default_rpc_timeout(),
                commitment: default_commitment(),
            },
            wallet: WalletConfig::default(),
            confirm: ConfirmConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}
