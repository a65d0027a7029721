//! Token deployment pipeline for a Solana launchpad
//!
//! This library turns user-entered token parameters (name, symbol, decimals,
//! supply, image) into one atomically submitted transaction that creates the
//! mint, funds it, opens the owner's holding account, mints the initial
//! supply, and attaches a Metaplex metadata record.
//!
//! The UI layer (routing, forms, wallet-connect chrome) lives elsewhere; this
//! crate only needs a [`wallet::RemoteSigner`] for the connected wallet and a
//! [`rpc::NetworkClient`] for rent, submission, and confirmation status.

pub mod config;
pub mod observability;
pub mod rpc;
pub mod structured_logging;
pub mod types;
pub mod wallet;

// The deployment pipeline supercomponent
pub mod deployer;

// Test-only mocks (compiled under cfg(test) or the test_utils feature)
pub mod test_utils;

// Re-export commonly used types
pub use deployer::{DeployError, FieldError, TokenDeployer};
pub use types::{DeployConfirmation, DeploymentOutcome, DeploymentRequest};
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
