//! Network client seam for the deployment pipeline
//!
//! The pipeline needs exactly three things from the network: the rent-exempt
//! minimum for a fixed account size, one-shot transaction submission, and
//! confirmation status for a signature (plus the blockhash that transaction
//! assembly requires). [`NetworkClient`] captures that surface so the whole
//! pipeline can run against mocks; [`RpcNetworkClient`] is the production
//! implementation over `solana-client`.

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcError;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::RpcConfig;

/// Network-level failure, split by whether the node got to judge the
/// transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The endpoint could not be reached or the request did not complete
    #[error("transport error: {0}")]
    Transport(String),

    /// The node validated the request and refused it
    #[error("rejected by network: {0}")]
    Rejected(String),
}

/// Confirmation status of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Not yet visible at the configured commitment level
    Unconfirmed,

    /// Reached the configured commitment level
    Confirmed,

    /// Landed but failed execution
    Failed(String),
}

/// Minimal network surface the pipeline depends on
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Minimum lamport balance for an account of `data_len` bytes to be
    /// exempt from rent collection
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, NetworkError>;

    /// Latest blockhash for transaction assembly
    async fn latest_blockhash(&self) -> Result<Hash, NetworkError>;

    /// Submit a fully signed transaction, returning its signature
    ///
    /// Returns [`NetworkError::Rejected`] when the node validated and
    /// refused the transaction (insufficient funds, duplicate account, ...),
    /// [`NetworkError::Transport`] when it never got to judge it.
    async fn submit(&self, transaction: &Transaction) -> Result<Signature, NetworkError>;

    /// Confirmation status of a previously submitted signature
    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, NetworkError>;
}

/// Production [`NetworkClient`] over the nonblocking Solana RPC client
pub struct RpcNetworkClient {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcNetworkClient {
    /// Build a client from the RPC configuration section
    pub fn from_config(config: &RpcConfig) -> anyhow::Result<Self> {
        let commitment = CommitmentConfig::from_str(&config.commitment)
            .map_err(|e| anyhow::anyhow!("invalid commitment '{}': {}", config.commitment, e))?;
        Ok(Self {
            client: RpcClient::new_with_timeout_and_commitment(
                config.endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
                commitment,
            ),
            commitment,
        })
    }

    /// Owner balance lookup, used by callers to surface funding problems
    /// before an attempt is started
    pub async fn balance(&self, pubkey: &Pubkey) -> Result<u64, NetworkError> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))
    }
}

/// Split an RPC client error into transport vs. node-side rejection
fn classify(err: ClientError) -> NetworkError {
    match err.kind() {
        ClientErrorKind::TransactionError(te) => NetworkError::Rejected(te.to_string()),
        ClientErrorKind::RpcError(RpcError::RpcResponseError { message, .. }) => {
            NetworkError::Rejected(message.clone())
        }
        _ => NetworkError::Transport(err.to_string()),
    }
}

#[async_trait]
impl NetworkClient for RpcNetworkClient {
    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, NetworkError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))
    }

    async fn latest_blockhash(&self) -> Result<Hash, NetworkError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature, NetworkError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(classify)
    }

    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, NetworkError> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            None => return Ok(TxStatus::Unconfirmed),
        };

        if let Some(err) = status.err {
            return Ok(TxStatus::Failed(err.to_string()));
        }
        if status.satisfies_commitment(self.commitment) {
            Ok(TxStatus::Confirmed)
        } else {
            Ok(TxStatus::Unconfirmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_unknown_commitment() {
        let config = RpcConfig {
            endpoint: "http://localhost:8899".to_string(),
            timeout_secs: 30,
            commitment: "instant".to_string(),
        };
        assert!(RpcNetworkClient::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_accepts_standard_commitments() {
        for level in ["processed", "confirmed", "finalized"] {
            let config = RpcConfig {
                endpoint: "http://localhost:8899".to_string(),
                timeout_secs: 30,
                commitment: level.to_string(),
            };
            assert!(
                RpcNetworkClient::from_config(&config).is_ok(),
                "commitment '{}' should be accepted",
                level
            );
        }
    }
}
