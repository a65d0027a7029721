//! Test Utilities Module
//!
//! Deterministic mocks for the two external seams of the pipeline: the
//! network client and the owner's wallet. All behavior is controlled and
//! counted so tests can assert not just outcomes but which external calls
//! happened (e.g. "no submission after a decline").
//!
//! Only compiled when running tests or when the `test_utils` feature is
//! enabled.

#![cfg(any(test, feature = "test_utils"))]

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::rpc::{NetworkClient, NetworkError, TxStatus};
use crate::types::DeploymentRequest;
use crate::wallet::{RemoteSigner, SignerError};

/// A well-formed request for tests to start from
pub fn valid_request() -> DeploymentRequest {
    DeploymentRequest {
        name: "Meme Coin".to_string(),
        symbol: "MEMC".to_string(),
        decimals: 9,
        supply: 1_000_000_000,
        image: None,
        description: None,
        uri: Some("https://example.com/meme.json".to_string()),
    }
}

/// Mock NetworkClient with per-call counters and scripted behavior
///
/// Defaults to a healthy network that confirms on the first status poll.
/// Failure modes are opt-in per test.
#[derive(Clone)]
pub struct MockNetworkClient {
    rent_lamports: u64,
    mock_signature: Signature,
    rent_failure: Arc<Mutex<Option<String>>>,
    blockhash_failure: Arc<Mutex<Option<String>>>,
    submit_rejection: Arc<Mutex<Option<String>>>,
    /// Statuses returned in order by signature_status; when exhausted,
    /// `default_status` is returned
    statuses: Arc<Mutex<VecDeque<TxStatus>>>,
    default_status: Arc<Mutex<TxStatus>>,
    last_submitted: Arc<Mutex<Option<Transaction>>>,
    rent_calls: Arc<Mutex<usize>>,
    blockhash_calls: Arc<Mutex<usize>>,
    submit_calls: Arc<Mutex<usize>>,
    status_calls: Arc<Mutex<usize>>,
}

impl MockNetworkClient {
    /// Create a healthy mock returning the given rent-exempt minimum
    pub fn new(rent_lamports: u64) -> Self {
        Self {
            rent_lamports,
            mock_signature: Signature::from([1u8; 64]),
            rent_failure: Arc::new(Mutex::new(None)),
            blockhash_failure: Arc::new(Mutex::new(None)),
            submit_rejection: Arc::new(Mutex::new(None)),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            default_status: Arc::new(Mutex::new(TxStatus::Confirmed)),
            last_submitted: Arc::new(Mutex::new(None)),
            rent_calls: Arc::new(Mutex::new(0)),
            blockhash_calls: Arc::new(Mutex::new(0)),
            submit_calls: Arc::new(Mutex::new(0)),
            status_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Signature returned by `submit`
    ///
    /// Note: a deterministic placeholder, not the transaction's first
    /// signature, so tests can tell "signature reported by the network"
    /// apart from locally computed ones.
    pub fn mock_signature(&self) -> Signature {
        self.mock_signature
    }

    /// Make rent estimation fail with a transport error
    pub async fn fail_rent(&self, reason: &str) {
        *self.rent_failure.lock().await = Some(reason.to_string());
    }

    /// Make the blockhash fetch fail with a transport error
    pub async fn fail_blockhash(&self, reason: &str) {
        *self.blockhash_failure.lock().await = Some(reason.to_string());
    }

    /// Make submission fail as a node-side rejection
    pub async fn reject_submission(&self, reason: &str) {
        *self.submit_rejection.lock().await = Some(reason.to_string());
    }

    /// Queue one status to be returned by the next status poll
    pub async fn queue_status(&self, status: TxStatus) {
        self.statuses.lock().await.push_back(status);
    }

    /// Never confirm: every poll reports Unconfirmed
    pub async fn never_confirm(&self) {
        *self.default_status.lock().await = TxStatus::Unconfirmed;
    }

    /// The last transaction handed to `submit`
    pub async fn last_submitted(&self) -> Option<Transaction> {
        self.last_submitted.lock().await.clone()
    }

    pub async fn rent_calls(&self) -> usize {
        *self.rent_calls.lock().await
    }

    pub async fn blockhash_calls(&self) -> usize {
        *self.blockhash_calls.lock().await
    }

    pub async fn submit_calls(&self) -> usize {
        *self.submit_calls.lock().await
    }

    pub async fn status_calls(&self) -> usize {
        *self.status_calls.lock().await
    }
}

#[async_trait]
impl NetworkClient for MockNetworkClient {
    async fn minimum_balance_for_rent_exemption(
        &self,
        _data_len: usize,
    ) -> Result<u64, NetworkError> {
        *self.rent_calls.lock().await += 1;
        if let Some(reason) = self.rent_failure.lock().await.clone() {
            return Err(NetworkError::Transport(reason));
        }
        Ok(self.rent_lamports)
    }

    async fn latest_blockhash(&self) -> Result<Hash, NetworkError> {
        *self.blockhash_calls.lock().await += 1;
        if let Some(reason) = self.blockhash_failure.lock().await.clone() {
            return Err(NetworkError::Transport(reason));
        }
        Ok(Hash::new_unique())
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature, NetworkError> {
        *self.submit_calls.lock().await += 1;
        if let Some(reason) = self.submit_rejection.lock().await.clone() {
            return Err(NetworkError::Rejected(reason));
        }
        *self.last_submitted.lock().await = Some(transaction.clone());
        Ok(self.mock_signature)
    }

    async fn signature_status(&self, _signature: &Signature) -> Result<TxStatus, NetworkError> {
        *self.status_calls.lock().await += 1;
        if let Some(status) = self.statuses.lock().await.pop_front() {
            return Ok(status);
        }
        Ok(self.default_status.lock().await.clone())
    }
}

/// Scripted wallet behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerMode {
    /// Sign every request with a real keypair
    Approve,
    /// Decline every request
    Decline,
    /// Fail every request with a connectivity error
    Unreachable,
}

/// Mock RemoteSigner backed by a real keypair
///
/// Approving mode produces genuine signatures so submitted transactions
/// pass `Transaction::verify` in tests.
#[derive(Clone)]
pub struct MockRemoteSigner {
    keypair: Arc<Keypair>,
    mode: Arc<Mutex<SignerMode>>,
    sign_calls: Arc<Mutex<usize>>,
}

impl MockRemoteSigner {
    pub fn new(mode: SignerMode) -> Self {
        Self {
            keypair: Arc::new(Keypair::new()),
            mode: Arc::new(Mutex::new(mode)),
            sign_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Signer that approves every request
    pub fn approving() -> Self {
        Self::new(SignerMode::Approve)
    }

    /// Signer that declines every request
    pub fn declining() -> Self {
        Self::new(SignerMode::Decline)
    }

    /// Signer whose wallet cannot be reached
    pub fn unreachable() -> Self {
        Self::new(SignerMode::Unreachable)
    }

    /// Change behavior mid-test
    pub async fn set_mode(&self, mode: SignerMode) {
        *self.mode.lock().await = mode;
    }

    pub async fn sign_calls(&self) -> usize {
        *self.sign_calls.lock().await
    }
}

#[async_trait]
impl RemoteSigner for MockRemoteSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        *self.sign_calls.lock().await += 1;
        match *self.mode.lock().await {
            SignerMode::Approve => Ok(self.keypair.sign_message(message)),
            SignerMode::Decline => Err(SignerError::Declined),
            SignerMode::Unreachable => {
                Err(SignerError::Connectivity("wallet unreachable".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_network_counts_calls() {
        let network = MockNetworkClient::new(42);

        assert_eq!(
            network.minimum_balance_for_rent_exemption(82).await.unwrap(),
            42
        );
        assert_eq!(network.rent_calls().await, 1);
        assert_eq!(network.submit_calls().await, 0);
    }

    #[tokio::test]
    async fn test_mock_network_scripted_statuses() {
        let network = MockNetworkClient::new(42);
        network.queue_status(TxStatus::Unconfirmed).await;

        let sig = Signature::from([5u8; 64]);
        assert_eq!(
            network.signature_status(&sig).await.unwrap(),
            TxStatus::Unconfirmed
        );
        // Queue exhausted: default kicks in
        assert_eq!(
            network.signature_status(&sig).await.unwrap(),
            TxStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_mock_signer_modes() {
        let signer = MockRemoteSigner::approving();
        let signature = signer.sign_message(b"payload").await.unwrap();
        assert!(signature.verify(signer.pubkey().as_ref(), b"payload"));

        signer.set_mode(SignerMode::Decline).await;
        assert_eq!(
            signer.sign_message(b"payload").await,
            Err(SignerError::Declined)
        );
        assert_eq!(signer.sign_calls().await, 2);
    }
}
