//! Signing identities for the deployment pipeline
//!
//! Two capability types with deliberately different shapes:
//!
//! - [`AssetIdentity`] is a local, ephemeral signer. The pipeline holds its
//!   secret for exactly one attempt and consumes it at the signing step; it
//!   never fails to sign.
//! - [`RemoteSigner`] is a handle to the owner's wallet. The pipeline never
//!   holds its secret; a signature request may suspend on user approval, be
//!   declined, or fail on connectivity.

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::sync::Arc;
use thiserror::Error;

/// Failure modes of a remote signature request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The owner explicitly declined to sign
    #[error("owner declined to sign")]
    Declined,

    /// The wallet could not be reached
    #[error("wallet connectivity error: {0}")]
    Connectivity(String),
}

/// Signing capability bound to the owner's wallet
///
/// `sign_message` signs the exact byte payload it is given. There is no
/// caller-imposed timeout: the owner may take arbitrarily long to approve,
/// and a decline must be distinguishable from a connectivity failure.
#[async_trait]
pub trait RemoteSigner: Send + Sync {
    /// Public key the signature will verify against
    fn pubkey(&self) -> Pubkey;

    /// Request a signature over the exact byte payload
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

/// Ephemeral keypair that becomes the address of the new asset record
///
/// Generated at pipeline start, used to co-sign the deployment transaction
/// once, then discarded. [`AssetIdentity::into_signature`] consumes the value
/// so the secret cannot be referenced after signing.
pub struct AssetIdentity {
    keypair: Keypair,
}

impl AssetIdentity {
    /// Generate a fresh identity for one deployment attempt
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    /// The public half: the future mint address
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign the transaction payload, consuming the identity
    ///
    /// Local signing over owned key material cannot fail.
    pub fn into_signature(self, message: &[u8]) -> Signature {
        self.keypair.sign_message(message)
    }
}

impl std::fmt::Debug for AssetIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the secret half
        f.debug_struct("AssetIdentity")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

/// Keypair-backed signer for server-side callers without a browser wallet
pub struct KeypairSigner {
    keypair: Arc<Keypair>,
}

impl KeypairSigner {
    /// Create a signer from a keypair file (64-byte raw or JSON array format)
    pub fn from_file(path: &str) -> Result<Self> {
        let keypair_bytes =
            std::fs::read(path).with_context(|| format!("Failed to read keypair file: {}", path))?;

        let keypair = if keypair_bytes.len() == 64 {
            // Raw bytes format - validate before conversion
            if keypair_bytes.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(keypair_bytes.as_slice()).context("Invalid keypair bytes")?
        } else {
            // JSON format
            let json: Vec<u8> =
                serde_json::from_slice(&keypair_bytes).context("Failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!(
                    "Invalid keypair length: expected 64 bytes, got {}",
                    json.len()
                );
            }
            if json.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(json.as_slice()).context("Invalid keypair from JSON")?
        };

        Ok(Self {
            keypair: Arc::new(keypair),
        })
    }

    /// Create a signer from an in-memory keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }
}

impl Clone for KeypairSigner {
    fn clone(&self) -> Self {
        Self {
            keypair: Arc::clone(&self.keypair),
        }
    }
}

#[async_trait]
impl RemoteSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(self.keypair.sign_message(message))
    }
}
