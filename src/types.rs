//! Common types used throughout the deployment pipeline

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// User-supplied deployment intent
///
/// Immutable once handed to the pipeline; one request is consumed by exactly
/// one deployment attempt. Field constraints are enforced by
/// [`crate::deployer::validate`], not by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Token name (non-empty, at most 32 characters)
    pub name: String,

    /// Token symbol (non-empty, at most 8 characters)
    pub symbol: String,

    /// Decimal precision (0-9)
    pub decimals: u8,

    /// Initial supply in whole tokens (must be positive)
    pub supply: u64,

    /// Optional token image bytes (feeds the off-chain metadata document)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,

    /// Optional description (off-chain metadata only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional metadata URI written into the on-chain metadata record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl DeploymentRequest {
    /// URI written into the on-chain metadata record (empty when not set)
    pub fn metadata_uri(&self) -> &str {
        self.uri.as_deref().unwrap_or("")
    }

    /// Build the off-chain metadata JSON document the URI is expected to
    /// point at. Uploading the document is the caller's concern.
    pub fn offchain_metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "symbol": self.symbol,
            "description": self.description.as_deref().unwrap_or(""),
            "image": self
                .image
                .as_ref()
                .map(|bytes| format!("data:image/png;base64,{}", BASE64.encode(bytes))),
            "properties": {
                "category": "token",
            },
        })
    }
}

/// Addresses computed deterministically from the asset and owner public keys
///
/// Pure function of its inputs; never fetched from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddresses {
    /// Associated token account holding the owner's balance of the new asset
    pub holding_account: Pubkey,

    /// Metaplex metadata record derived from the asset address
    pub metadata_account: Pubkey,
}

/// Successful terminal record of a deployment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfirmation {
    /// Address of the newly created mint
    pub mint: Pubkey,

    /// Signature of the confirmed deployment transaction
    pub signature: Signature,
}

/// Terminal record of a deployment attempt, consumed by the UI layer
///
/// Created once per attempt and never mutated. `ConfirmationTimedOut` keeps
/// the transaction signature because the transaction may still land later;
/// the caller can check it instead of assuming failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentOutcome {
    /// Transaction reached the configured commitment level
    Confirmed {
        /// Address of the newly created mint
        mint: Pubkey,
        /// Signature of the confirmed transaction
        signature: Signature,
    },

    /// Attempt was rejected before submission (invalid input or the owner
    /// declined to sign); nothing was sent to the network
    Rejected {
        /// Human-readable rejection reason
        reason: String,
    },

    /// Network was unreachable or validated and refused the transaction
    SubmissionFailed {
        /// Human-readable failure reason
        reason: String,
    },

    /// No confirmation arrived within the polling deadline. The transaction
    /// is NOT resubmitted; it may still land under this signature.
    ConfirmationTimedOut {
        /// Signature to check later
        signature: Signature,
    },
}

impl DeploymentOutcome {
    /// Address of the created mint, when the attempt confirmed
    pub fn mint(&self) -> Option<Pubkey> {
        match self {
            Self::Confirmed { mint, .. } => Some(*mint),
            _ => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DeploymentRequest {
        DeploymentRequest {
            name: "Meme Coin".to_string(),
            symbol: "MEMC".to_string(),
            decimals: 9,
            supply: 1_000_000_000,
            image: Some(vec![1, 2, 3]),
            description: Some("a meme coin".to_string()),
            uri: None,
        }
    }

    #[test]
    fn test_metadata_uri_defaults_empty() {
        assert_eq!(request().metadata_uri(), "");

        let mut req = request();
        req.uri = Some("https://example.com/meta.json".to_string());
        assert_eq!(req.metadata_uri(), "https://example.com/meta.json");
    }

    #[test]
    fn test_offchain_metadata_shape() {
        let doc = request().offchain_metadata();
        assert_eq!(doc["name"], "Meme Coin");
        assert_eq!(doc["symbol"], "MEMC");
        assert_eq!(doc["description"], "a meme coin");
        assert!(doc["image"]
            .as_str()
            .expect("image should be a data URI")
            .starts_with("data:image/png;base64,"));
        assert_eq!(doc["properties"]["category"], "token");
    }

    #[test]
    fn test_outcome_mint_accessor() {
        let mint = Pubkey::new_unique();
        let confirmed = DeploymentOutcome::Confirmed {
            mint,
            signature: Signature::from([7u8; 64]),
        };
        assert_eq!(confirmed.mint(), Some(mint));
        assert!(confirmed.is_confirmed());

        let rejected = DeploymentOutcome::Rejected {
            reason: "declined".to_string(),
        };
        assert_eq!(rejected.mint(), None);
        assert!(!rejected.is_confirmed());
    }
}
