//! Error taxonomy for the deployment pipeline
//!
//! Every component returns a typed result; only the submitter talks to
//! asynchronous external systems, and it is the sole place external failures
//! are translated into this taxonomy. Nothing here is fatal to the process:
//! every error ends exactly one deployment attempt, leaving the caller free
//! to start a fresh one.

use solana_sdk::signature::Signature;
use thiserror::Error;

use crate::deployer::validate::FieldError;

/// Terminal error of a deployment attempt
#[derive(Error, Debug)]
pub enum DeployError {
    /// Request failed validation; caught before any identity is generated
    /// or network call is made. Recoverable by correcting the input.
    #[error("invalid deployment request: {0}")]
    Validation(#[from] FieldError),

    /// The owner declined to sign. Recoverable by retrying the whole
    /// attempt, which uses a fresh asset identity.
    #[error("owner declined to sign the deployment transaction")]
    SignerDeclined,

    /// The network could not be reached (rent estimation, blockhash fetch,
    /// submission transport, or wallet connectivity). No partial state was
    /// created on-chain.
    #[error("network error: {0}")]
    Network(String),

    /// The network validated and refused the transaction, e.g. insufficient
    /// owner balance or an already-allocated address.
    #[error("transaction rejected by network: {0}")]
    SubmissionRejected(String),

    /// No confirmation arrived within the polling deadline. Ambiguous: the
    /// transaction may still land under this signature. Never auto-resubmitted,
    /// since a resubmission would need a fresh asset identity and would create
    /// a second, differently-addressed asset.
    #[error("confirmation deadline elapsed for transaction {0}")]
    ConfirmationTimedOut(Signature),

    /// Failed to build an instruction for a specific program
    #[error("instruction build error (program={program}): {reason}")]
    InstructionBuild {
        /// The program the instruction targets
        program: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Invalid instruction order or structure detected by the sanity check
    #[error("invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Internal invariant violation; should be rare and indicates a bug
    #[error("internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Check if retrying a whole fresh attempt might succeed without the
    /// caller changing anything
    ///
    /// `ConfirmationTimedOut` is deliberately non-retryable: the original
    /// transaction may still land, so the caller must check the signature
    /// first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SignerDeclined => true,
            Self::Network(_) => true,

            Self::Validation(_) => false,
            Self::SubmissionRejected(_) => false,
            Self::ConfirmationTimedOut(_) => false,
            Self::InstructionBuild { .. } => false,
            Self::InvalidInstructionOrder(_) => false,
            Self::Internal(_) => false,
        }
    }

    /// Error category for metrics and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::SignerDeclined => "signer",
            Self::Network(_) => "network",
            Self::SubmissionRejected(_) => "submission",
            Self::ConfirmationTimedOut(_) => "confirmation",
            Self::InstructionBuild { .. } => "instruction",
            Self::InvalidInstructionOrder(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }
}

// Convenience constructors for common error scenarios
impl DeployError {
    /// Create an instruction build error for a specific program
    pub fn instruction_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid instruction order error
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::SubmissionRejected("insufficient funds".to_string());
        assert_eq!(
            err.to_string(),
            "transaction rejected by network: insufficient funds"
        );

        let err = DeployError::instruction_failed("spl_token", "invalid mint");
        assert_eq!(
            err.to_string(),
            "instruction build error (program=spl_token): invalid mint"
        );
    }

    #[test]
    fn test_error_retryability() {
        assert!(DeployError::SignerDeclined.is_retryable());
        assert!(DeployError::Network("down".to_string()).is_retryable());

        assert!(!DeployError::SubmissionRejected("dup".to_string()).is_retryable());
        assert!(!DeployError::ConfirmationTimedOut(Signature::from([1u8; 64])).is_retryable());
        assert!(!DeployError::internal("bug").is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(DeployError::SignerDeclined.category(), "signer");
        assert_eq!(
            DeployError::Network("down".to_string()).category(),
            "network"
        );
        assert_eq!(
            DeployError::ConfirmationTimedOut(Signature::from([1u8; 64])).category(),
            "confirmation"
        );
    }

    #[test]
    fn test_field_error_converts_to_validation() {
        let err: DeployError = FieldError::NameEmpty.into();
        assert!(matches!(err, DeployError::Validation(_)));
        assert_eq!(err.category(), "validation");
    }
}
