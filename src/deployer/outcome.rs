//! Terminal-state reporting
//!
//! Pure 1:1 mapping from the pipeline's typed result to the
//! [`DeploymentOutcome`] consumed by the UI layer. No retry logic lives
//! here.

use crate::deployer::errors::DeployError;
use crate::types::{DeployConfirmation, DeploymentOutcome};

/// Map a finished attempt to its outcome record
///
/// `ConfirmationTimedOut` stays distinct from `SubmissionFailed` so the
/// caller can check the specific signature later instead of assuming
/// failure.
pub fn report(result: Result<DeployConfirmation, DeployError>) -> DeploymentOutcome {
    match result {
        Ok(confirmation) => DeploymentOutcome::Confirmed {
            mint: confirmation.mint,
            signature: confirmation.signature,
        },
        Err(error) => match error {
            DeployError::Validation(_) | DeployError::SignerDeclined => {
                DeploymentOutcome::Rejected {
                    reason: error.to_string(),
                }
            }
            DeployError::ConfirmationTimedOut(signature) => {
                DeploymentOutcome::ConfirmationTimedOut { signature }
            }
            DeployError::Network(_)
            | DeployError::SubmissionRejected(_)
            | DeployError::InstructionBuild { .. }
            | DeployError::InvalidInstructionOrder(_)
            | DeployError::Internal(_) => DeploymentOutcome::SubmissionFailed {
                reason: error.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployer::validate::FieldError;
    use solana_sdk::{pubkey::Pubkey, signature::Signature};

    #[test]
    fn test_success_maps_to_confirmed() {
        let mint = Pubkey::new_unique();
        let signature = Signature::from([9u8; 64]);
        let outcome = report(Ok(DeployConfirmation { mint, signature }));
        assert_eq!(outcome, DeploymentOutcome::Confirmed { mint, signature });
    }

    #[test]
    fn test_validation_and_decline_map_to_rejected() {
        let outcome = report(Err(FieldError::NameEmpty.into()));
        assert!(matches!(outcome, DeploymentOutcome::Rejected { .. }));

        let outcome = report(Err(DeployError::SignerDeclined));
        assert!(matches!(outcome, DeploymentOutcome::Rejected { .. }));
    }

    #[test]
    fn test_network_and_rejection_map_to_submission_failed() {
        let outcome = report(Err(DeployError::Network("unreachable".to_string())));
        assert!(matches!(outcome, DeploymentOutcome::SubmissionFailed { .. }));

        let outcome = report(Err(DeployError::SubmissionRejected(
            "insufficient funds".to_string(),
        )));
        assert!(matches!(outcome, DeploymentOutcome::SubmissionFailed { .. }));
    }

    #[test]
    fn test_timeout_keeps_signature() {
        let signature = Signature::from([3u8; 64]);
        let outcome = report(Err(DeployError::ConfirmationTimedOut(signature)));
        assert_eq!(outcome, DeploymentOutcome::ConfirmationTimedOut { signature });
    }
}
