//! Transaction assembly, dual signing, submission, and confirmation polling
//!
//! The five instructions are packaged into one legacy transaction; the
//! network enforces its atomicity, this module only relies on it. Exactly
//! two signatures are required: the ephemeral asset identity (applied
//! locally, consuming the identity) and the owner (requested from the remote
//! wallet, which may suspend on user approval or decline).
//!
//! State machine: `Built -> Signed -> Submitted -> {Confirmed | Failed |
//! TimedOut}`. On deadline expiry the attempt ends with
//! `ConfirmationTimedOut` and the transaction is never resubmitted, since a
//! resubmission would need a fresh asset identity and would create a second,
//! differently-addressed asset.

use solana_sdk::{message::Message, signature::Signature, transaction::Transaction};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::ConfirmConfig;
use crate::deployer::errors::DeployError;
use crate::deployer::instructions::InstructionPlan;
use crate::rpc::{NetworkClient, TxStatus};
use crate::structured_logging::DeployLogger;
use crate::wallet::{AssetIdentity, RemoteSigner, SignerError};

/// Confirmation-wait policy, fixed per deployer instance
#[derive(Debug, Clone, Copy)]
pub struct ConfirmPolicy {
    /// Give up waiting after this long
    pub deadline: Duration,

    /// Pause between status polls
    pub poll_interval: Duration,
}

impl From<&ConfirmConfig> for ConfirmPolicy {
    fn from(config: &ConfirmConfig) -> Self {
        Self {
            deadline: Duration::from_secs(config.deadline_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// Sign the plan with both identities, submit it, and wait for confirmation
///
/// Consumes the [`AssetIdentity`]; its secret does not outlive this call.
/// The blockhash is fetched before the owner is prompted, so a dead network
/// never costs the user a signature.
pub async fn sign_and_submit<N, S>(
    network: &N,
    signer: &S,
    asset: AssetIdentity,
    plan: InstructionPlan,
    policy: &ConfirmPolicy,
    log: &DeployLogger,
) -> Result<Signature, DeployError>
where
    N: NetworkClient + ?Sized,
    S: RemoteSigner + ?Sized,
{
    let owner = signer.pubkey();
    let asset_pubkey = asset.pubkey();

    // Built
    let blockhash = network
        .latest_blockhash()
        .await
        .map_err(|e| DeployError::Network(e.to_string()))?;
    let message = Message::new_with_blockhash(&plan.instructions, Some(&owner), &blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    let payload = transaction.message_data();

    // Built -> Signed: local signature first (cannot fail), then the remote
    // wallet, which may suspend indefinitely on user approval
    let asset_signature = asset.into_signature(&payload);

    log.log_signature_requested(&owner);
    let owner_signature = signer.sign_message(&payload).await.map_err(|e| match e {
        SignerError::Declined => DeployError::SignerDeclined,
        SignerError::Connectivity(reason) => DeployError::Network(reason),
    })?;

    place_signatures(
        &mut transaction,
        (&asset_pubkey, asset_signature),
        (&owner, owner_signature),
    )?;

    // Signed -> Submitted
    let signature = network.submit(&transaction).await.map_err(|e| match e {
        crate::rpc::NetworkError::Transport(reason) => DeployError::Network(reason),
        crate::rpc::NetworkError::Rejected(reason) => DeployError::SubmissionRejected(reason),
    })?;
    log.log_submitted(&signature);

    // Submitted -> {Confirmed | Failed | TimedOut}
    await_confirmation(network, signature, policy, log).await
}

/// Place both signatures at their account positions in the signed region
fn place_signatures(
    transaction: &mut Transaction,
    (asset_pubkey, asset_signature): (&solana_sdk::pubkey::Pubkey, Signature),
    (owner_pubkey, owner_signature): (&solana_sdk::pubkey::Pubkey, Signature),
) -> Result<(), DeployError> {
    let num_signers = transaction.message.header.num_required_signatures as usize;
    if num_signers != 2 {
        return Err(DeployError::internal(format!(
            "deployment transaction requires exactly 2 signers, message wants {}",
            num_signers
        )));
    }

    for (index, key) in transaction
        .message
        .account_keys
        .iter()
        .take(num_signers)
        .enumerate()
    {
        if key == owner_pubkey {
            transaction.signatures[index] = owner_signature;
        } else if key == asset_pubkey {
            transaction.signatures[index] = asset_signature;
        } else {
            return Err(DeployError::internal(format!(
                "unexpected required signer {} in deployment transaction",
                key
            )));
        }
    }

    Ok(())
}

/// Poll signature status until the configured commitment or the deadline
///
/// Transient poll failures are logged and retried until the deadline; the
/// deadline bounds the whole wait.
async fn await_confirmation<N>(
    network: &N,
    signature: Signature,
    policy: &ConfirmPolicy,
    log: &DeployLogger,
) -> Result<Signature, DeployError>
where
    N: NetworkClient + ?Sized,
{
    let started = Instant::now();

    loop {
        match network.signature_status(&signature).await {
            Ok(TxStatus::Confirmed) => return Ok(signature),
            Ok(TxStatus::Failed(reason)) => {
                return Err(DeployError::SubmissionRejected(reason));
            }
            Ok(TxStatus::Unconfirmed) => {}
            Err(e) => {
                tracing::warn!(
                    attempt_id = %log.attempt_id(),
                    signature = %signature,
                    error = %e,
                    "Status poll failed; retrying until deadline"
                );
            }
        }

        let waited = started.elapsed();
        if waited >= policy.deadline {
            log.log_timed_out(&signature, waited.as_millis() as u64);
            return Err(DeployError::ConfirmationTimedOut(signature));
        }
        tokio::time::sleep(policy.poll_interval).await;
    }
}
