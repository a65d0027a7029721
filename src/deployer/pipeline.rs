//! Deployment pipeline orchestrator
//!
//! Ties the components together in their fixed order: validate, then rent
//! estimation concurrently with asset-identity generation (neither depends
//! on the other), then derivation, sequencing, dual signing, submission, and
//! confirmation. Attempts are independent: each gets a fresh asset identity,
//! and concurrent attempts share only the read-only network client.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tokio::time::Instant;

use crate::config::Config;
use crate::deployer::derive::derive_addresses;
use crate::deployer::errors::DeployError;
use crate::deployer::instructions::{plan_deploy_instructions, sanity_check_ix_order};
use crate::deployer::outcome::report;
use crate::deployer::submit::{sign_and_submit, ConfirmPolicy};
use crate::deployer::validate::validate;
use crate::deployer::rent;
use crate::rpc::NetworkClient;
use crate::structured_logging::DeployLogger;
use crate::types::{DeployConfirmation, DeploymentOutcome, DeploymentRequest};
use crate::wallet::{AssetIdentity, RemoteSigner};

/// Token deployment pipeline bound to one network client and one owner
/// wallet
///
/// Cheap to clone; safe to run multiple attempts concurrently.
pub struct TokenDeployer<N, S> {
    network: Arc<N>,
    signer: Arc<S>,
    policy: ConfirmPolicy,
}

impl<N, S> Clone for TokenDeployer<N, S> {
    fn clone(&self) -> Self {
        Self {
            network: Arc::clone(&self.network),
            signer: Arc::clone(&self.signer),
            policy: self.policy,
        }
    }
}

impl<N, S> TokenDeployer<N, S>
where
    N: NetworkClient,
    S: RemoteSigner,
{
    pub fn new(network: Arc<N>, signer: Arc<S>, config: &Config) -> Self {
        Self {
            network,
            signer,
            policy: ConfirmPolicy::from(&config.confirm),
        }
    }

    /// Public key of the owner wallet this deployer signs as
    pub fn owner(&self) -> Pubkey {
        self.signer.pubkey()
    }

    /// Run one deployment attempt, reporting a terminal outcome
    ///
    /// Never panics and never retries; every failure ends in exactly one
    /// outcome and the caller is free to start a fresh attempt.
    pub async fn deploy(&self, request: DeploymentRequest) -> DeploymentOutcome {
        report(self.try_deploy(request).await)
    }

    /// Run one deployment attempt with the full typed error taxonomy
    pub async fn try_deploy(
        &self,
        request: DeploymentRequest,
    ) -> Result<DeployConfirmation, DeployError> {
        let log = DeployLogger::new();
        let started = Instant::now();

        // Fail fast: no identity is generated and no network call is made
        // for an invalid request
        validate(&request).map_err(|e| {
            log.log_validation_failed(&e.to_string());
            DeployError::from(e)
        })?;

        let owner = self.signer.pubkey();

        // Rent estimation and identity generation are independent
        let (rent_result, asset) = tokio::join!(
            rent::minimum_mint_rent(self.network.as_ref()),
            async { AssetIdentity::generate() }
        );
        let rent_lamports = rent_result.inspect_err(|e| {
            log.log_failed("rent", &e.to_string());
        })?;

        let mint = asset.pubkey();
        log.log_attempt_started(&mint, rent_lamports);

        let derived = derive_addresses(&mint, &owner);
        let plan = plan_deploy_instructions(&request, &mint, &owner, &derived, rent_lamports)?;
        sanity_check_ix_order(&plan, &mint, &owner, &derived)?;
        log.log_plan_built(&mint, plan.len());

        let signature = sign_and_submit(
            self.network.as_ref(),
            self.signer.as_ref(),
            asset,
            plan,
            &self.policy,
            &log,
        )
        .await
        .inspect_err(|e| {
            log.log_failed(e.category(), &e.to_string());
        })?;

        log.log_confirmed(&signature, started.elapsed().as_millis() as u64);
        Ok(DeployConfirmation { mint, signature })
    }
}
