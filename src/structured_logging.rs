//! Structured logging for deployment attempts

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::observability::AttemptId;

/// Structured logger scoped to one deployment attempt
#[derive(Debug, Clone)]
pub struct DeployLogger {
    attempt_id: AttemptId,
}

impl DeployLogger {
    pub fn new() -> Self {
        Self {
            attempt_id: AttemptId::new(),
        }
    }

    pub fn attempt_id(&self) -> &AttemptId {
        &self.attempt_id
    }

    pub fn log_validation_failed(&self, field_error: &str) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            error = %field_error,
            "Deployment request rejected by validator"
        );
    }

    pub fn log_attempt_started(&self, mint: &Pubkey, rent_lamports: u64) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            mint = %mint,
            rent_lamports = %rent_lamports,
            "Deployment attempt started"
        );
    }

    pub fn log_plan_built(&self, mint: &Pubkey, instruction_count: usize) {
        tracing::debug!(
            attempt_id = %self.attempt_id,
            mint = %mint,
            instruction_count = %instruction_count,
            "Instruction plan built"
        );
    }

    pub fn log_signature_requested(&self, owner: &Pubkey) {
        tracing::debug!(
            attempt_id = %self.attempt_id,
            owner = %owner,
            "Owner signature requested"
        );
    }

    pub fn log_submitted(&self, signature: &Signature) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            signature = %signature,
            "Transaction submitted"
        );
    }

    pub fn log_confirmed(&self, signature: &Signature, latency_ms: u64) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            signature = %signature,
            latency_ms = %latency_ms,
            "Deployment confirmed"
        );
    }

    pub fn log_timed_out(&self, signature: &Signature, waited_ms: u64) {
        tracing::warn!(
            attempt_id = %self.attempt_id,
            signature = %signature,
            waited_ms = %waited_ms,
            "Confirmation deadline elapsed; transaction may still land"
        );
    }

    pub fn log_failed(&self, stage: &str, error: &str) {
        tracing::warn!(
            attempt_id = %self.attempt_id,
            stage = %stage,
            error = %error,
            "Deployment attempt failed"
        );
    }
}

impl Default for DeployLogger {
    fn default() -> Self {
        Self::new()
    }
}
