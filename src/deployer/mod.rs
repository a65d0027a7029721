//! Token deployment pipeline supercomponent
//!
//! Turns a validated [`crate::types::DeploymentRequest`] into one atomically
//! submitted transaction that creates, funds, and describes a new SPL token.
//!
//! ## Architecture
//!
//! The supercomponent is split into focused modules, data flowing strictly
//! top-down; nothing above `submit` performs network I/O:
//! - **validate**: pure parameter checking, runs before any identity or
//!   network work
//! - **derive**: deterministic holding-account and metadata addresses
//! - **rent**: the single pre-submission rent-exemption query
//! - **instructions**: the fixed five-step plan with typestate-enforced
//!   ordering
//! - **submit**: dual signing, one-shot submission, confirmation polling
//! - **outcome**: 1:1 mapping of terminal states to [`crate::types::DeploymentOutcome`]
//! - **pipeline**: the orchestrator, [`TokenDeployer`]
//! - **errors**: the [`DeployError`] taxonomy
//!
//! ## Key invariants
//!
//! - An invalid request never generates an asset identity or touches the
//!   network.
//! - The ephemeral asset identity signs exactly once and is consumed doing
//!   so.
//! - A confirmation timeout never triggers a resubmission; the transaction
//!   may still land under the reported signature.

pub mod errors;
pub use errors::DeployError;

pub mod derive;
pub mod instructions;
pub mod outcome;
pub mod rent;
pub mod submit;
pub mod validate;

mod pipeline;

// Re-export key types for convenience
pub use derive::derive_addresses;
pub use instructions::{
    plan_deploy_instructions, sanity_check_ix_order, InstructionPlan, PlanBuilder,
    DEPLOY_INSTRUCTION_COUNT,
};
pub use outcome::report;
pub use pipeline::TokenDeployer;
pub use submit::ConfirmPolicy;
pub use validate::{validate, FieldError, MAX_DECIMALS, MAX_NAME_LEN, MAX_SYMBOL_LEN};
