//! Instruction sequencing for the deployment transaction
//!
//! The five-step order is a correctness invariant, not a style choice: each
//! step writes state the next step reads.
//!
//! 1. create the mint account at the asset address (payer: owner, co-signed
//!    by the asset identity)
//! 2. initialize it as a mint with the requested decimals
//! 3. create the owner's associated token account
//! 4. mint the initial supply into it
//! 5. write the metadata record
//!
//! Construction goes through a typestate builder so an out-of-order plan is
//! a compile error rather than a runtime bug, and a debug-only
//! [`sanity_check_ix_order`] re-validates a built plan, checking that each
//! instruction only references addresses produced by earlier steps.

use mpl_token_metadata::instructions::CreateMetadataAccountV3Builder;
use mpl_token_metadata::types::DataV2;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use std::marker::PhantomData;

use crate::deployer::errors::DeployError;
use crate::deployer::rent::MINT_ACCOUNT_SIZE;
use crate::deployer::validate::base_unit_amount;
use crate::types::{DeploymentRequest, DerivedAddresses};

/// Number of instructions in every deployment plan
pub const DEPLOY_INSTRUCTION_COUNT: usize = 5;

/// Ordered, immutable set of the five deployment instructions
#[derive(Debug, Clone)]
pub struct InstructionPlan {
    /// The ordered instruction list; always exactly five entries
    pub instructions: Vec<Instruction>,
}

impl InstructionPlan {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Typestate stages of [`PlanBuilder`]; each is produced by exactly one step
pub mod stage {
    /// After step 1 (allocate mint account)
    pub struct Allocated;
    /// After step 2 (initialize mint)
    pub struct Initialized;
    /// After step 3 (create holding account)
    pub struct HoldingCreated;
    /// After step 4 (mint initial supply)
    pub struct Minted;
}

/// Builder whose type parameter tracks how far the fixed sequence has
/// progressed; steps can only be appended in order
pub struct PlanBuilder<S> {
    instructions: Vec<Instruction>,
    _stage: PhantomData<S>,
}

impl<S> PlanBuilder<S> {
    fn advance<T>(mut self, instruction: Instruction) -> PlanBuilder<T> {
        self.instructions.push(instruction);
        PlanBuilder {
            instructions: self.instructions,
            _stage: PhantomData,
        }
    }
}

impl PlanBuilder<stage::Allocated> {
    /// Step 1: allocate the mint account at the asset address, funded with
    /// the rent-exempt balance and owned by the SPL token program
    ///
    /// Requires both the asset signature (creating its own address) and the
    /// owner signature (paying the lamports).
    pub fn allocate(owner: &Pubkey, asset: &Pubkey, rent_lamports: u64) -> Self {
        // TODO(migrate-system-instruction): temporary allow, move to
        // solana-system-interface together with the sdk 3.x bump
        #[allow(deprecated)]
        let instruction = solana_sdk::system_instruction::create_account(
            owner,
            asset,
            rent_lamports,
            MINT_ACCOUNT_SIZE as u64,
            &spl_token::id(),
        );

        let mut instructions = Vec::with_capacity(DEPLOY_INSTRUCTION_COUNT);
        instructions.push(instruction);
        Self {
            instructions,
            _stage: PhantomData,
        }
    }

    /// Step 2: initialize the account as a mint, naming the owner as both
    /// mint and freeze authority. Declares authority; exercises none.
    pub fn initialize_asset(
        self,
        asset: &Pubkey,
        owner: &Pubkey,
        decimals: u8,
    ) -> Result<PlanBuilder<stage::Initialized>, DeployError> {
        let instruction =
            spl_token::instruction::initialize_mint(&spl_token::id(), asset, owner, Some(owner), decimals)
                .map_err(|e| DeployError::instruction_failed("spl_token", e.to_string()))?;
        Ok(self.advance(instruction))
    }
}

impl PlanBuilder<stage::Initialized> {
    /// Step 3: create the owner's associated token account for the new mint
    pub fn create_holding(self, owner: &Pubkey, asset: &Pubkey) -> PlanBuilder<stage::HoldingCreated> {
        let instruction = spl_associated_token_account::instruction::create_associated_token_account(
            owner,
            owner,
            asset,
            &spl_token::id(),
        );
        self.advance(instruction)
    }
}

impl PlanBuilder<stage::HoldingCreated> {
    /// Step 4: mint the initial supply (base units) into the holding
    /// account, exercising the owner's mint authority
    pub fn mint_supply(
        self,
        asset: &Pubkey,
        holding_account: &Pubkey,
        owner: &Pubkey,
        amount: u64,
    ) -> Result<PlanBuilder<stage::Minted>, DeployError> {
        let instruction = spl_token::instruction::mint_to(
            &spl_token::id(),
            asset,
            holding_account,
            owner,
            &[],
            amount,
        )
        .map_err(|e| DeployError::instruction_failed("spl_token", e.to_string()))?;
        Ok(self.advance(instruction))
    }
}

impl PlanBuilder<stage::Minted> {
    /// Step 5: write the mutable metadata record, with the owner as payer
    /// and update authority
    pub fn write_metadata(
        self,
        metadata_account: &Pubkey,
        asset: &Pubkey,
        owner: &Pubkey,
        name: &str,
        symbol: &str,
        uri: &str,
    ) -> InstructionPlan {
        let instruction = CreateMetadataAccountV3Builder::new()
            .metadata(*metadata_account)
            .mint(*asset)
            .mint_authority(*owner)
            .payer(*owner)
            .update_authority(*owner, true)
            .data(DataV2 {
                name: name.to_string(),
                symbol: symbol.to_string(),
                uri: uri.to_string(),
                seller_fee_basis_points: 0,
                creators: None,
                collection: None,
                uses: None,
            })
            .is_mutable(true)
            .instruction();

        let mut instructions = self.instructions;
        instructions.push(instruction);
        InstructionPlan { instructions }
    }
}

/// Build the complete five-instruction deployment plan
///
/// Pure assembly from the validated request and already-derived addresses;
/// performs no I/O. The request must have passed
/// [`crate::deployer::validate::validate`].
pub fn plan_deploy_instructions(
    request: &DeploymentRequest,
    asset: &Pubkey,
    owner: &Pubkey,
    derived: &DerivedAddresses,
    rent_lamports: u64,
) -> Result<InstructionPlan, DeployError> {
    let amount = base_unit_amount(request.supply, request.decimals)
        .ok_or_else(|| DeployError::internal("base-unit amount overflow past validation"))?;

    let plan = PlanBuilder::allocate(owner, asset, rent_lamports)
        .initialize_asset(asset, owner, request.decimals)?
        .create_holding(owner, asset)
        .mint_supply(asset, &derived.holding_account, owner, amount)?
        .write_metadata(
            &derived.metadata_account,
            asset,
            owner,
            &request.name,
            &request.symbol,
            request.metadata_uri(),
        );

    Ok(plan)
}

// Instruction discriminators on the external wire formats
const SYSTEM_CREATE_ACCOUNT: [u8; 4] = [0, 0, 0, 0]; // u32 LE variant index
const TOKEN_INITIALIZE_MINT: u8 = 0;
const TOKEN_MINT_TO: u8 = 7;

/// Validate a built plan against the fixed order (debug/test only)
///
/// Checks slot by slot that every instruction targets the expected program
/// and only references addresses produced by earlier steps, and that the
/// asset identity signs step 1 and nothing else. Compiled out in release
/// builds.
#[cfg(debug_assertions)]
pub fn sanity_check_ix_order(
    plan: &InstructionPlan,
    asset: &Pubkey,
    owner: &Pubkey,
    derived: &DerivedAddresses,
) -> Result<(), DeployError> {
    let ix = &plan.instructions;
    if ix.len() != DEPLOY_INSTRUCTION_COUNT {
        return Err(DeployError::invalid_order(format!(
            "expected {} instructions, got {}",
            DEPLOY_INSTRUCTION_COUNT,
            ix.len()
        )));
    }

    // 1. allocate: system create_account, owner pays, asset co-signs
    let allocate = &ix[0];
    if allocate.program_id != solana_sdk::system_program::id()
        || allocate.data.len() < 4
        || allocate.data[0..4] != SYSTEM_CREATE_ACCOUNT
    {
        return Err(DeployError::invalid_order(
            "step 1 must be a system create_account instruction",
        ));
    }
    if allocate.accounts[0].pubkey != *owner || !allocate.accounts[0].is_signer {
        return Err(DeployError::invalid_order("step 1 payer must be the signing owner"));
    }
    if allocate.accounts[1].pubkey != *asset || !allocate.accounts[1].is_signer {
        return Err(DeployError::invalid_order(
            "step 1 new account must be the signing asset identity",
        ));
    }

    // 2. initialize: token program, targets the account allocated in step 1
    let initialize = &ix[1];
    if initialize.program_id != spl_token::id()
        || initialize.data.first() != Some(&TOKEN_INITIALIZE_MINT)
    {
        return Err(DeployError::invalid_order(
            "step 2 must be an spl-token initialize_mint instruction",
        ));
    }
    if initialize.accounts[0].pubkey != allocate.accounts[1].pubkey {
        return Err(DeployError::invalid_order(
            "step 2 must initialize the account allocated in step 1",
        ));
    }

    // 3. create holding: ATA program, for (owner, asset), at the derived address
    let holding = &ix[2];
    if holding.program_id != spl_associated_token_account::id() {
        return Err(DeployError::invalid_order(
            "step 3 must be an associated-token-account creation",
        ));
    }
    if holding.accounts[1].pubkey != derived.holding_account {
        return Err(DeployError::invalid_order(
            "step 3 must create the derived holding account",
        ));
    }
    if holding.accounts[3].pubkey != *asset {
        return Err(DeployError::invalid_order(
            "step 3 must reference the mint initialized in step 2",
        ));
    }

    // 4. mint: token program, into the holding account created in step 3
    let mint = &ix[3];
    if mint.program_id != spl_token::id() || mint.data.first() != Some(&TOKEN_MINT_TO) {
        return Err(DeployError::invalid_order(
            "step 4 must be an spl-token mint_to instruction",
        ));
    }
    if mint.accounts[0].pubkey != *asset {
        return Err(DeployError::invalid_order(
            "step 4 must mint from the asset created in steps 1-2",
        ));
    }
    if mint.accounts[1].pubkey != holding.accounts[1].pubkey {
        return Err(DeployError::invalid_order(
            "step 4 must mint into the holding account created in step 3",
        ));
    }
    if mint.accounts[2].pubkey != *owner || !mint.accounts[2].is_signer {
        return Err(DeployError::invalid_order(
            "step 4 must exercise the owner's mint authority",
        ));
    }

    // 5. metadata: metadata program, at the derived record for this mint
    let metadata = &ix[4];
    if metadata.program_id != mpl_token_metadata::ID {
        return Err(DeployError::invalid_order(
            "step 5 must be a token-metadata instruction",
        ));
    }
    if metadata.accounts[0].pubkey != derived.metadata_account {
        return Err(DeployError::invalid_order(
            "step 5 must write the derived metadata record",
        ));
    }
    if metadata.accounts[1].pubkey != *asset {
        return Err(DeployError::invalid_order(
            "step 5 must describe the mint created in steps 1-2",
        ));
    }

    // The asset identity signs step 1 and nothing else
    for (idx, instruction) in ix.iter().enumerate().skip(1) {
        if instruction
            .accounts
            .iter()
            .any(|meta| meta.pubkey == *asset && meta.is_signer)
        {
            return Err(DeployError::invalid_order(format!(
                "asset identity must only sign step 1, found signer at step {}",
                idx + 1
            )));
        }
    }

    Ok(())
}

/// No-op version of sanity_check_ix_order for release builds
#[cfg(not(debug_assertions))]
#[inline]
pub fn sanity_check_ix_order(
    _plan: &InstructionPlan,
    _asset: &Pubkey,
    _owner: &Pubkey,
    _derived: &DerivedAddresses,
) -> Result<(), DeployError> {
    Ok(())
}
