//! Rent-exemption cost estimation
//!
//! The one read-only network call made before transaction assembly: the
//! minimum balance the new mint account must hold to be exempt from rent
//! collection. A transport failure here ends the attempt before any
//! signature is requested, so the user is never prompted to sign a
//! transaction that cannot be used.

use solana_sdk::program_pack::Pack;

use crate::deployer::errors::DeployError;
use crate::rpc::NetworkClient;

/// Fixed on-chain size of an SPL mint account (82 bytes)
pub const MINT_ACCOUNT_SIZE: usize = spl_token::state::Mint::LEN;

/// Ask the network for the rent-exempt minimum of a mint account
pub async fn minimum_mint_rent<N>(network: &N) -> Result<u64, DeployError>
where
    N: NetworkClient + ?Sized,
{
    network
        .minimum_balance_for_rent_exemption(MINT_ACCOUNT_SIZE)
        .await
        .map_err(|e| DeployError::Network(e.to_string()))
}
