//! Parameter validation for deployment requests
//!
//! Validation is a pure function and runs before any keypair is generated or
//! network call is made, so an invalid request never wastes an ephemeral
//! identity or prompts the user for a signature.

use thiserror::Error;

use crate::types::DeploymentRequest;

/// Maximum token name length in characters
pub const MAX_NAME_LEN: usize = 32;

/// Maximum token symbol length in characters
pub const MAX_SYMBOL_LEN: usize = 8;

/// Maximum decimal precision
pub const MAX_DECIMALS: u8 = 9;

/// First violated constraint of a deployment request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("token name must not be empty")]
    NameEmpty,

    #[error("token name exceeds {MAX_NAME_LEN} characters (got {len})")]
    NameTooLong { len: usize },

    #[error("token symbol must not be empty")]
    SymbolEmpty,

    #[error("token symbol exceeds {MAX_SYMBOL_LEN} characters (got {len})")]
    SymbolTooLong { len: usize },

    #[error("initial supply must be greater than zero")]
    SupplyZero,

    #[error("decimals must be at most {MAX_DECIMALS} (got {decimals})")]
    DecimalsTooHigh { decimals: u8 },

    #[error("supply {supply} with {decimals} decimals overflows the 64-bit base-unit amount")]
    SupplyOverflow { supply: u64, decimals: u8 },
}

/// Check a deployment request for well-formedness
///
/// Constraints are checked in a fixed order and the first violation is
/// returned: name non-empty, name length, symbol non-empty, symbol length,
/// supply positive, decimals range, base-unit overflow.
pub fn validate(request: &DeploymentRequest) -> Result<(), FieldError> {
    let name_len = request.name.chars().count();
    if name_len == 0 {
        return Err(FieldError::NameEmpty);
    }
    if name_len > MAX_NAME_LEN {
        return Err(FieldError::NameTooLong { len: name_len });
    }

    let symbol_len = request.symbol.chars().count();
    if symbol_len == 0 {
        return Err(FieldError::SymbolEmpty);
    }
    if symbol_len > MAX_SYMBOL_LEN {
        return Err(FieldError::SymbolTooLong { len: symbol_len });
    }

    if request.supply == 0 {
        return Err(FieldError::SupplyZero);
    }

    if request.decimals > MAX_DECIMALS {
        return Err(FieldError::DecimalsTooHigh {
            decimals: request.decimals,
        });
    }

    if base_unit_amount(request.supply, request.decimals).is_none() {
        return Err(FieldError::SupplyOverflow {
            supply: request.supply,
            decimals: request.decimals,
        });
    }

    Ok(())
}

/// Convert a whole-token supply into base units (`supply * 10^decimals`)
///
/// Returns `None` on 64-bit overflow. Callers past validation may rely on
/// `Some` for validated requests.
pub fn base_unit_amount(supply: u64, decimals: u8) -> Option<u64> {
    supply.checked_mul(10u64.checked_pow(decimals as u32)?)
}
