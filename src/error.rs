//! Transaction errors
//!
//! Every variant rejects exactly one request. State is never partially
//! mutated when one of these is returned.

use crate::types::{AccountId, Nonce, RaffleId, Weight};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaffleError {
    #[error("raffle {0} already exists")]
    DuplicateRaffle(RaffleId),

    #[error("raffle {0} not found")]
    RaffleNotFound(RaffleId),

    #[error("raffle {0} is closed for purchases")]
    RaffleClosed(RaffleId),

    #[error("invalid purchase signature")]
    InvalidSignature,

    #[error("opening does not match commitment")]
    InvalidOpening,

    #[error("commitment already opened")]
    AlreadyOpened,

    #[error("commitment not opened yet")]
    CommitmentNotOpened,

    #[error("point {point} out of range for total weight {total}")]
    OutOfRange { point: Weight, total: Weight },

    #[error("caller {0} is not the signer")]
    Unauthorized(AccountId),

    #[error("nonce {nonce} already used by {account}")]
    ReplayedNonce { account: AccountId, nonce: Nonce },

    #[error("ticket weight overflow")]
    WeightOverflow,

    #[error("amount {amount} exceeds per-purchase limit {limit}")]
    AmountTooLarge { amount: Weight, limit: Weight },
}

pub type Result<T, E = RaffleError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_tickets_per_purchase must be positive")]
    ZeroPurchaseLimit,
}
