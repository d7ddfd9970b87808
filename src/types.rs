//! Core value types shared by every raffle component

use serde::{Deserialize, Serialize};
use std::fmt;

/// 256-bit value: commitments, accumulator states, entropy contributions
pub type Hash = [u8; 32];
pub type RaffleId = u64;
/// Ticket amounts and cumulative sums
pub type Weight = u128;
pub type Nonce = u64;

/// Ed25519 verifying key bytes
pub type PublicKey = [u8; 32];
/// Ed25519 signature bytes (64 when well formed)
pub type Signature = Vec<u8>;

pub const ACCOUNT_ID_SIZE: usize = 32;

/// Opaque account identifier supplied by the host ledger
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AccountId(pub [u8; ACCOUNT_ID_SIZE]);

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let bytes: [u8; ACCOUNT_ID_SIZE] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl From<[u8; ACCOUNT_ID_SIZE]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell accounts apart in logs
        write!(f, "{}…", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}
