//! Purchase authentication: canonical encoding, signature check and nonce replay guard
//!
//! # Canonical purchase message (152 bytes, big-endian)
//!
//! | Offset | Size | Field                          |
//! |--------|------|--------------------------------|
//! | 0      | 24   | `"lingo-raffle/purchase/v1"`   |
//! | 24     | 8    | raffle_id (u64)                |
//! | 32     | 32   | account                        |
//! | 64     | 16   | amount (u128)                  |
//! | 80     | 8    | nonce (u64)                    |
//! | 88     | 32   | randomness contribution        |
//! | 120    | 32   | signer public key              |
//!
//! The signer signs `SHA3-256(message)` with Ed25519.

use crate::config::NoncePolicy;
use crate::crypto::{sha3, verify, Keypair};
use crate::error::{RaffleError, Result};
use crate::types::{AccountId, Hash, Nonce, PublicKey, RaffleId, Signature, Weight};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const PURCHASE_DOMAIN: &[u8; 24] = b"lingo-raffle/purchase/v1";
pub const PURCHASE_MESSAGE_SIZE: usize = 24 + 8 + 32 + 16 + 8 + 32 + 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub raffle_id: RaffleId,
    pub account: AccountId,
    pub amount: Weight,
    pub nonce: Nonce,
    pub contribution: Hash,
}

impl PurchaseRequest {
    pub fn canonical_bytes(&self, signer_key: &PublicKey) -> [u8; PURCHASE_MESSAGE_SIZE] {
        let mut out = [0u8; PURCHASE_MESSAGE_SIZE];
        let fields: [&[u8]; 7] = [
            PURCHASE_DOMAIN,
            &self.raffle_id.to_be_bytes(),
            self.account.as_bytes(),
            &self.amount.to_be_bytes(),
            &self.nonce.to_be_bytes(),
            &self.contribution,
            signer_key,
        ];
        let mut pos = 0;
        for field in fields {
            out[pos..pos + field.len()].copy_from_slice(field);
            pos += field.len();
        }
        out
    }

    pub fn digest(&self, signer_key: &PublicKey) -> Hash {
        sha3(&self.canonical_bytes(signer_key))
    }

    /// Off-chain side: the operator's signing service authorizes a purchase
    pub fn sign(&self, keypair: &Keypair) -> Signature {
        keypair.sign(&self.digest(keypair.public_key()))
    }
}

/// Verifies purchase signatures against the designated signing key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAuthenticator {
    public_key: PublicKey,
}

impl SignatureAuthenticator {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn authenticate(&self, request: &PurchaseRequest, signature: &[u8]) -> Result<()> {
        let digest = request.digest(&self.public_key);
        verify(&self.public_key, &digest, signature).map_err(|e| {
            debug!("Purchase signature rejected for {}: {}", request.account, e);
            RaffleError::InvalidSignature
        })
    }
}

/// Per-raffle record of consumed nonces
#[derive(Debug, Clone)]
pub enum NonceRegistry {
    /// Highest accepted nonce per account
    Increasing(HashMap<AccountId, Nonce>),
    Unique(HashSet<(AccountId, Nonce)>),
}

impl NonceRegistry {
    pub fn new(policy: NoncePolicy) -> Self {
        match policy {
            NoncePolicy::Increasing => Self::Increasing(HashMap::new()),
            NoncePolicy::Unique => Self::Unique(HashSet::new()),
        }
    }

    pub fn check(&self, account: &AccountId, nonce: Nonce) -> Result<()> {
        let fresh = match self {
            Self::Increasing(last) => last.get(account).is_none_or(|&prev| nonce > prev),
            Self::Unique(used) => !used.contains(&(*account, nonce)),
        };
        if fresh {
            Ok(())
        } else {
            Err(RaffleError::ReplayedNonce { account: *account, nonce })
        }
    }

    /// Only called after every other purchase guard passed
    pub fn record(&mut self, account: AccountId, nonce: Nonce) {
        match self {
            Self::Increasing(last) => {
                last.insert(account, nonce);
            }
            Self::Unique(used) => {
                used.insert((account, nonce));
            }
        }
    }
}
