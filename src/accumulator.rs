//! Commit-reveal randomness accumulator
//!
//! The operator publishes `commitment = SHA-256(opening)` before any ticket
//! is sold. Every accepted purchase folds its entropy into a SHA3-256 hash
//! chain seeded with the commitment:
//!
//! ```text
//! acc₀     = commitment
//! accₙ₊₁   = SHA3-256("lingo-raffle/mix/v1" ‖ accₙ ‖ contribution ‖ account ‖ amount ‖ nonce ‖ n)
//! seed     = SHA3-256("lingo-raffle/reveal/v1" ‖ acc_last ‖ opening)
//! ```
//!
//! The chain is public while tickets are on sale, so the opening is folded
//! in last. Nobody can compute the seed before the reveal, and the operator
//! cannot change the opening after the first sale.

use crate::crypto::{sha256, sha3_concat};
use crate::error::{RaffleError, Result};
use crate::types::{AccountId, Hash, Nonce, Weight};
use serde::{Deserialize, Serialize};

pub const MIX_DOMAIN: &[u8] = b"lingo-raffle/mix/v1";
pub const REVEAL_DOMAIN: &[u8] = b"lingo-raffle/reveal/v1";

/// Per-purchase data bound into each mix step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseContext {
    pub account: AccountId,
    pub amount: Weight,
    pub nonce: Nonce,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomnessAccumulator {
    commitment: Hash,
    current: Hash,
    mixes: u64,
    opened: bool,
}

impl RandomnessAccumulator {
    pub fn new(commitment: Hash) -> Self {
        Self {
            commitment,
            current: commitment,
            mixes: 0,
            opened: false,
        }
    }

    pub fn commitment(&self) -> &Hash {
        &self.commitment
    }

    /// Current chain value (the selection seed once opened)
    pub fn current(&self) -> &Hash {
        &self.current
    }

    pub fn mix_count(&self) -> u64 {
        self.mixes
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    /// Fold one purchase into the chain
    ///
    /// Must run exactly once per accepted purchase, in arrival order.
    /// Callers check `is_opened` first; mixing a sealed chain is refused.
    pub fn mix_in(&mut self, contribution: &Hash, ctx: &PurchaseContext) -> Result<()> {
        if self.opened {
            return Err(RaffleError::AlreadyOpened);
        }
        self.current = mix_step(&self.current, contribution, ctx, self.mixes);
        self.mixes += 1;
        Ok(())
    }

    /// Validate an opening without touching state; returns the seed it would produce
    pub fn check_opening(&self, opening: &[u8]) -> Result<Hash> {
        if self.opened {
            return Err(RaffleError::AlreadyOpened);
        }
        if sha256(opening) != self.commitment {
            return Err(RaffleError::InvalidOpening);
        }
        Ok(sha3_concat(&[REVEAL_DOMAIN, &self.current, opening]))
    }

    /// Commit a seed produced by `check_opening`. Irreversible.
    pub(crate) fn seal(&mut self, seed: Hash) {
        self.current = seed;
        self.opened = true;
    }

    pub fn verify_opening(&mut self, opening: &[u8]) -> Result<()> {
        let seed = self.check_opening(opening)?;
        self.seal(seed);
        Ok(())
    }

    pub fn selection_seed(&self) -> Result<&Hash> {
        if !self.opened {
            return Err(RaffleError::CommitmentNotOpened);
        }
        Ok(&self.current)
    }
}

fn mix_step(current: &Hash, contribution: &Hash, ctx: &PurchaseContext, sequence: u64) -> Hash {
    sha3_concat(&[
        MIX_DOMAIN,
        current,
        contribution,
        ctx.account.as_bytes(),
        &ctx.amount.to_be_bytes(),
        &ctx.nonce.to_be_bytes(),
        &sequence.to_be_bytes(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(byte: u8, amount: Weight, nonce: Nonce) -> PurchaseContext {
        PurchaseContext { account: AccountId::new([byte; 32]), amount, nonce }
    }

    #[test]
    fn test_sequence_separates_identical_mixes() {
        let c = [7u8; 32];
        let a = mix_step(&[0u8; 32], &c, &ctx(1, 5, 0), 0);
        let b = mix_step(&[0u8; 32], &c, &ctx(1, 5, 0), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sealed_chain_refuses_mix() {
        let mut acc = RandomnessAccumulator::new(sha256(b"secret"));
        acc.verify_opening(b"secret").unwrap();
        let sealed = *acc.current();

        assert_eq!(acc.mix_in(&[1u8; 32], &ctx(1, 1, 0)), Err(RaffleError::AlreadyOpened));
        assert_eq!(acc.current(), &sealed);
        assert_eq!(acc.mix_count(), 0);
    }
}
