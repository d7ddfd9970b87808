//! Single raffle record and its lifecycle
//!
//! ```text
//! Created ──purchase──▶ AcceptingTickets ──open──▶ CommitmentOpened ──select──▶ WinnerResolved
//!    └──────────────────────────open (no tickets)──────────────────────────────────┘
//! ```
//!
//! Opening and selection run as one transition: the winner is computed from
//! the prospective seed first, and state is only written once nothing can
//! fail anymore.

use crate::accumulator::{PurchaseContext, RandomnessAccumulator};
use crate::auth::{NonceRegistry, PurchaseRequest};
use crate::config::NoncePolicy;
use crate::error::{RaffleError, Result};
use crate::ledger::TicketLedger;
use crate::types::{AccountId, Hash, RaffleId, Weight};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaffleState {
    Created,
    AcceptingTickets,
    /// Opening accepted, winner not yet recorded
    CommitmentOpened,
    WinnerResolved,
}

#[derive(Debug, Clone)]
pub struct Raffle {
    id: RaffleId,
    accumulator: RandomnessAccumulator,
    ledger: TicketLedger,
    nonces: NonceRegistry,
    purchases: u64,
    resolved: bool,
    winner: Option<AccountId>,
}

/// Read-only view returned by raffle queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleSummary {
    pub id: RaffleId,
    pub state: RaffleState,
    pub commitment: Hash,
    pub current_randomness: Hash,
    pub total_weight: Weight,
    pub participants: usize,
    pub opened: bool,
    pub winner: Option<AccountId>,
}

impl Raffle {
    pub fn new(id: RaffleId, commitment: Hash, nonce_policy: NoncePolicy) -> Self {
        Self {
            id,
            accumulator: RandomnessAccumulator::new(commitment),
            ledger: TicketLedger::new(),
            nonces: NonceRegistry::new(nonce_policy),
            purchases: 0,
            resolved: false,
            winner: None,
        }
    }

    pub fn id(&self) -> RaffleId {
        self.id
    }

    pub fn commitment(&self) -> &Hash {
        self.accumulator.commitment()
    }

    pub fn current_randomness(&self) -> &Hash {
        self.accumulator.current()
    }

    pub fn total_weight(&self) -> Weight {
        self.ledger.total_weight()
    }

    pub fn weight_of(&self, account: &AccountId) -> Weight {
        self.ledger.weight_of(account)
    }

    pub fn is_opened(&self) -> bool {
        self.accumulator.is_opened()
    }

    pub fn winner(&self) -> Option<&AccountId> {
        self.winner.as_ref()
    }

    pub fn ledger(&self) -> &TicketLedger {
        &self.ledger
    }

    pub fn state(&self) -> RaffleState {
        match (self.is_opened(), self.resolved) {
            (true, true) => RaffleState::WinnerResolved,
            (true, false) => RaffleState::CommitmentOpened,
            (false, _) if self.purchases == 0 => RaffleState::Created,
            (false, _) => RaffleState::AcceptingTickets,
        }
    }

    /// Apply an already authenticated purchase; returns the new total weight
    pub fn purchase(&mut self, request: &PurchaseRequest) -> Result<Weight> {
        if self.is_opened() {
            return Err(RaffleError::RaffleClosed(self.id));
        }
        self.nonces.check(&request.account, request.nonce)?;

        // Only fallible mutation; nothing has been written yet if it fails
        self.ledger.increment(request.account, request.amount)?;
        self.nonces.record(request.account, request.nonce);
        self.accumulator.mix_in(
            &request.contribution,
            &PurchaseContext {
                account: request.account,
                amount: request.amount,
                nonce: request.nonce,
            },
        )?;
        self.purchases += 1;

        debug!(
            "Raffle {} mix #{} -> {}",
            self.id,
            self.accumulator.mix_count(),
            hex::encode(self.accumulator.current())
        );
        Ok(self.total_weight())
    }

    /// Reveal the opening and pick the winner
    ///
    /// `Ok(None)` means the raffle closed without tickets.
    pub fn resolve(&mut self, opening: &[u8]) -> Result<Option<AccountId>> {
        let seed = self.accumulator.check_opening(opening)?;
        let total = self.total_weight();
        let winner = if total == 0 {
            None
        } else {
            let point = selection_point(&seed, total)?;
            Some(self.ledger.point_query(point)?)
        };

        self.accumulator.seal(seed);
        debug!("Raffle {} state {:?}", self.id, self.state());
        self.winner = winner;
        self.resolved = true;

        match winner {
            Some(w) => info!(
                "Raffle {} resolved: winner {} of total weight {}",
                self.id, w, total
            ),
            None => info!("Raffle {} resolved without tickets", self.id),
        }
        Ok(winner)
    }

    pub fn summary(&self) -> RaffleSummary {
        RaffleSummary {
            id: self.id,
            state: self.state(),
            commitment: *self.commitment(),
            current_randomness: *self.current_randomness(),
            total_weight: self.total_weight(),
            participants: self.ledger.len(),
            opened: self.is_opened(),
            winner: self.winner,
        }
    }
}

/// `seed mod total`, with the seed read as a big-endian 256-bit integer
pub fn selection_point(seed: &Hash, total: Weight) -> Result<Weight> {
    if total == 0 {
        return Err(RaffleError::OutOfRange { point: 0, total });
    }
    let point = BigUint::from_bytes_be(seed) % BigUint::from(total);
    point
        .to_u128()
        .ok_or(RaffleError::OutOfRange { point: Weight::MAX, total })
}
