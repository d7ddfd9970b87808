//! Raffle contract: owns the raffle table and dispatches commands
//!
//! The host serializes every command into one total order and applies them
//! one at a time. Each command is a single transaction: it either returns
//! an [`Event`] with all its effects applied, or an error with none.

use crate::admin::AccessControl;
use crate::auth::{PurchaseRequest, SignatureAuthenticator};
use crate::config::ContractConfig;
use crate::error::{ConfigError, RaffleError, Result};
use crate::raffle::{Raffle, RaffleSummary};
use crate::types::{AccountId, Hash, PublicKey, RaffleId, Signature, Weight};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Signer only
    CreateRaffle { raffle_id: RaffleId, commitment: Hash },
    /// Authorized by the signing key, not by the sender
    PurchaseTickets { request: PurchaseRequest, signature: Signature },
    /// Open to anyone holding the opening
    OpenCommitment { raffle_id: RaffleId, opening: Vec<u8> },
    /// Current signer only
    ChangeSigner { new_signer: AccountId },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateRaffle { .. } => "create_raffle",
            Command::PurchaseTickets { .. } => "purchase_tickets",
            Command::OpenCommitment { .. } => "open_commitment",
            Command::ChangeSigner { .. } => "change_signer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    RaffleCreated { raffle_id: RaffleId, commitment: Hash },
    TicketsPurchased {
        raffle_id: RaffleId,
        account: AccountId,
        amount: Weight,
        total_weight: Weight,
    },
    WinnerResolved {
        raffle_id: RaffleId,
        winner: Option<AccountId>,
        seed: Hash,
    },
    SignerChanged { old: AccountId, new: AccountId },
}

#[derive(Debug, Clone)]
pub struct RaffleContract {
    config: ContractConfig,
    access: AccessControl,
    authenticator: SignatureAuthenticator,
    raffles: BTreeMap<RaffleId, Raffle>,
}

impl RaffleContract {
    pub fn new(signer: AccountId, signing_key: PublicKey) -> Self {
        Self {
            config: ContractConfig::default(),
            access: AccessControl::new(signer),
            authenticator: SignatureAuthenticator::new(signing_key),
            raffles: BTreeMap::new(),
        }
    }

    pub fn with_config(
        signer: AccountId,
        signing_key: PublicKey,
        config: ContractConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ..Self::new(signer, signing_key) })
    }

    /// Apply one command on behalf of `sender`
    pub fn dispatch(&mut self, sender: AccountId, command: Command) -> Result<Event> {
        let name = command.name();
        let result = match command {
            Command::CreateRaffle { raffle_id, commitment } => {
                self.create_raffle(&sender, raffle_id, commitment)
            }
            Command::PurchaseTickets { request, signature } => {
                self.purchase_tickets(&request, &signature)
            }
            Command::OpenCommitment { raffle_id, opening } => {
                self.open_commitment(raffle_id, &opening)
            }
            Command::ChangeSigner { new_signer } => self.change_signer(&sender, new_signer),
        };
        if let Err(e) = &result {
            debug!("Rejected {} from {}: {}", name, sender, e);
        }
        result
    }

    pub fn create_raffle(
        &mut self,
        sender: &AccountId,
        raffle_id: RaffleId,
        commitment: Hash,
    ) -> Result<Event> {
        self.access.ensure_signer(sender)?;
        match self.raffles.entry(raffle_id) {
            Entry::Occupied(_) => Err(RaffleError::DuplicateRaffle(raffle_id)),
            Entry::Vacant(slot) => {
                slot.insert(Raffle::new(raffle_id, commitment, self.config.nonce_policy));
                info!("Raffle {} created, commitment {}", raffle_id, hex::encode(commitment));
                Ok(Event::RaffleCreated { raffle_id, commitment })
            }
        }
    }

    pub fn purchase_tickets(
        &mut self,
        request: &PurchaseRequest,
        signature: &[u8],
    ) -> Result<Event> {
        let raffle = self
            .raffles
            .get_mut(&request.raffle_id)
            .ok_or(RaffleError::RaffleNotFound(request.raffle_id))?;
        if raffle.is_opened() {
            return Err(RaffleError::RaffleClosed(request.raffle_id));
        }
        if let Some(limit) = self.config.max_tickets_per_purchase {
            if request.amount > limit {
                return Err(RaffleError::AmountTooLarge { amount: request.amount, limit });
            }
        }
        self.authenticator.authenticate(request, signature)?;

        let total_weight = raffle.purchase(request)?;
        info!(
            "Raffle {}: {} bought {} tickets (total {})",
            request.raffle_id, request.account, request.amount, total_weight
        );
        Ok(Event::TicketsPurchased {
            raffle_id: request.raffle_id,
            account: request.account,
            amount: request.amount,
            total_weight,
        })
    }

    pub fn open_commitment(&mut self, raffle_id: RaffleId, opening: &[u8]) -> Result<Event> {
        let raffle = self
            .raffles
            .get_mut(&raffle_id)
            .ok_or(RaffleError::RaffleNotFound(raffle_id))?;
        let winner = raffle.resolve(opening)?;
        Ok(Event::WinnerResolved {
            raffle_id,
            winner,
            seed: *raffle.current_randomness(),
        })
    }

    pub fn change_signer(&mut self, sender: &AccountId, new_signer: AccountId) -> Result<Event> {
        let old = self.access.change_signer(sender, new_signer)?;
        Ok(Event::SignerChanged { old, new: new_signer })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn raffle(&self, raffle_id: RaffleId) -> Result<&Raffle> {
        self.raffles
            .get(&raffle_id)
            .ok_or(RaffleError::RaffleNotFound(raffle_id))
    }

    pub fn get_raffle(&self, raffle_id: RaffleId) -> Result<RaffleSummary> {
        self.raffle(raffle_id).map(Raffle::summary)
    }

    pub fn get_player_amount(&self, raffle_id: RaffleId, account: &AccountId) -> Result<Weight> {
        self.raffle(raffle_id).map(|r| r.weight_of(account))
    }

    pub fn get_total_sum(&self, raffle_id: RaffleId) -> Result<Weight> {
        self.raffle(raffle_id).map(Raffle::total_weight)
    }

    pub fn get_commitment(&self, raffle_id: RaffleId) -> Result<Hash> {
        self.raffle(raffle_id).map(|r| *r.commitment())
    }

    pub fn get_current_randomness(&self, raffle_id: RaffleId) -> Result<Hash> {
        self.raffle(raffle_id).map(|r| *r.current_randomness())
    }

    pub fn get_commitment_opened(&self, raffle_id: RaffleId) -> Result<bool> {
        self.raffle(raffle_id).map(Raffle::is_opened)
    }

    pub fn get_winner(&self, raffle_id: RaffleId) -> Result<Option<AccountId>> {
        self.raffle(raffle_id).map(|r| r.winner().copied())
    }

    /// Range of ticket weight owned by `account`, if it holds any
    pub fn get_ticket_range(
        &self,
        raffle_id: RaffleId,
        account: &AccountId,
    ) -> Result<Option<std::ops::Range<Weight>>> {
        self.raffle(raffle_id).map(|r| r.ledger().range_of(account))
    }

    pub fn get_signer(&self) -> &AccountId {
        self.access.signer()
    }

    pub fn get_signing_key(&self) -> &PublicKey {
        self.authenticator.public_key()
    }

    pub fn raffle_ids(&self) -> impl Iterator<Item = RaffleId> + '_ {
        self.raffles.keys().copied()
    }
}
