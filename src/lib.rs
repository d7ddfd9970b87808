pub mod accumulator;
pub mod admin;
pub mod auth;
pub mod config;
pub mod contract;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod raffle;
pub mod types;

pub use accumulator::{PurchaseContext, RandomnessAccumulator};
pub use admin::AccessControl;
pub use auth::{NonceRegistry, PurchaseRequest, SignatureAuthenticator};
pub use config::{ContractConfig, NoncePolicy};
pub use contract::{Command, Event, RaffleContract};
pub use crypto::{sha256, sha3, verify, Keypair};
pub use error::{ConfigError, RaffleError};
pub use ledger::TicketLedger;
pub use raffle::{selection_point, Raffle, RaffleState, RaffleSummary};
pub use types::*;
