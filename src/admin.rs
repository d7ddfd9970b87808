//! Signer access control

use crate::error::{RaffleError, Result};
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The single account allowed to create raffles and hand over the role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    signer: AccountId,
}

impl AccessControl {
    pub fn new(signer: AccountId) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &AccountId {
        &self.signer
    }

    pub fn ensure_signer(&self, caller: &AccountId) -> Result<()> {
        if *caller != self.signer {
            return Err(RaffleError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Replace the signer; returns the previous one
    pub fn change_signer(
        &mut self,
        caller: &AccountId,
        new_signer: AccountId,
    ) -> Result<AccountId> {
        self.ensure_signer(caller)?;
        let old = std::mem::replace(&mut self.signer, new_signer);
        info!("Signer changed {} -> {}", old, new_signer);
        Ok(old)
    }
}
