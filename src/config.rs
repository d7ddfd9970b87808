//! Contract configuration

use crate::error::ConfigError;
use crate::types::Weight;
use serde::{Deserialize, Serialize};

/// Replay protection for purchase nonces, per account per raffle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoncePolicy {
    /// Each nonce must exceed the account's last accepted nonce
    #[default]
    Increasing,
    /// Any nonce not yet used by the account
    Unique,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub nonce_policy: NoncePolicy,
    /// Upper bound on a single purchase amount, unlimited when `None`
    pub max_tickets_per_purchase: Option<Weight>,
}

impl ContractConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tickets_per_purchase == Some(0) {
            return Err(ConfigError::ZeroPurchaseLimit);
        }
        Ok(())
    }
}
