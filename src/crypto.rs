use crate::types::{Hash, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use sha2::Sha256;
use sha3::{Digest, Sha3_256};
use thiserror::Error;

pub const ED25519_SIG_SIZE: usize = 64;
pub const ED25519_SEED_SIZE: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Ed25519 keypair of the off-chain purchase signer
pub struct Keypair {
    pub public: PublicKey,
    secret: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut rand::rngs::OsRng);
        Self {
            public: secret.verifying_key().to_bytes(),
            secret,
        }
    }

    /// Deterministic keypair, e.g. restored from an operator seed
    pub fn from_seed(seed: &[u8; ED25519_SEED_SIZE]) -> Self {
        let secret = SigningKey::from_bytes(seed);
        Self {
            public: secret.verifying_key().to_bytes(),
            secret,
        }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.secret.sign(message).to_bytes().to_vec()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

pub fn verify(pubkey: &PublicKey, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    if signature.len() != ED25519_SIG_SIZE {
        return Err(CryptoError::InvalidSignature);
    }
    let pk = VerifyingKey::from_bytes(pubkey).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = ed25519_dalek::Signature::from_slice(signature)
        .map_err(|_| CryptoError::InvalidSignature)?;
    pk.verify(message, &sig).map_err(|_| CryptoError::InvalidSignature)
}

/// SHA-256, the commitment hash: `commitment = sha256(opening)`
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

pub fn sha3(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

pub fn sha3_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
