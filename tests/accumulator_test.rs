//! Commit-reveal accumulator tests

use lingo_raffle::accumulator::{MIX_DOMAIN, REVEAL_DOMAIN};
use lingo_raffle::crypto::sha3_concat;
use lingo_raffle::{sha256, AccountId, PurchaseContext, RaffleError, RandomnessAccumulator};

fn ctx(byte: u8, amount: u128, nonce: u64) -> PurchaseContext {
    PurchaseContext { account: AccountId::new([byte; 32]), amount, nonce }
}

#[test]
fn test_starts_at_commitment() {
    let commitment = sha256(b"test");
    let acc = RandomnessAccumulator::new(commitment);

    assert_eq!(acc.commitment(), &commitment);
    assert_eq!(acc.current(), &commitment);
    assert!(!acc.is_opened());
    assert_eq!(acc.selection_seed(), Err(RaffleError::CommitmentNotOpened));
}

#[test]
fn test_opening_binds_to_commitment() {
    let mut acc = RandomnessAccumulator::new(sha256(b"test"));

    assert_eq!(acc.verify_opening(b"wrong input"), Err(RaffleError::InvalidOpening));
    assert!(!acc.is_opened());

    acc.verify_opening(b"test").unwrap();
    assert!(acc.is_opened());
    assert_eq!(acc.verify_opening(b"test"), Err(RaffleError::AlreadyOpened));
}

#[test]
fn test_identical_contributions_give_distinct_updates() {
    let mut acc = RandomnessAccumulator::new(sha256(b"test"));
    let contribution = [0x64u8; 32];

    acc.mix_in(&contribution, &ctx(1, 1, 0)).unwrap();
    let first = *acc.current();
    acc.mix_in(&contribution, &ctx(1, 1, 0)).unwrap();

    assert_ne!(first, *acc.current());
    assert_eq!(acc.mix_count(), 2);
}

#[test]
fn test_mix_order_matters() {
    let commitment = sha256(b"test");
    let mut ab = RandomnessAccumulator::new(commitment);
    let mut ba = RandomnessAccumulator::new(commitment);

    ab.mix_in(&[1u8; 32], &ctx(1, 1, 0)).unwrap();
    ab.mix_in(&[2u8; 32], &ctx(2, 14, 0)).unwrap();
    ba.mix_in(&[2u8; 32], &ctx(2, 14, 0)).unwrap();
    ba.mix_in(&[1u8; 32], &ctx(1, 1, 0)).unwrap();

    assert_ne!(ab.current(), ba.current());
}

#[test]
fn test_seed_is_reproducible_from_history() {
    let commitment = sha256(b"test");
    let contribution = [0x64u8; 32];
    let mut acc = RandomnessAccumulator::new(commitment);
    acc.mix_in(&contribution, &ctx(1, 1, 0)).unwrap();
    acc.verify_opening(b"test").unwrap();

    let mixed = sha3_concat(&[
        MIX_DOMAIN,
        &commitment,
        &contribution,
        &[1u8; 32],
        &1u128.to_be_bytes(),
        &0u64.to_be_bytes(),
        &0u64.to_be_bytes(),
    ]);
    let expected = sha3_concat(&[REVEAL_DOMAIN, &mixed, b"test"]);
    assert_eq!(acc.selection_seed(), Ok(&expected));
}

#[test]
fn test_check_opening_is_pure() {
    let acc = RandomnessAccumulator::new(sha256(b"test"));
    let seed = acc.check_opening(b"test").unwrap();

    assert!(!acc.is_opened());
    assert_ne!(acc.current(), &seed);
}
