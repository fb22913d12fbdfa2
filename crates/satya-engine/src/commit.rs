//! # Commitment Primitives
//!
//! Seed hashing, seed combination, and labelled sub-seed derivation. These
//! are the cryptographic anchors of the protocol: the operator publishes
//! `hash_seed(house_seed)` before the session, the player may contribute a
//! seed the same way, and after reveal the verifier checks both hashes and
//! the combined-seed identity.
//!
//! All functions are total and pure. `derive_sub_seed` is bit-for-bit
//! contractual: it is the only thing standing between the master seed and
//! the five independent price-layer streams.

use sha2::{Digest, Sha256};

/// SHA-256 over the decimal ASCII rendering of the seed (no leading zeros,
/// no sign), as 64 lowercase hex characters.
pub fn hash_seed(seed: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time-equivalent comparison of a revealed seed against its
/// published commitment hash.
///
/// The digest is recomputed and every byte is folded into an accumulator so
/// the comparison cost does not depend on where the strings diverge.
pub fn verify_commitment(seed: u32, commit_hash: &str) -> bool {
    let computed = hash_seed(seed);
    if computed.len() != commit_hash.len() {
        return false;
    }
    let mut acc = 0u8;
    for (a, b) in computed.bytes().zip(commit_hash.bytes()) {
        acc |= a ^ b;
    }
    acc == 0
}

/// Master seed from a house seed and a player seed.
pub fn combine_seeds(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Deterministic labelled sub-seed: `hash = hash * 32 - hash + byte` per
/// label byte, in wrapping 32-bit two's-complement arithmetic.
///
/// The reference runs this on signed 32-bit words; wrapping arithmetic on
/// `u32` is the same bit pattern, so the mixing stays on the unsigned view
/// throughout.
pub fn derive_sub_seed(master: u32, label: &str) -> u32 {
    let mut hash = master;
    for &c in label.as_bytes() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(c as u32);
    }
    hash
}
