//! # Commitment Verification
//!
//! Checks the revealed seeds against their pre-published SHA-256
//! commitments and the combined-seed identity. Failures are accumulated as
//! structured issues; replay proceeds regardless so the final report can
//! show everything at once.

use satya_engine::{combine_seeds, verify_commitment};
use satya_models::{SessionRecord, VerificationIssue, issue_codes};
use tracing::debug;

/// Outcome of the commitment checks for one record.
#[derive(Debug, Clone)]
pub struct CommitmentReport {
    pub house_valid: bool,
    /// Vacuously `true` when the record carries no player seed.
    pub player_valid: bool,
    /// Vacuously `true` when no combined seed was published.
    pub combination_valid: bool,
    pub errors: Vec<VerificationIssue>,
}

impl CommitmentReport {
    pub fn all_valid(&self) -> bool {
        self.house_valid && self.player_valid && self.combination_valid
    }
}

/// Verify house and player commitments plus the seed combination rule.
pub fn verify_commitments(record: &SessionRecord) -> CommitmentReport {
    let mut errors = Vec::new();

    let house_valid = verify_commitment(record.house_seed, &record.house_commit_hash);
    if !house_valid {
        errors.push(VerificationIssue::new(
            issue_codes::COMMITMENT_MISMATCH,
            format!(
                "house seed {} does not hash to the published commitment {}",
                record.house_seed, record.house_commit_hash
            ),
        ));
    }

    let player_valid = match (record.player_seed, record.player_commit_hash.as_deref()) {
        (Some(seed), Some(hash)) => {
            let ok = verify_commitment(seed, hash);
            if !ok {
                errors.push(VerificationIssue::new(
                    issue_codes::COMMITMENT_MISMATCH,
                    format!("player seed {seed} does not hash to the published commitment {hash}"),
                ));
            }
            ok
        }
        // Nothing to check without a revealed pair.
        _ => true,
    };

    let combination_valid = match (record.player_seed, record.combined_seed) {
        (Some(player), Some(combined)) => {
            let expected = combine_seeds(record.house_seed, player);
            let ok = combined == expected;
            if !ok {
                errors.push(VerificationIssue::new(
                    issue_codes::SEED_COMBINATION_MISMATCH,
                    format!(
                        "combined seed {combined} != house XOR player ({} ^ {player} = {expected})",
                        record.house_seed
                    ),
                ));
            }
            ok
        }
        _ => true,
    };

    debug!(house_valid, player_valid, combination_valid, "commitment checks done");
    CommitmentReport {
        house_valid,
        player_valid,
        combination_valid,
        errors,
    }
}
