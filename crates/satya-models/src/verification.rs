//! # Verification Schema
//!
//! Input a verifier consumes (the revealed session record) and the verdict it
//! produces. The result mirrors the gate-result shape used across our
//! tooling: a boolean verdict plus accumulated structured issues, never an
//! early exit: a session with a wrong commitment still gets its replay so
//! the report can show everything that diverged.

use crate::actions::LoggedAction;
use crate::session::{GameState, SessionConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue codes attached to [`VerificationIssue`]s.
pub mod issue_codes {
    /// A revealed seed does not hash to its published commitment.
    pub const COMMITMENT_MISMATCH: &str = "commitment_mismatch";
    /// The published combined seed is not the XOR of house and player seeds.
    pub const SEED_COMBINATION_MISMATCH: &str = "seed_combination_mismatch";
    /// A replayed final-state field differs beyond tolerance.
    pub const STATE_MISMATCH: &str = "state_mismatch";
    /// A logged action left the state unchanged (failed a precondition).
    pub const ACTION_NO_EFFECT: &str = "action_no_effect";
    /// A logged action is scheduled past the replay horizon.
    pub const ACTION_BEYOND_HORIZON: &str = "action_beyond_horizon";
}

/// A revealed session record, as published by the operator after the session
/// closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub house_seed: u32,
    /// 64 lowercase hex chars, published before the session started.
    pub house_commit_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_commit_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_seed: Option<u32>,
    pub config: SessionConfig,
    #[serde(default)]
    pub action_log: Vec<LoggedAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_final_state: Option<ExpectedFinalState>,
}

impl SessionRecord {
    /// The master seed replay runs under: the combined seed when the player
    /// contributed one, the house seed alone otherwise.
    pub fn replay_seed(&self) -> u32 {
        self.combined_seed.unwrap_or(self.house_seed)
    }
}

/// Final-state claims to check the replay against. Only present fields are
/// compared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedFinalState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_losses: Option<f64>,
}

impl ExpectedFinalState {
    pub fn is_empty(&self) -> bool {
        self.capital.is_none()
            && self.tick_count.is_none()
            && self.total_profit.is_none()
            && self.total_losses.is_none()
    }
}

/// One structured finding, fatal (error) or informational (warning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationIssue {
    /// Stable machine-readable code from [`issue_codes`].
    pub code: String,
    pub message: String,
}

impl VerificationIssue {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// A single replayed-vs-claimed field divergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDifference {
    pub field: String,
    pub expected: f64,
    pub actual: f64,
    pub delta: f64,
}

/// Complete verdict for one session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// `true` iff no errors accumulated; boolean-AND of every check.
    pub valid: bool,
    pub errors: Vec<VerificationIssue>,
    pub warnings: Vec<VerificationIssue>,
    pub house_commitment_valid: bool,
    /// Vacuously `true` when the record has no player seed.
    pub player_commitment_valid: bool,
    /// Vacuously `true` when no combined seed was published.
    pub seed_combination_valid: bool,
    /// Final game state reached by the deterministic replay.
    pub replayed_state: GameState,
    pub ticks_processed: u64,
    pub actions_executed: u64,
    /// Present only when the record carried an expected final state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_match: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state_differences: Vec<StateDifference>,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
}
