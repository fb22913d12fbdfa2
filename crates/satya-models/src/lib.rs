//! # Satya Models
//!
//! Canonical data model for the provably-fair session verifier.
//!
//! This crate carries the wire-facing types only: session configuration, the
//! replayable game state, the player action log, and the verification
//! input/output schema. All behavior lives in `satya-engine` and
//! `satya-verifier`; keeping the types in a leaf crate lets the engine and
//! the verifier agree on one schema without depending on each other.
//!
//! Every struct that crosses the JSON boundary uses camelCase field names,
//! matching the session records the game operator publishes.

pub mod actions;
pub mod session;
pub mod verification;

pub use actions::{LoggedAction, PlayerAction};
pub use session::{
    Direction, GameState, LayeredState, OptionContract, OptionDirection, Position, SessionConfig,
    SimpleTurbo,
};
pub use verification::{
    ExpectedFinalState, SessionRecord, StateDifference, VerificationIssue, VerificationResult,
    issue_codes,
};
