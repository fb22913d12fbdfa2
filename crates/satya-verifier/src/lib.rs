//! # Satya Verifier
//!
//! Independent verification of revealed trading-game sessions.
//!
//! Given a revealed session record (committed house seed, optional player
//! seed, session config and the ordered action log), this crate certifies
//! that:
//!
//! 1. the revealed seed(s) match the pre-published commitment hashes,
//! 2. the seed combination rule was honoured, and
//! 3. a deterministic replay reproduces the final state the operator claims.
//!
//! ## Verdict model
//!
//! The verifier never throws on protocol violations. Checks accumulate
//! structured errors and warnings into one [`VerificationResult`]; the
//! verdict is the boolean-AND of every check. Only the I/O boundary
//! (loading a record from disk) returns a [`VerifyError`].
//!
//! ## Usage
//! ```ignore
//! use satya_verifier::{load_session_record, verify_session};
//!
//! let record = load_session_record(&path)?;
//! let result = verify_session(&record);
//! if !result.valid {
//!     for issue in &result.errors {
//!         eprintln!("[{}] {}", issue.code, issue.message);
//!     }
//! }
//! ```

pub mod commitments;
pub mod input;
pub mod replay;
pub mod report;

pub use commitments::{CommitmentReport, verify_commitments};
pub use input::{VerifyError, load_session_record, parse_session_record};
pub use replay::{replay_session, verify_session};
pub use report::{generate_run_id, render_text_report};
