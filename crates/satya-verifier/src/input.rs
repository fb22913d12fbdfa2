//! # Session Record Loading
//!
//! The only fallible boundary of the verifier: reading and parsing a
//! revealed session record from disk. Malformed input is fatal here; past
//! this point the core assumes a structurally valid record and never
//! returns an error.

use satya_models::SessionRecord;
use std::path::Path;
use tracing::info;

/// Boundary error for record loading.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid session record: {0}")]
    Input(String),
}

/// Parse a session record from a JSON string.
pub fn parse_session_record(json: &str) -> Result<SessionRecord, VerifyError> {
    let record: SessionRecord = serde_json::from_str(json)?;
    validate(&record)?;
    Ok(record)
}

/// Load a session record from a JSON file.
pub fn load_session_record(path: &Path) -> Result<SessionRecord, VerifyError> {
    let raw = std::fs::read_to_string(path)?;
    let record = parse_session_record(&raw)?;
    info!(
        path = %path.display(),
        actions = record.action_log.len(),
        "loaded session record"
    );
    Ok(record)
}

/// Structural checks serde cannot express. Semantic violations (bad hashes,
/// impossible actions) are the verifier's job, not the loader's.
fn validate(record: &SessionRecord) -> Result<(), VerifyError> {
    if record.house_commit_hash.is_empty() {
        return Err(VerifyError::Input("houseCommitHash is empty".to_string()));
    }
    if record.player_seed.is_some() && record.player_commit_hash.is_none() {
        return Err(VerifyError::Input(
            "playerSeed present without playerCommitHash".to_string(),
        ));
    }
    if record.config.initial_capital < 0.0 {
        return Err(VerifyError::Input("initialCapital is negative".to_string()));
    }
    if record.config.initial_price <= 0.0 {
        return Err(VerifyError::Input("initialPrice must be positive".to_string()));
    }
    Ok(())
}
