//! # Replay Orchestrator
//!
//! Reconstructs a session tick by tick: schedules logged actions against
//! ticks, drives a fresh game engine, and compares the replayed final state
//! against the operator's claims.
//!
//! ## Scheduling
//!
//! Actions are stably sorted by `(tick_number, timestamp)` and drained
//! before the tick they name advances. An action the engine rejects is a
//! warning, not an error: a malicious log can contain entries that were
//! never valid, and the verifier's job is to surface them, not to guess.
//!
//! ## Horizon
//!
//! The walk runs to the claimed `tick_count` when the record carries one;
//! otherwise 100 ticks past the last action (1000 ticks for an empty log),
//! ending early once every action is consumed and ten ticks have passed
//! since the last one.

use crate::commitments::verify_commitments;
use chrono::Utc;
use satya_engine::GameEngine;
use satya_models::{
    GameState, LoggedAction, SessionRecord, StateDifference, VerificationIssue,
    VerificationResult, issue_codes,
};
use std::time::Instant;
use tracing::{debug, info};

/// Absolute tolerance for replayed-vs-claimed floating-point fields.
const STATE_TOLERANCE: f64 = 1e-4;
/// Ticks replayed past the last action when no tick count is claimed.
const HORIZON_PADDING_TICKS: u64 = 100;
/// Horizon for a record with an empty action log and no claimed tick count.
const DEFAULT_HORIZON_TICKS: u64 = 1000;
/// Early-exit grace once all actions are consumed.
const EARLY_EXIT_GRACE_TICKS: u64 = 10;

/// Raw result of one deterministic replay, before commitment checks are
/// folded in.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub final_state: GameState,
    pub ticks_processed: u64,
    pub actions_executed: u64,
    pub errors: Vec<VerificationIssue>,
    pub warnings: Vec<VerificationIssue>,
    pub state_match: Option<bool>,
    pub state_differences: Vec<StateDifference>,
}

/// Replay the session under the record's master seed and compare the final
/// state against the claims, when present.
pub fn replay_session(record: &SessionRecord) -> ReplayOutcome {
    let seed = record.replay_seed();
    let mut engine = GameEngine::new(&record.config, seed);

    let mut schedule: Vec<&LoggedAction> = record.action_log.iter().collect();
    schedule.sort_by_key(|a| (a.tick_number, a.timestamp));
    let last_action_tick = schedule.last().map(|a| a.tick_number);

    let claimed_ticks = record
        .expected_final_state
        .as_ref()
        .and_then(|e| e.tick_count);
    let max_tick = match (claimed_ticks, last_action_tick) {
        (Some(t), _) => t,
        (None, Some(last)) => last + HORIZON_PADDING_TICKS,
        (None, None) => DEFAULT_HORIZON_TICKS,
    };
    info!(seed, max_tick, actions = schedule.len(), "replaying session");

    let mut warnings = Vec::new();
    let mut actions_executed = 0u64;
    let mut next = 0usize;

    for t in 0..max_tick {
        // Apply this tick's actions before the tick advances.
        while next < schedule.len() && schedule[next].tick_number == t {
            let entry = schedule[next];
            let applied = engine.execute_action(&entry.action);
            if !applied {
                warnings.push(VerificationIssue::new(
                    issue_codes::ACTION_NO_EFFECT,
                    format!(
                        "action '{}' at tick {t} had no effect - possibly invalid",
                        entry.action.name()
                    ),
                ));
            }
            actions_executed += 1;
            next += 1;
        }
        engine.process_tick();

        if claimed_ticks.is_none() && next >= schedule.len() {
            if let Some(last) = last_action_tick {
                if t + 1 >= last + EARLY_EXIT_GRACE_TICKS {
                    debug!(tick = t + 1, "all actions consumed, ending replay early");
                    break;
                }
            }
        }
    }

    // Anything still queued sits past the replay horizon and never ran.
    for entry in &schedule[next..] {
        warnings.push(VerificationIssue::new(
            issue_codes::ACTION_BEYOND_HORIZON,
            format!(
                "action '{}' at tick {} lies beyond the replay horizon ({max_tick}) and was not executed",
                entry.action.name(),
                entry.tick_number
            ),
        ));
    }

    let final_state = engine.snapshot();
    let ticks_processed = final_state.tick_count;

    let mut errors = Vec::new();
    let mut state_differences = Vec::new();
    let state_match = record.expected_final_state.as_ref().map(|expected| {
        let mut push_diff = |field: &str, expected_value: f64, actual: f64| {
            let delta = actual - expected_value;
            errors.push(VerificationIssue::new(
                issue_codes::STATE_MISMATCH,
                format!("{field}: claimed {expected_value}, replayed {actual} (delta {delta:+e})"),
            ));
            state_differences.push(StateDifference {
                field: field.to_string(),
                expected: expected_value,
                actual,
                delta,
            });
        };

        if let Some(tick_count) = expected.tick_count {
            if final_state.tick_count != tick_count {
                push_diff("tickCount", tick_count as f64, final_state.tick_count as f64);
            }
        }
        for (field, expected_value, actual) in [
            ("capital", expected.capital, final_state.capital),
            ("totalProfit", expected.total_profit, final_state.total_profit),
            ("totalLosses", expected.total_losses, final_state.total_losses),
        ] {
            if let Some(expected_value) = expected_value {
                if (actual - expected_value).abs() > STATE_TOLERANCE {
                    push_diff(field, expected_value, actual);
                }
            }
        }
        state_differences.is_empty()
    });

    ReplayOutcome {
        final_state,
        ticks_processed,
        actions_executed,
        errors,
        warnings,
        state_match,
        state_differences,
    }
}

/// Full verification: commitment checks plus deterministic replay, folded
/// into one verdict.
pub fn verify_session(record: &SessionRecord) -> VerificationResult {
    let started = Instant::now();

    let commitments = verify_commitments(record);
    let replay = replay_session(record);

    let mut errors = commitments.errors;
    errors.extend(replay.errors);
    let valid = errors.is_empty();

    info!(
        valid,
        errors = errors.len(),
        warnings = replay.warnings.len(),
        ticks = replay.ticks_processed,
        "verification complete"
    );

    VerificationResult {
        valid,
        errors,
        warnings: replay.warnings,
        house_commitment_valid: commitments.house_valid,
        player_commitment_valid: commitments.player_valid,
        seed_combination_valid: commitments.combination_valid,
        replayed_state: replay.final_state,
        ticks_processed: replay.ticks_processed,
        actions_executed: replay.actions_executed,
        state_match: replay.state_match,
        state_differences: replay.state_differences,
        timestamp: Utc::now(),
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satya_engine::hash_seed;
    use satya_models::{Direction, ExpectedFinalState, PlayerAction, SessionConfig};

    fn base_record(seed: u32) -> SessionRecord {
        SessionRecord {
            house_seed: seed,
            house_commit_hash: hash_seed(seed),
            player_seed: None,
            player_commit_hash: None,
            combined_seed: None,
            config: SessionConfig {
                initial_capital: 1000.0,
                initial_price: 100.0,
                initial_house_bankroll: 10_000_000.0,
                tick_rate_ms: 100,
                seed: None,
            },
            action_log: Vec::new(),
            expected_final_state: None,
        }
    }

    fn open_close_log() -> Vec<LoggedAction> {
        vec![
            LoggedAction {
                tick_number: 50,
                action: PlayerAction::ClosePosition,
                timestamp: 2000,
            },
            LoggedAction {
                tick_number: 10,
                action: PlayerAction::OpenPosition {
                    direction: Direction::Long,
                    size_percent: 0.5,
                    leverage: 10.0,
                },
                timestamp: 1000,
            },
        ]
    }

    #[test]
    fn test_empty_log_runs_default_horizon() {
        let outcome = replay_session(&base_record(2863311530));
        assert_eq!(outcome.ticks_processed, DEFAULT_HORIZON_TICKS);
        assert_eq!(outcome.actions_executed, 0);
        assert!(outcome.errors.is_empty());
        assert!(outcome.state_match.is_none());
    }

    #[test]
    fn test_actions_sorted_and_early_exit() {
        let mut record = base_record(2863311530);
        record.action_log = open_close_log();
        let outcome = replay_session(&record);
        assert_eq!(outcome.actions_executed, 2);
        // Early exit: ten ticks past the last action at tick 50.
        assert_eq!(outcome.ticks_processed, 60);
        assert!(outcome.final_state.position.is_none(), "close ran after open");
        assert!(outcome.final_state.capital > 0.0);
        assert_eq!(outcome.final_state.trade_count, 1);
        assert!(
            outcome.warnings.is_empty(),
            "both actions apply cleanly: {:?}",
            outcome.warnings
        );
    }

    #[test]
    fn test_no_effect_action_warns() {
        let mut record = base_record(7);
        record.action_log = vec![LoggedAction {
            tick_number: 3,
            action: PlayerAction::ClosePosition,
            timestamp: 0,
        }];
        let outcome = replay_session(&record);
        assert_eq!(outcome.actions_executed, 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, issue_codes::ACTION_NO_EFFECT);
        assert!(outcome.errors.is_empty(), "no-effect is not fatal");
    }

    #[test]
    fn test_action_beyond_horizon_warns() {
        let mut record = base_record(7);
        record.action_log = vec![LoggedAction {
            tick_number: 500,
            action: PlayerAction::ClosePosition,
            timestamp: 0,
        }];
        record.expected_final_state = Some(ExpectedFinalState {
            tick_count: Some(20),
            ..Default::default()
        });
        let outcome = replay_session(&record);
        assert_eq!(outcome.ticks_processed, 20);
        assert_eq!(outcome.actions_executed, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, issue_codes::ACTION_BEYOND_HORIZON);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut record = base_record(424242);
        record.action_log = open_close_log();
        let first = replay_session(&record);
        let second = replay_session(&record);
        assert_eq!(first.final_state, second.final_state);
        assert_eq!(first.ticks_processed, second.ticks_processed);
    }

    #[test]
    fn test_expected_state_round_trip_matches() {
        let mut record = base_record(2863311530);
        record.action_log = open_close_log();
        let probe = replay_session(&record);

        record.expected_final_state = Some(ExpectedFinalState {
            capital: Some(probe.final_state.capital),
            tick_count: Some(probe.final_state.tick_count),
            total_profit: Some(probe.final_state.total_profit),
            total_losses: Some(probe.final_state.total_losses),
        });
        let outcome = replay_session(&record);
        assert_eq!(outcome.state_match, Some(true));
        assert!(outcome.errors.is_empty());
        assert!(outcome.state_differences.is_empty());
    }

    #[test]
    fn test_wrong_claim_produces_differences() {
        let mut record = base_record(2863311530);
        record.action_log = open_close_log();
        let probe = replay_session(&record);

        record.expected_final_state = Some(ExpectedFinalState {
            capital: Some(probe.final_state.capital + 1.0),
            tick_count: Some(probe.final_state.tick_count),
            total_profit: None,
            total_losses: None,
        });
        let outcome = replay_session(&record);
        assert_eq!(outcome.state_match, Some(false));
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, issue_codes::STATE_MISMATCH);
        assert_eq!(outcome.state_differences.len(), 1);
        assert_eq!(outcome.state_differences[0].field, "capital");
        assert!((outcome.state_differences[0].delta + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_absorbs_tiny_drift() {
        let mut record = base_record(2863311530);
        record.action_log = open_close_log();
        let probe = replay_session(&record);

        record.expected_final_state = Some(ExpectedFinalState {
            capital: Some(probe.final_state.capital + 0.5e-4),
            tick_count: None,
            total_profit: None,
            total_losses: None,
        });
        let outcome = replay_session(&record);
        assert_eq!(outcome.state_match, Some(true));
    }

    #[test]
    fn test_verify_session_aggregates_verdict() {
        let mut record = base_record(2863311530);
        record.action_log = open_close_log();
        let result = verify_session(&record);
        assert!(result.valid);
        assert!(result.house_commitment_valid);
        assert!(result.player_commitment_valid);
        assert!(result.seed_combination_valid);
        assert_eq!(result.actions_executed, 2);
        assert!(result.ticks_processed > 0);

        record.house_commit_hash = "definitely_wrong_hash".to_string();
        let result = verify_session(&record);
        assert!(!result.valid);
        assert!(!result.house_commitment_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_combined_seed_drives_replay() {
        let mut record = base_record(11111);
        record.player_seed = Some(22222);
        record.player_commit_hash = Some(hash_seed(22222));
        record.combined_seed = Some(11111 ^ 22222);
        let combined = replay_session(&record);

        let house_only = replay_session(&base_record(11111));
        assert_ne!(
            combined.final_state.current_price, house_only.final_state.current_price,
            "combined seed must change the trajectory"
        );
    }
}
