//! # Report Rendering
//!
//! Human-readable rendering of a [`VerificationResult`]. The JSON form is
//! plain serde; this module owns the text form the CLI prints.

use chrono::Utc;
use satya_models::VerificationResult;
use std::fmt::Write;

/// Unique id for one verifier run, used to name report artifacts.
///
/// Shape: `verify-<compact UTC stamp>-<12 hex>`, e.g.
/// `verify-20260802T143000Z-1f2e3d4c5b6a`. The stamp keeps sibling reports
/// sortable by wall clock; the entropy keeps concurrent runs from
/// colliding.
pub fn generate_run_id() -> String {
    let entropy = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "verify-{}-{}",
        Utc::now().format("%Y%m%dT%H%M%SZ"),
        &entropy[..12]
    )
}

fn flag(ok: bool) -> &'static str {
    if ok { "PASS" } else { "FAIL" }
}

/// Render the text report.
pub fn render_text_report(result: &VerificationResult) -> String {
    let mut out = String::with_capacity(1024);

    let verdict = if result.valid { "VALID" } else { "INVALID" };
    let _ = writeln!(out, "=== Session Verification: {verdict} ===");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commitments");
    let _ = writeln!(out, "  house commitment     {}", flag(result.house_commitment_valid));
    let _ = writeln!(out, "  player commitment    {}", flag(result.player_commitment_valid));
    let _ = writeln!(out, "  seed combination     {}", flag(result.seed_combination_valid));
    let _ = writeln!(out);
    let _ = writeln!(out, "Replay");
    let _ = writeln!(out, "  ticks processed      {}", result.ticks_processed);
    let _ = writeln!(out, "  actions executed     {}", result.actions_executed);
    let _ = writeln!(out, "  final capital        {:.4}", result.replayed_state.capital);
    let _ = writeln!(out, "  final price          {:.4}", result.replayed_state.current_price);
    let _ = writeln!(out, "  total profit         {:.4}", result.replayed_state.total_profit);
    let _ = writeln!(out, "  total losses         {:.4}", result.replayed_state.total_losses);
    let _ = writeln!(out, "  house bankroll       {:.4}", result.replayed_state.house_bankroll);
    if let Some(matched) = result.state_match {
        let _ = writeln!(out, "  claimed final state  {}", flag(matched));
    }

    if !result.state_differences.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "State differences");
        for diff in &result.state_differences {
            let _ = writeln!(
                out,
                "  {:<14} claimed {:>16.6}  replayed {:>16.6}  delta {:+e}",
                diff.field, diff.expected, diff.actual, diff.delta
            );
        }
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors ({})", result.errors.len());
        for issue in &result.errors {
            let _ = writeln!(out, "  [{}] {}", issue.code, issue.message);
        }
    }
    if !result.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Warnings ({})", result.warnings.len());
        for issue in &result.warnings {
            let _ = writeln!(out, "  [{}] {}", issue.code, issue.message);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "verified at {} in {} ms",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        result.duration_ms
    );
    out
}
