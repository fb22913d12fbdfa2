//! # Protocol Constants
//!
//! Fixed parameters of the game protocol. These are part of the wire
//! contract: a verifier and an operator disagreeing on any value here will
//! disagree on the replayed trajectory.

/// Entry spread charged on notional at open / relever.
pub const SPREAD_RATE: f64 = 0.005;

/// Funding cost per hour on leveraged notional.
pub const FUNDING_RATE_PER_HOUR: f64 = 0.10;
/// Simulation ticks per hour (10 ticks/s).
pub const TICKS_PER_HOUR: u64 = 36_000;
/// Funding accrued per tick: `size * leverage * FUNDING_RATE_PER_TICK`.
pub const FUNDING_RATE_PER_TICK: f64 = FUNDING_RATE_PER_HOUR / TICKS_PER_HOUR as f64;

/// Option durations are quoted in seconds and converted with this.
pub const TICKS_PER_SECOND: u32 = 10;

/// Turbo activation cost as a fraction of position notional, paid in turbo
/// points.
pub const SIMPLE_TURBO_COST_RATE: f64 = 0.01;
/// Ticks a turbo run lasts.
pub const TURBO_DURATION_TICKS: u32 = 10;
/// Total price move over a full turbo run (up-direction).
pub const TURBO_TOTAL_MOVE_UP: f64 = 1.10;
/// Total price move over a full turbo run (down-direction).
pub const TURBO_TOTAL_MOVE_DOWN: f64 = 0.90;

/// Shield cost as a fraction of position notional, paid in turbo points.
pub const SHIELD_FLAT_RATE: f64 = 0.0066;
/// Shield ticks granted per purchase.
pub const SHIELD_TICKS_PER_BUY: u32 = 10;

/// Turbo points granted per unit of newly realized loss.
pub const TURBO_LOSS_PREMIUM: f64 = 0.02;

/// House edge taken on option premiums.
pub const OPTION_EDGE_RATE: f64 = 0.02;

/// Fraction of house edge returned to the player as turbo points.
pub const EDGE_EARN_RATE: f64 = 0.20;
/// Fraction of losses returned as turbo points (same figure as
/// [`TURBO_LOSS_PREMIUM`], kept under the name the house-edge schedule uses).
pub const LOSS_EARN_RATE: f64 = 0.02;

/// Strike distance in percent for a binary option, keyed by
/// `(duration_seconds, multiplier)`.
///
/// The table is part of the protocol; pairs outside it are not purchasable
/// and the engine treats such a request as a no-op.
pub fn strike_distance_pct(duration_seconds: u32, multiplier: u32) -> Option<f64> {
    let row: &[(u32, f64)] = match duration_seconds {
        1 => &[
            (2, 0.020),
            (5, 0.694),
            (10, 1.052),
            (25, 1.422),
            (100, 1.880),
        ],
        5 => &[
            (2, 0.059),
            (5, 2.338),
            (10, 3.535),
            (25, 4.791),
            (100, 6.351),
        ],
        30 => &[
            (2, 0.213),
            (5, 6.446),
            (10, 9.705),
            (25, 13.243),
            (100, 17.644),
        ],
        60 => &[
            (2, 0.253),
            (5, 9.191),
            (10, 13.828),
            (25, 18.823),
            (100, 25.346),
        ],
        300 => &[
            (2, 0.587),
            (5, 20.263),
            (10, 30.162),
            (25, 41.016),
            (100, 59.495),
        ],
        _ => return None,
    };
    row.iter()
        .find(|(m, _)| *m == multiplier)
        .map(|(_, pct)| *pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funding_rate_is_hourly_rate_over_ticks() {
        assert_eq!(FUNDING_RATE_PER_TICK, 0.10 / 36_000.0);
    }

    #[test]
    fn test_strike_table_known_pairs() {
        assert_eq!(strike_distance_pct(1, 2), Some(0.020));
        assert_eq!(strike_distance_pct(30, 10), Some(9.705));
        assert_eq!(strike_distance_pct(300, 100), Some(59.495));
    }

    #[test]
    fn test_strike_table_unknown_pairs() {
        assert_eq!(strike_distance_pct(2, 2), None, "unlisted duration");
        assert_eq!(strike_distance_pct(30, 3), None, "unlisted multiplier");
    }
}
