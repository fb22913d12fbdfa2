//! # Position Math
//!
//! Pure functions over leveraged positions. The game engine calls these on
//! every tick and every action; the analytics trio at the bottom exists for
//! reports and is never consulted by verification verdicts.

use satya_models::Direction;

/// Leveraged P&L of a position segment at the current price.
///
/// `size` is equity collateral, not notional: the return on entry price is
/// scaled by leverage and the direction sign.
pub fn leveraged_pnl(
    entry_price: f64,
    current_price: f64,
    direction: Direction,
    size: f64,
    leverage: f64,
) -> f64 {
    size * ((current_price - entry_price) / entry_price) * direction.sign() * leverage
}

/// Remaining equity after P&L and accrued funding.
pub fn equity(size: f64, pnl: f64, cumulative_funding: f64) -> f64 {
    size + pnl - cumulative_funding
}

/// A position is liquidated when its equity is exhausted.
pub fn is_liquidated(equity: f64) -> bool {
    equity <= 0.0
}

/// Price at which the segment's equity reaches zero, given funding accrued
/// so far. Solves `size + pnl(p) - funding = 0` for `p`.
pub fn dynamic_liquidation_price(
    entry_price: f64,
    direction: Direction,
    size: f64,
    leverage: f64,
    cumulative_funding: f64,
) -> f64 {
    let loss_capacity = (size - cumulative_funding) / size;
    entry_price * (1.0 - direction.sign() * loss_capacity / leverage)
}

/// Current notional exposure over current equity. Grows as the position
/// moves against the holder.
pub fn effective_leverage(
    entry_price: f64,
    current_price: f64,
    direction: Direction,
    size: f64,
    leverage: f64,
    cumulative_funding: f64,
) -> f64 {
    let units = size * leverage / entry_price;
    let pnl = leveraged_pnl(entry_price, current_price, direction, size, leverage);
    let eq = equity(size, pnl, cumulative_funding);
    if eq <= 0.0 {
        f64::INFINITY
    } else {
        units * current_price / eq
    }
}

/// Price at which the segment's P&L exactly covers accrued funding. Solves
/// `pnl(p) = funding` for `p`.
pub fn breakeven_price(
    entry_price: f64,
    direction: Direction,
    size: f64,
    leverage: f64,
    cumulative_funding: f64,
) -> f64 {
    entry_price * (1.0 + direction.sign() * cumulative_funding / (size * leverage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_pnl_tracks_price() {
        // 100 -> 110 at 10x on 50 collateral: +10% * 10 * 50 = 50.
        let pnl = leveraged_pnl(100.0, 110.0, Direction::Long, 50.0, 10.0);
        assert!((pnl - 50.0).abs() < 1e-12);
        // Short side is the mirror image.
        let pnl = leveraged_pnl(100.0, 110.0, Direction::Short, 50.0, 10.0);
        assert!((pnl + 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_equity_and_liquidation() {
        let pnl = leveraged_pnl(100.0, 91.0, Direction::Long, 50.0, 10.0);
        let eq = equity(50.0, pnl, 0.0);
        assert!(eq > 0.0);
        assert!(!is_liquidated(eq));

        // A 10% adverse move wipes a 10x position exactly.
        let pnl = leveraged_pnl(100.0, 90.0, Direction::Long, 50.0, 10.0);
        let eq = equity(50.0, pnl, 0.0);
        assert!(is_liquidated(eq));
    }

    #[test]
    fn test_funding_tightens_liquidation() {
        // With funding accrued, liquidation arrives before the full move.
        let pnl = leveraged_pnl(100.0, 90.5, Direction::Long, 50.0, 10.0);
        assert!(!is_liquidated(equity(50.0, pnl, 0.0)));
        assert!(is_liquidated(equity(50.0, pnl, 3.0)));
    }

    #[test]
    fn test_dynamic_liquidation_price_solves_equity_zero() {
        let entry = 100.0;
        let (size, lev, funding) = (50.0, 10.0, 2.0);
        for direction in [Direction::Long, Direction::Short] {
            let p = dynamic_liquidation_price(entry, direction, size, lev, funding);
            let pnl = leveraged_pnl(entry, p, direction, size, lev);
            assert!(
                equity(size, pnl, funding).abs() < 1e-9,
                "equity at the liquidation price must be zero"
            );
        }
    }

    #[test]
    fn test_breakeven_price_covers_funding() {
        let entry = 100.0;
        let (size, lev, funding) = (50.0, 10.0, 1.5);
        for direction in [Direction::Long, Direction::Short] {
            let p = breakeven_price(entry, direction, size, lev, funding);
            let pnl = leveraged_pnl(entry, p, direction, size, lev);
            assert!((pnl - funding).abs() < 1e-9);
        }
    }

    #[test]
    fn test_effective_leverage_at_entry_equals_nominal() {
        let lev = effective_leverage(100.0, 100.0, Direction::Long, 50.0, 10.0, 0.0);
        assert!((lev - 10.0).abs() < 1e-12);
        // Adverse move raises it; exhausted equity pins it to infinity.
        let worse = effective_leverage(100.0, 95.0, Direction::Long, 50.0, 10.0, 0.0);
        assert!(worse > 10.0);
        let dead = effective_leverage(100.0, 90.0, Direction::Long, 50.0, 10.0, 0.0);
        assert!(dead.is_infinite());
    }
}
