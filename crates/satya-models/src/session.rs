//! # Session State Model
//!
//! The replayable game state and its constituents. These are plain value
//! types: the game engine owns the single mutable `GameState` per session and
//! hands out clones, so nothing here carries behavior beyond small accessors.
//!
//! All monetary fields are IEEE-754 doubles; replay fidelity depends on the
//! engine touching them in contractual order, not on the types themselves.

use serde::{Deserialize, Serialize};

/// Session configuration as published by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub initial_capital: f64,
    pub initial_price: f64,
    pub initial_house_bankroll: f64,
    /// Wall-clock tick rate. Stored for completeness; the replay core is
    /// tick-indexed and never consults it.
    pub tick_rate_ms: u64,
    /// Master seed. Always present in verification inputs; a live engine
    /// picks its own when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Position side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Sign convention used by the P&L formulas: +1 long, -1 short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// Option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionDirection {
    Call,
    Put,
}

/// A leveraged position. Created by `openPosition`, mutated by per-tick
/// funding accrual and the re-equity actions, destroyed by `closePosition`
/// or liquidation.
///
/// A position is segmented: `relever` and `addEquity` close the current
/// segment (realizing its P&L and funding) and open a new one at the current
/// price. `entry_price`, `size`, `leverage`, `cumulative_funding` and
/// `capital_allocated` describe the live segment; `original_entry_price`,
/// `total_capital_invested`, `accumulated_pnl`, `total_funding_paid` and
/// `open_tick` span the position's whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    /// Equity collateral of the live segment. Strictly positive while held.
    pub size: f64,
    pub leverage: f64,
    /// Funding accrued on the live segment, not yet realized to the house.
    pub cumulative_funding: f64,
    pub capital_allocated: f64,
    /// Lifetime sum of player capital committed across re-equity operations.
    pub total_capital_invested: f64,
    /// P&L locked in by completed relever / add-equity segments.
    pub accumulated_pnl: f64,
    pub original_entry_price: f64,
    pub total_funding_paid: f64,
    pub open_tick: u64,
}

impl Position {
    /// Notional exposure of the live segment.
    pub fn notional(&self) -> f64 {
        self.size * self.leverage
    }
}

/// A binary option settling at expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    pub direction: OptionDirection,
    pub strike_price: f64,
    /// Spot price at purchase time.
    pub purchase_price: f64,
    pub premium: f64,
    pub multiplier: u32,
    /// Ticks until expiry. > 0 while live; the contract is settled and
    /// removed on the tick this reaches zero.
    pub ticks_remaining: u32,
    pub total_ticks: u32,
}

impl OptionContract {
    /// In-the-money predicate at the given price: calls pay at or above the
    /// strike, puts at or below.
    pub fn is_itm(&self, price: f64) -> bool {
        match self.direction {
            OptionDirection::Call => price >= self.strike_price,
            OptionDirection::Put => price <= self.strike_price,
        }
    }

    pub fn payout(&self) -> f64 {
        self.premium * self.multiplier as f64
    }
}

/// Player-visible mirror of an active turbo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTurbo {
    pub active: bool,
    pub ticks_remaining: u32,
    /// +1 pumps the price, -1 dumps it.
    pub direction: i8,
    pub start_price: f64,
}

/// Entire RNG-derived state of price generation.
///
/// The price engine reads one of these and returns the next; the game state
/// embeds the latest so a replayed session can be compared structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeredState {
    pub price: f64,
    pub tick: u64,
    pub mean_price: f64,
    pub momentum: f64,
    /// Sign of the previous tick's move: -1, 0 (before the first tick), +1.
    pub last_sign: f64,
    pub in_volatility_spike: bool,
    pub turbo_active: bool,
    pub turbo_ticks_remaining: u32,
    /// +1 / -1 while a turbo runs or after one ran; 0 before the first turbo.
    pub turbo_direction: i8,
}

impl LayeredState {
    /// Fresh state anchored at the initial price.
    pub fn initial(initial_price: f64) -> Self {
        Self {
            price: initial_price,
            tick: 0,
            mean_price: initial_price,
            momentum: 0.0,
            last_sign: 0.0,
            in_volatility_spike: false,
            turbo_active: false,
            turbo_ticks_remaining: 0,
            turbo_direction: 0,
        }
    }
}

/// Full session state owned by the game engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Player capital. Clamped at zero, never negative.
    pub capital: f64,
    pub current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Live option contracts in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_turbo: Option<SimpleTurbo>,
    /// Scoring currency earned from house edge and losses; pays for shields
    /// and turbos.
    pub turbo_points: f64,
    pub house_bankroll: f64,
    pub shield_ticks_remaining: u32,
    pub layered_state: LayeredState,
    pub tick_count: u64,
    pub total_profit: f64,
    pub total_losses: f64,
    pub total_volume_traded: f64,
    pub liquidation_count: u32,
    pub trade_count: u32,
}

impl GameState {
    /// Initial state for a session, before any tick has run.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            capital: config.initial_capital,
            current_price: config.initial_price,
            position: None,
            options: Vec::new(),
            simple_turbo: None,
            turbo_points: 0.0,
            house_bankroll: config.initial_house_bankroll,
            shield_ticks_remaining: 0,
            layered_state: LayeredState::initial(config.initial_price),
            tick_count: 0,
            total_profit: 0.0,
            total_losses: 0.0,
            total_volume_traded: 0.0,
            liquidation_count: 0,
            trade_count: 0,
        }
    }
}
