//! # Game Engine
//!
//! Owns the full session state and the layered price engine, and applies the
//! two kinds of transition the protocol knows: one tick of
//! price + funding + option expiry + liquidation, and discrete player
//! actions.
//!
//! ## Ordering contract
//!
//! `process_tick` runs its seven phases in a fixed order (tick counter,
//! price, turbo mirror, shield hygiene, liquidation/funding, option expiry,
//! settlement) and `execute_action` mutates state only after every
//! precondition passed. Replay fidelity depends on this ordering as much as
//! on the RNG streams, so none of it is configurable.
//!
//! Actions that fail a precondition leave the state untouched and return
//! `false`; the replay orchestrator surfaces those as warnings rather than
//! failing the session.

use crate::constants::{
    EDGE_EARN_RATE, FUNDING_RATE_PER_TICK, OPTION_EDGE_RATE, SHIELD_FLAT_RATE,
    SHIELD_TICKS_PER_BUY, SIMPLE_TURBO_COST_RATE, SPREAD_RATE, TICKS_PER_SECOND,
    TURBO_LOSS_PREMIUM, strike_distance_pct,
};
use crate::layers::LayeredPriceEngine;
use crate::position::{equity, is_liquidated, leveraged_pnl};
use satya_models::{
    Direction, GameState, OptionContract, OptionDirection, PlayerAction, Position, SessionConfig,
    SimpleTurbo,
};
use tracing::debug;

/// One session's state-transition engine.
///
/// The engine exclusively owns its `GameState`; callers read through
/// [`GameEngine::state`] or take a [`GameEngine::snapshot`]. Two engines
/// built from the same config and seed produce identical trajectories under
/// identical action schedules.
pub struct GameEngine {
    state: GameState,
    price: LayeredPriceEngine,
}

impl GameEngine {
    /// Engine with an explicit master seed. Verification always uses this.
    pub fn new(config: &SessionConfig, seed: u32) -> Self {
        Self {
            state: GameState::from_config(config),
            price: LayeredPriceEngine::with_default_config(seed),
        }
    }

    /// Engine seeded from the config, falling back to a random seed when the
    /// config omits one. Only live play takes the fallback path.
    pub fn from_config(config: &SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random::<u32>);
        Self::new(config, seed)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Advance the session by one tick.
    pub fn process_tick(&mut self) {
        // 1: tick counter
        self.state.tick_count += 1;

        // 2: price
        let was_turbo = self.state.layered_state.turbo_active;
        let new_layered = self.price.next_tick(&self.state.layered_state);
        let new_price = new_layered.price;

        // 3: turbo mirror follows the layer, cleared on just-ended
        if let Some(turbo) = self.state.simple_turbo.as_mut() {
            turbo.ticks_remaining = new_layered.turbo_ticks_remaining;
            turbo.active = new_layered.turbo_active;
        }
        if was_turbo && !new_layered.turbo_active {
            self.state.simple_turbo = None;
        }

        // 4: a shield cannot outlive its position
        if self.state.position.is_none() {
            self.state.shield_ticks_remaining = 0;
        }

        let mut new_losses = 0.0;

        // 5: liquidation check against the new price, then funding accrual
        // for survivors. Funding is realized to the house only on
        // close/relever/add-equity, never here.
        if let Some(pos) = &self.state.position {
            let pnl = leveraged_pnl(pos.entry_price, new_price, pos.direction, pos.size, pos.leverage);
            let eq = equity(pos.size, pnl, pos.cumulative_funding);
            if is_liquidated(eq) {
                if self.state.shield_ticks_remaining > 0 {
                    self.state.shield_ticks_remaining -= 1;
                    debug!(tick = self.state.tick_count, "shield absorbed a liquidation");
                } else {
                    self.state.house_bankroll += pos.size;
                    new_losses += pos.total_capital_invested;
                    self.state.liquidation_count += 1;
                    debug!(tick = self.state.tick_count, price = new_price, "position liquidated");
                    self.state.position = None;
                }
            }
        }
        if let Some(pos) = self.state.position.as_mut() {
            let funding_cost = pos.size * pos.leverage * FUNDING_RATE_PER_TICK;
            pos.cumulative_funding += funding_cost;
            pos.total_funding_paid += funding_cost;
            self.state.turbo_points += EDGE_EARN_RATE * funding_cost;
        }

        // 6: option expiry at the new price
        let mut options_return = 0.0;
        let mut options_profit = 0.0;
        if !self.state.options.is_empty() {
            let expiring = std::mem::take(&mut self.state.options);
            let mut surviving = Vec::with_capacity(expiring.len());
            for mut opt in expiring {
                opt.ticks_remaining -= 1;
                if opt.ticks_remaining == 0 {
                    if opt.is_itm(new_price) {
                        let payout = opt.payout();
                        options_return += payout;
                        options_profit += payout - opt.premium;
                        self.state.house_bankroll -= payout - opt.premium;
                    } else {
                        self.state.house_bankroll += opt.premium;
                        new_losses += opt.premium;
                    }
                } else {
                    surviving.push(opt);
                }
            }
            self.state.options = surviving;
        }

        // 7: settlement
        self.state.turbo_points += new_losses * TURBO_LOSS_PREMIUM;
        self.state.capital = (self.state.capital + options_return).max(0.0);
        self.state.total_profit += options_profit;
        self.state.total_losses += new_losses;
        self.state.current_price = new_price;
        self.state.layered_state = new_layered;
    }

    /// Apply one player action. Returns `false` when a precondition failed
    /// and the state is unchanged.
    pub fn execute_action(&mut self, action: &PlayerAction) -> bool {
        let applied = match *action {
            PlayerAction::OpenPosition {
                direction,
                size_percent,
                leverage,
            } => self.open_position(direction, size_percent, leverage),
            PlayerAction::ClosePosition => self.close_position(),
            PlayerAction::BuyShield => self.buy_shield(),
            PlayerAction::BuyOption {
                direction,
                premium,
                multiplier,
                duration_seconds,
            } => self.buy_option(direction, premium, multiplier, duration_seconds),
            PlayerAction::TriggerSimpleTurbo => self.trigger_simple_turbo(),
            PlayerAction::Relever { target_leverage } => self.relever(target_leverage),
            PlayerAction::AddEquity { additional_percent } => self.add_equity(additional_percent),
        };
        debug!(
            action = action.name(),
            applied,
            tick = self.state.tick_count,
            "action dispatched"
        );
        applied
    }

    fn open_position(&mut self, direction: Direction, size_percent: f64, leverage: f64) -> bool {
        if self.state.position.is_some() {
            return false;
        }
        let requested_budget = (self.state.capital * size_percent).min(self.state.capital);
        if requested_budget <= 0.0 {
            return false;
        }

        // The spread is charged on notional, so the budget splits into
        // collateral plus spread such that size * (1 + lev * rate) = budget.
        let spread_multiplier = 1.0 + leverage * SPREAD_RATE;
        let size = requested_budget / spread_multiplier;
        let notional = size * leverage;
        let spread_cost = notional * SPREAD_RATE;
        let total_cost = size + spread_cost;

        self.state.capital = (self.state.capital - total_cost).max(0.0);
        self.state.house_bankroll += spread_cost;
        self.state.total_volume_traded += notional;
        self.state.trade_count += 1;
        self.state.turbo_points += EDGE_EARN_RATE * spread_cost;
        self.state.position = Some(Position {
            direction,
            entry_price: self.state.current_price,
            size,
            leverage,
            cumulative_funding: 0.0,
            capital_allocated: size,
            total_capital_invested: total_cost,
            accumulated_pnl: 0.0,
            original_entry_price: self.state.current_price,
            total_funding_paid: 0.0,
            open_tick: self.state.tick_count,
        });
        true
    }

    fn close_position(&mut self) -> bool {
        let Some(pos) = self.state.position.take() else {
            return false;
        };
        let pnl = leveraged_pnl(
            pos.entry_price,
            self.state.current_price,
            pos.direction,
            pos.size,
            pos.leverage,
        );
        let funding = pos.cumulative_funding;

        // Funding and P&L settle against the house in one move; the player
        // gets back whatever equity is left, floored at zero.
        self.state.house_bankroll += funding - pnl;
        let returned = pos.size + pnl - funding;
        let credited = returned.max(0.0);
        let true_pnl = credited - pos.total_capital_invested;
        let new_losses = if true_pnl < 0.0 { -true_pnl } else { 0.0 };

        self.state.capital += credited;
        self.state.total_profit += pnl - funding;
        self.state.total_losses += new_losses;
        self.state.turbo_points += new_losses * TURBO_LOSS_PREMIUM;
        self.state.shield_ticks_remaining = 0;
        true
    }

    fn buy_shield(&mut self) -> bool {
        let Some(pos) = &self.state.position else {
            return false;
        };
        let cost = pos.notional() * SHIELD_FLAT_RATE;
        if self.state.turbo_points < cost {
            return false;
        }
        self.state.turbo_points -= cost;
        self.state.shield_ticks_remaining += SHIELD_TICKS_PER_BUY;
        true
    }

    fn buy_option(
        &mut self,
        direction: OptionDirection,
        premium: f64,
        multiplier: u32,
        duration_seconds: u32,
    ) -> bool {
        if premium <= 0.0 || premium > self.state.capital {
            return false;
        }
        let Some(distance) = strike_distance_pct(duration_seconds, multiplier) else {
            return false;
        };
        let strike_price = match direction {
            OptionDirection::Call => self.state.current_price * (1.0 + distance / 100.0),
            OptionDirection::Put => self.state.current_price * (1.0 - distance / 100.0),
        };

        let edge = premium * OPTION_EDGE_RATE;
        self.state.turbo_points += EDGE_EARN_RATE * edge;
        self.state.capital -= premium;
        self.state.total_volume_traded += premium;

        let total_ticks = duration_seconds * TICKS_PER_SECOND;
        self.state.options.push(OptionContract {
            direction,
            strike_price,
            purchase_price: self.state.current_price,
            premium,
            multiplier,
            ticks_remaining: total_ticks,
            total_ticks,
        });
        true
    }

    fn trigger_simple_turbo(&mut self) -> bool {
        let Some(pos) = &self.state.position else {
            return false;
        };
        if self.state.layered_state.turbo_active {
            return false;
        }
        let cost = pos.notional() * SIMPLE_TURBO_COST_RATE;
        if self.state.turbo_points < cost {
            return false;
        }

        // Draw order matters: the turbo stream advances only once all
        // preconditions held.
        let armed = self.price.start_turbo(&self.state.layered_state);
        self.state.simple_turbo = Some(SimpleTurbo {
            active: true,
            ticks_remaining: armed.turbo_ticks_remaining,
            direction: armed.turbo_direction,
            start_price: self.state.current_price,
        });
        self.state.layered_state = armed;
        self.state.turbo_points -= cost;
        true
    }

    fn relever(&mut self, target_leverage: f64) -> bool {
        let current_price = self.state.current_price;
        let Some(pos) = self.state.position.as_mut() else {
            return false;
        };
        let pnl = leveraged_pnl(pos.entry_price, current_price, pos.direction, pos.size, pos.leverage);
        let funding = pos.cumulative_funding;
        let current_equity = equity(pos.size, pnl, funding);
        if current_equity <= 0.0 {
            return false;
        }
        let new_notional = current_equity * target_leverage;
        let spread_cost = new_notional * SPREAD_RATE;
        let new_size = current_equity - spread_cost;
        if new_size <= 0.0 {
            return false;
        }

        // Close the segment into the position's lifetime totals and reopen
        // at the current price.
        let locked_in_pnl = pnl - funding - spread_cost;
        pos.entry_price = current_price;
        pos.size = new_size;
        pos.leverage = target_leverage;
        pos.cumulative_funding = 0.0;
        pos.capital_allocated = new_size;
        pos.accumulated_pnl += locked_in_pnl;
        pos.total_funding_paid += funding;

        self.state.house_bankroll += spread_cost + funding - pnl;
        self.state.total_volume_traded += new_notional;
        self.state.turbo_points += EDGE_EARN_RATE * spread_cost;
        true
    }

    fn add_equity(&mut self, additional_percent: f64) -> bool {
        let current_price = self.state.current_price;
        let capital = self.state.capital;
        let Some(pos) = self.state.position.as_mut() else {
            return false;
        };
        let pnl = leveraged_pnl(pos.entry_price, current_price, pos.direction, pos.size, pos.leverage);
        let funding = pos.cumulative_funding;
        let current_equity = equity(pos.size, pnl, funding);
        if current_equity <= 0.0 {
            return false;
        }
        let additional_capital = capital * additional_percent;
        if additional_capital <= 0.0 {
            return false;
        }

        // Keep the notional units constant: leverage rescales against the
        // grown equity, floored at 1x.
        let units = pos.size * pos.leverage / pos.entry_price;
        let new_equity = current_equity + additional_capital;
        let new_leverage = (units * current_price / new_equity).max(1.0);

        pos.entry_price = current_price;
        pos.size = new_equity;
        pos.leverage = new_leverage;
        pos.cumulative_funding = 0.0;
        pos.capital_allocated = new_equity;
        pos.total_capital_invested += additional_capital;
        pos.accumulated_pnl += pnl - funding;
        pos.total_funding_paid += funding;

        self.state.house_bankroll += funding - pnl;
        self.state.capital = (capital - additional_capital).max(0.0);
        true
    }
}
