//! # Layered Price Engine
//!
//! Five independently seeded Mulberry32 streams composed into a single price
//! series: sign, magnitude, volatility, momentum, and turbo. Each stream is
//! derived from the master seed by label, so the whole trajectory is a pure
//! function of that one seed.
//!
//! ## Draw discipline
//!
//! The per-tick draw order is contractual and fixed: sign, magnitude, one
//! volatility gate draw (plus one spike-size draw only inside a spike),
//! momentum noise. A turbo-overridden tick consumes no draws at all, and the
//! turbo stream advances only on activation, so player choices can never
//! perturb the background price stream.

use crate::commit::derive_sub_seed;
use crate::constants::{TURBO_DURATION_TICKS, TURBO_TOTAL_MOVE_DOWN, TURBO_TOTAL_MOVE_UP};
use crate::rng::Mulberry32;
use satya_models::LayeredState;

/// Shape parameters for the layered generator. Immutable per session.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Probability a tick's base move points up.
    pub sign_bias: f64,
    pub base_magnitude_min: f64,
    pub base_magnitude_max: f64,
    /// Volatility multiplier outside spikes.
    pub volatility_base: f64,
    /// Per-tick probability of entering a one-tick volatility spike.
    pub spike_probability: f64,
    pub spike_min: f64,
    pub spike_max: f64,
    pub momentum_strength: f64,
    pub momentum_decay: f64,
    pub reversion_strength: f64,
    /// Half-life of the moving mean, in ticks.
    pub reversion_half_life: f64,
    /// Constant per-tick drift applied to every delta.
    pub drift_correction: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            sign_bias: 0.5,
            base_magnitude_min: 0.0005,
            base_magnitude_max: 0.0025,
            volatility_base: 1.0,
            spike_probability: 0.02,
            spike_min: 2.0,
            spike_max: 4.0,
            momentum_strength: 0.15,
            momentum_decay: 0.92,
            reversion_strength: 0.03,
            reversion_half_life: 500.0,
            drift_correction: -0.000008,
        }
    }
}

/// The composed generator. Owns the five streams; state travels separately
/// as a [`LayeredState`] value so replays can snapshot and compare it.
#[derive(Debug, Clone)]
pub struct LayeredPriceEngine {
    config: LayerConfig,
    sign_rng: Mulberry32,
    magnitude_rng: Mulberry32,
    volatility_rng: Mulberry32,
    momentum_rng: Mulberry32,
    turbo_rng: Mulberry32,
}

impl LayeredPriceEngine {
    pub fn new(master_seed: u32, config: LayerConfig) -> Self {
        Self {
            config,
            sign_rng: Mulberry32::new(derive_sub_seed(master_seed, "sign")),
            magnitude_rng: Mulberry32::new(derive_sub_seed(master_seed, "magnitude")),
            volatility_rng: Mulberry32::new(derive_sub_seed(master_seed, "volatility")),
            momentum_rng: Mulberry32::new(derive_sub_seed(master_seed, "momentum")),
            turbo_rng: Mulberry32::new(derive_sub_seed(master_seed, "turbo")),
        }
    }

    pub fn with_default_config(master_seed: u32) -> Self {
        Self::new(master_seed, LayerConfig::default())
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Advance one tick.
    ///
    /// A turbo-overridden tick multiplies the price deterministically and
    /// consumes no randomness; a normal tick consumes draws in the fixed
    /// order documented at module level.
    pub fn next_tick(&mut self, state: &LayeredState) -> LayeredState {
        if state.turbo_active && state.turbo_ticks_remaining > 0 {
            return self.turbo_tick(state);
        }

        let cfg = &self.config;

        // 1: direction
        let sign_roll = self.sign_rng.next();
        let sign = if sign_roll < cfg.sign_bias { 1.0 } else { -1.0 };

        // 2: base move size
        let base_magnitude = self
            .magnitude_rng
            .range(cfg.base_magnitude_min, cfg.base_magnitude_max);

        // 3: volatility gate, then spike size only while spiking
        let mut in_spike = state.in_volatility_spike;
        if !in_spike && self.volatility_rng.chance(cfg.spike_probability) {
            in_spike = true;
        }
        let volatility_multiplier = if in_spike {
            self.volatility_rng.range(cfg.spike_min, cfg.spike_max)
        } else {
            cfg.volatility_base
        };

        // 4-5: momentum carries the previous sign forward with noise
        let momentum_noise = (self.momentum_rng.next() - 0.5) * 0.1;
        let new_momentum =
            state.momentum * cfg.momentum_decay + state.last_sign * cfg.momentum_strength + momentum_noise;

        // 6-8: contributions
        let momentum_contribution = new_momentum * base_magnitude;
        let deviation = (state.price - state.mean_price) / state.mean_price;
        let reversion_contribution = -deviation * cfg.reversion_strength * base_magnitude;
        let signed_move = sign * base_magnitude * volatility_multiplier;

        // 9-11: compose, floor, roll the mean
        let total_delta =
            signed_move + momentum_contribution + reversion_contribution + cfg.drift_correction;
        let new_price = (state.price * (1.0 + total_delta)).max(0.01);
        let mean_alpha = 1.0 / cfg.reversion_half_life;
        let new_mean = state.mean_price * (1.0 - mean_alpha) + new_price * mean_alpha;

        LayeredState {
            price: new_price,
            tick: state.tick + 1,
            mean_price: new_mean,
            momentum: new_momentum,
            last_sign: sign,
            in_volatility_spike: false,
            turbo_active: state.turbo_active,
            turbo_ticks_remaining: state.turbo_ticks_remaining,
            turbo_direction: state.turbo_direction,
        }
    }

    /// Turbo override: a fixed per-tick multiplier compounding to the total
    /// move over the run. Everything except price and the turbo counters is
    /// untouched.
    fn turbo_tick(&mut self, state: &LayeredState) -> LayeredState {
        let per_tick_multiplier = if state.turbo_direction > 0 {
            TURBO_TOTAL_MOVE_UP.powf(1.0 / TURBO_DURATION_TICKS as f64)
        } else {
            TURBO_TOTAL_MOVE_DOWN.powf(1.0 / TURBO_DURATION_TICKS as f64)
        };
        let remaining = state.turbo_ticks_remaining - 1;
        LayeredState {
            price: state.price * per_tick_multiplier,
            turbo_ticks_remaining: remaining,
            turbo_active: remaining > 0,
            ..state.clone()
        }
    }

    /// Arm a turbo run. Draws exactly one value from the turbo stream for
    /// the direction; the price is untouched until the next tick.
    pub fn start_turbo(&mut self, state: &LayeredState) -> LayeredState {
        let direction: i8 = if self.turbo_rng.next() < 0.5 { 1 } else { -1 };
        LayeredState {
            turbo_active: true,
            turbo_ticks_remaining: TURBO_DURATION_TICKS,
            turbo_direction: direction,
            ..state.clone()
        }
    }
}
