//! # Satya Engine
//!
//! The deterministic replay core of the provably-fair verifier: commitment
//! primitives, the Mulberry32 generator, the layered stochastic price engine,
//! position math, and the game state-transition engine.
//!
//! ## Determinism contract
//!
//! A third party must independently arrive at the exact floating-point
//! trajectory the operator produced. Everything here is written against that
//! contract:
//!
//! - all integer mixing is explicit wrapping 32-bit arithmetic;
//! - every random draw happens in a fixed, documented order;
//! - the five price-layer streams and the turbo stream are derived from the
//!   master seed by label and never interleaved;
//! - arithmetic is plain IEEE-754 double in source order (no FMA
//!   contraction, no reassociation).
//!
//! Nothing in this crate performs I/O or holds state beyond an engine value;
//! engines for disjoint sessions can run on any threads the caller likes.
//!
//! ## Usage
//! ```ignore
//! use satya_engine::{GameEngine, combine_seeds};
//! use satya_models::PlayerAction;
//!
//! let seed = combine_seeds(house_seed, player_seed);
//! let mut engine = GameEngine::new(&config, seed);
//! engine.execute_action(&PlayerAction::ClosePosition);
//! engine.process_tick();
//! let state = engine.snapshot();
//! ```

pub mod commit;
pub mod constants;
pub mod game;
pub mod layers;
pub mod position;
pub mod rng;

pub use commit::{combine_seeds, derive_sub_seed, hash_seed, verify_commitment};
pub use game::GameEngine;
pub use layers::{LayerConfig, LayeredPriceEngine};
pub use rng::Mulberry32;
