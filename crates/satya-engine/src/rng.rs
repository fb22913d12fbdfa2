//! # Mulberry32
//!
//! The protocol's seeded generator: 32 bits of state, uniform doubles in
//! [0, 1). Exact 32-bit semantics are contractual: every shift, wrap and
//! low-32 multiply below is part of the wire format, and any deviation
//! desynchronizes the replayed price stream from the operator's.

/// Seeded 32-bit generator.
///
/// Not thread-safe and not meant to be: each price layer owns its own
/// instance and streams are never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// A zero seed is mapped to 1 so the stream cannot stick at the fixed
    /// point of the mixer.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next uniform double in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }

    /// Uniform double in [a, b).
    pub fn range(&mut self, a: f64, b: f64) -> f64 {
        a + self.next() * (b - a)
    }

    /// Bernoulli draw with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}
