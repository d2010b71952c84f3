/// Source of inclusive-range random integers, the only randomness the core
/// consumes (weather respawns and drift).
pub trait RandomSource {
    /// Uniform integer in `[min, max]`.
    fn int_range(&mut self, min: i32, max: i32) -> i32;
}

/// Mulberry32: small deterministic 32-bit PRNG.
/// Pure function: returns (value_in_0_1, next_state).
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Returns a random integer in [min, max] inclusive.
pub fn prng_int_range(state: u32, min: i32, max: i32) -> (i32, u32) {
    let (value, next_state) = prng_next(state);
    let range = (max as i64 - min as i64 + 1) as f64;
    (min + (value * range).floor() as i32, next_state)
}

/// Seeded Mulberry32 stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for Mulberry32 {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let (v, next) = prng_int_range(self.state, min, max);
        self.state = next;
        v
    }
}
