//! Shared random number generation utilities.
//!
//! Three sources of reproducible randomness live here:
//!
//! - [`Rng`]: a fast LCG for scene-level choices (which pattern, how fast
//!   it spawns, how long it holds).
//! - [`XorShift32`]: the truchet subdivision stream. Its recurrence is part
//!   of the output contract, so it must never change.
//! - [`hash3`]: a stateless integer mix keyed by position, used for per-unit
//!   style so identical positions and seeds always look identical.

/// A fast, deterministic pseudo-random number generator.
///
/// Uses a Linear Congruential Generator (LCG) with parameters from
/// Numerical Recipes for good statistical properties while being
/// extremely fast.
///
/// # Example
/// ```
/// use girih::rng::Rng;
///
/// let mut rng = Rng::new(12345);
/// let value = rng.next_f64(); // Returns value in [0, 1)
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// Get the next raw u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Get the next u32 from the high bits.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Get a random f64 in the range [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random f64 in the range [min, max).
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Get a random integer in the inclusive range [min, max].
    #[inline]
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_index((max - min + 1) as usize) as u32
    }

    /// Get a random index in the range [0, len).
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_f64() * len as f64) as usize
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Stand-in state for seed 0, which is a fixed point of xorshift.
const XORSHIFT_ZERO_SEED: u32 = 0x9E37_79B9;

/// 32-bit xorshift with shifts 13/17/5.
///
/// The exact recurrence (`x ^= x << 13; x ^= x >> 17; x ^= x << 5`) is what
/// makes a truchet seed reproduce the same layout everywhere.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { XORSHIFT_ZERO_SEED } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

// Multiplicative constants for hash3's fold and finaliser.
const HASH_MUL_X: u32 = 0x8DA6_B343;
const HASH_MUL_Y: u32 = 0xD816_3841;
const HASH_MIX: u32 = 0x5BD1_E995;

/// Deterministic position hash in [0, 1).
///
/// `x` and `y` are folded with two multiplicative constants via XOR, the
/// seed is XORed in, then a multiply/xorshift finaliser spreads the bits.
/// Not a PRNG: the same triple always maps to the same value.
#[inline]
pub fn hash3(x: i32, y: i32, seed: u32) -> f64 {
    let mut h = (x as u32).wrapping_mul(HASH_MUL_X) ^ (y as u32).wrapping_mul(HASH_MUL_Y) ^ seed;
    h ^= h >> 13;
    h = h.wrapping_mul(HASH_MIX);
    h ^= h >> 15;
    h as f64 / 4_294_967_296.0
}
