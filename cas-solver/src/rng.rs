use rand::{RngCore, SeedableRng};

// The lags of the additive generator x[n] = x[n - 418] + x[n - 1279] (mod 2^64).
// With at least one odd word in the initial state, the period is 2^63 * (2^1279 - 1).
const SHORT_LAG: usize = 418;
const LONG_LAG: usize = 1279;

/// A 64-bit linear congruential generator, only used to fill the state of
/// [`LaggedFibonacci`] from a single integer seed.
#[derive(Clone, Debug)]
struct LinearCongruential(u64);

impl LinearCongruential {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.0
    }

    // The low bits of an LCG cycle quickly, so each word is stitched together
    // from the high halves of two consecutive states.
    fn next_word(&mut self) -> u64 {
        let hi = self.next() >> 32;
        let lo = self.next() >> 32;
        (hi << 32) | lo
    }
}

/// A seeded, additive lagged-Fibonacci generator.
///
/// The annealer draws every random decision (initial activations, flip counts,
/// flip targets and acceptance rolls) from one of these, so a clearing round is
/// reproducible bit-for-bit from its seed on every platform. Any seed is
/// valid, including zero.
///
/// The generator also implements [`RngCore`] and [`SeedableRng`], so it can
/// drive the distributions of the `rand` ecosystem.
#[derive(Clone)]
pub struct LaggedFibonacci {
    state: Box<[u64]>,
    index: usize,
}

impl LaggedFibonacci {
    /// Create a generator positioned at the start of the stream for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: vec![0; LONG_LAG].into_boxed_slice(),
            index: 0,
        };
        rng.seed(seed);
        rng
    }

    /// Reset the generator to the start of the stream for `seed`.
    pub fn seed(&mut self, seed: u64) {
        let mut lcg = LinearCongruential(seed);
        for word in self.state.iter_mut() {
            *word = lcg.next_word();
        }
        self.state[0] |= 1;
        self.index = 0;
    }

    /// The next raw word of the stream.
    pub fn next_word(&mut self) -> u64 {
        // The ring holds the last LONG_LAG outputs; `index` points at the oldest.
        let lagged = (self.index + LONG_LAG - SHORT_LAG) % LONG_LAG;
        let word = self.state[self.index].wrapping_add(self.state[lagged]);
        self.state[self.index] = word;
        self.index = (self.index + 1) % LONG_LAG;
        word
    }

    /// A uniform draw from [0, 1), using the top 53 bits of one word.
    pub fn next_double(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_word() >> 11) as f64 * SCALE
    }
}

impl std::fmt::Debug for LaggedFibonacci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaggedFibonacci")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Default for LaggedFibonacci {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngCore for LaggedFibonacci {
    fn next_u32(&mut self) -> u32 {
        (self.next_word() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_word()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for LaggedFibonacci {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
