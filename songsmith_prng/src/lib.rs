// Seedable pseudo-random source for the songsmith workspace.
//
// xoshiro256++ (Blackman & Vigna, 2019) expanded from a `u64` seed with
// SplitMix64. Every random decision in `songsmith_lang` (word synthesis) and
// `songsmith_song` (rhyme assignment, line filling) draws from a `SongRng`
// owned by the caller and passed down as `&mut SongRng`. Nothing in the
// workspace touches a process-global generator, so tests pin a seed and get
// the same words and songs on every run and platform.
//
// `SongRng::for_stream` derives independent generators from one base seed,
// which is how the parallel pool generator and the service's worker threads
// get per-item / per-thread streams without sharing mutable state.

/// xoshiro256++ generator. Cheap to clone; clones continue the same stream.
#[derive(Clone, Debug)]
pub struct SongRng {
    s: [u64; 4],
}

impl SongRng {
    /// Create a generator from a `u64` seed.
    ///
    /// Two generators built from the same seed yield identical sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create the generator for sub-stream `stream` of `seed`.
    ///
    /// The stream index is mixed through SplitMix64 before combining so that
    /// neighbouring indices do not produce correlated states.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut sm = stream;
        Self::new(seed ^ splitmix64(&mut sm))
    }

    /// Seed from the system clock, for runs where reproducibility is not wanted.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform integer in `[low, high]`, valid up to `high == u64::MAX`.
    ///
    /// Panics if `low > high`.
    pub fn range_u64_inclusive(&mut self, low: u64, high: u64) -> u64 {
        assert!(low <= high, "range_u64_inclusive: low must be <= high");
        match high.checked_add(1) {
            Some(end) => self.range_u64(low, end),
            None if low == 0 => self.next_u64(),
            // Shift the range down by one so its exclusive end fits.
            None => self.range_u64(low - 1, u64::MAX) + 1,
        }
    }

    /// Uniform `usize` in `[low, high]`. Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "range_usize_inclusive: low must be <= high");
        self.range_u64_inclusive(low as u64, high as u64) as usize
    }

    /// Uniform `u32` in `[low, high]`. Panics if `low > high`.
    pub fn range_u32_inclusive(&mut self, low: u32, high: u32) -> u32 {
        assert!(low <= high, "range_u32_inclusive: low must be <= high");
        self.range_u64_inclusive(u64::from(low), u64::from(high)) as u32
    }

    /// Pick one element uniformly at random. `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range_usize(0, items.len());
        items.get(idx)
    }
}

/// SplitMix64 step, used only to expand seeds.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
