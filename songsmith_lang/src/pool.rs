// Parallel word pool generation.
//
// A song session draws on a pool of tens of thousands of generated words.
// Each word `i` is generated with its own `SongRng::for_stream(seed, i)`, so
// the pool for a given seed is the same no matter how rayon splits the work.

use log::info;
use rayon::prelude::*;
use songsmith_prng::SongRng;

use crate::error::LangError;
use crate::words::WordGenerator;

/// Generate `size` words, in index order. Fails if any single word stagnates.
pub fn generate_pool(
    generator: &WordGenerator,
    size: usize,
    seed: u64,
) -> Result<Vec<String>, LangError> {
    let started = std::time::Instant::now();
    let pool = (0..size)
        .into_par_iter()
        .map(|i| {
            let mut rng = SongRng::for_stream(seed, i as u64);
            generator.generate_word(&mut rng)
        })
        .collect::<Result<Vec<String>, LangError>>()?;
    info!(
        "generated a pool of {} words in {:.2?}",
        pool.len(),
        started.elapsed()
    );
    Ok(pool)
}
