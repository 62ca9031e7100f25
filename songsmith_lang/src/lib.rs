// Word-level half of the nonsense song generator.
//
// Learns letter statistics from a corpus and uses them to synthesize
// pronounceable nonsense words, plus the syllable heuristic that the song
// writer keys everything on. No I/O beyond reading the corpus.
//
// Module overview:
// - `letters.rs`:      `LetterFrequencyModel`, per-letter position and
//                      follower tallies, and the ranking queries over them.
// - `syllables.rs`:    `count_syllables`, the vowel-run heuristic.
// - `phonotactics.rs`: the compiled denylist of unpronounceable clusters.
// - `words.rs`:        `WordGenerator` and its `GeneratorConfig`.
// - `pool.rs`:         `generate_pool` for rayon-parallel, seed-stable pools.
// - `error.rs`:        `LangError`.
//
// Randomness always comes from a caller-supplied `songsmith_prng::SongRng`.

pub mod error;
pub mod letters;
pub mod phonotactics;
pub mod pool;
pub mod syllables;
pub mod words;

pub use error::LangError;
pub use letters::{LetterFrequencyModel, LetterStats};
pub use pool::generate_pool;
pub use syllables::count_syllables;
pub use words::{GeneratorConfig, MAX_WORD_LENGTH, WordGenerator};
