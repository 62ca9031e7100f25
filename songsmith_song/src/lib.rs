// Song half of the nonsense song generator.
//
// Takes a pool of generated words (see `songsmith_lang`) and turns rhyme
// scheme descriptors such as "8a,8a,5b,5b,8a" into lines of nonsense whose
// syllable counts match the scheme and whose final words rhyme where the
// scheme's letters say they should.
//
// Module overview:
// - `scheme.rs`:  `RhymeScheme`, lenient descriptor parsing.
// - `rhyme.rs`:   `PrefixTree` (arena trie) and `RhymeIndex`, which groups
//                 words by shared final syllable.
// - `writer.rs`:  `SongWriter` with lazily built lookup tables and the bounded
//                 composition retry loop.
// - `config.rs`:  `SongsmithConfig`, the JSON configuration shared by the
//                 `songsmith` CLI and the HTTP service.
// - `error.rs`:   `SongError` and `ComposeFailure`.
//
// The `songsmith` binary (`main.rs`) wires all of this to a terminal.

pub mod config;
pub mod error;
pub mod rhyme;
pub mod scheme;
pub mod writer;

pub use config::{ComposeConfig, SongsmithConfig};
pub use error::{ComposeFailure, SongError};
pub use rhyme::{PrefixTree, RhymeIndex};
pub use scheme::{RhymeScheme, SchemeLine};
pub use writer::{RhymeTables, SongWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_lang::{LetterFrequencyModel, WordGenerator, count_syllables, generate_pool};
    use songsmith_prng::SongRng;

    const CORPUS: &str = "\
        It was the best of times, it was the worst of times, it was the age of \
        wisdom, it was the age of foolishness, it was the epoch of belief, it \
        was the epoch of incredulity, it was the season of Light, it was the \
        season of Darkness, it was the spring of hope, it was the winter of \
        despair, we had everything before us, we had nothing before us.";

    #[test]
    fn generated_pool_feeds_the_writer() {
        let config = SongsmithConfig::default();
        let generator = WordGenerator::new(
            LetterFrequencyModel::from_text(CORPUS),
            config.generator.clone(),
        )
        .unwrap();
        let pool = generate_pool(&generator, 3_000, 42).unwrap();
        let writer = config.compose.writer(pool);
        assert!(writer.ensure_built().rhyme_groups.len() >= 2);

        let mut rng = SongRng::new(42);
        let mut composed = 0;
        for _ in 0..20 {
            // A small pool may lack some buckets; only a successful song is checked.
            if let Ok(song) = writer.compose_song("6a,6a,4b", 1, 2, &mut rng) {
                composed += 1;
                assert_eq!(song.len(), 3);
                let syllables: Vec<u32> = song
                    .iter()
                    .map(|line| line.split(' ').map(count_syllables).sum())
                    .collect();
                assert_eq!(syllables, vec![6, 6, 4]);
            }
        }
        assert!(composed > 0);
    }
}
