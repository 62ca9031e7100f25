// Scheme-driven song assembly over a fixed word pool.
//
// `SongWriter` owns a pool of generated words plus lookup tables derived from
// it: the pool bucketed by syllable count, and the pool's rhyme groups (from
// `rhyme.rs`), each bucketed the same way. Building the tables walks the whole
// rhyme index, which is slow for a 50k-word pool, so they are built once on
// first use behind a `OnceLock` and only read afterwards. Concurrent callers
// block on the single build instead of racing it.
//
// Composing a line: draw a target syllable count for the line's final rhyme
// word, then add random filler words (each with a random syllable count in the
// filler range) until the remaining budget no longer exceeds that target. The
// line is closed by a word from the tag's rhyme group with exactly the
// remaining syllable count. Any empty bucket along the way abandons the whole
// attempt; `compose_song` retries up to `max_attempts` times.
//
// Schemes are capped in line count and per-line syllables before any work is
// done, since a line's filler loop runs once per filler word.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::{debug, info, warn};
use songsmith_lang::count_syllables;
use songsmith_prng::SongRng;

use crate::error::{ComposeFailure, SongError};
use crate::rhyme::RhymeIndex;
use crate::scheme::{RhymeScheme, SchemeLine};

pub const DEFAULT_MAX_ATTEMPTS: usize = 200;
pub const DEFAULT_MAX_LINES: usize = 64;
pub const DEFAULT_MAX_LINE_SYLLABLES: u32 = 128;

/// Words keyed by syllable count.
pub type SyllableBuckets = BTreeMap<u32, Vec<String>>;

/// Bucket `words` by `count_syllables`, keeping pool order (and duplicates) within a bucket.
pub fn bucket_by_syllables<'a>(words: impl IntoIterator<Item = &'a String>) -> SyllableBuckets {
    let mut buckets = SyllableBuckets::new();
    for word in words {
        buckets
            .entry(count_syllables(word))
            .or_default()
            .push(word.clone());
    }
    buckets
}

/// Tables derived from the pool, built once per `SongWriter`.
#[derive(Debug, Clone, PartialEq)]
pub struct RhymeTables {
    pub words_by_syllable: SyllableBuckets,
    pub rhyme_groups: Vec<SyllableBuckets>,
}

impl RhymeTables {
    pub fn build(words: &[String]) -> Self {
        let started = std::time::Instant::now();
        let index = RhymeIndex::from_words(words.iter().map(String::as_str));
        let rhyme_groups: Vec<SyllableBuckets> = index
            .rhyme_groups()
            .iter()
            .map(bucket_by_syllables)
            .collect();
        let words_by_syllable = bucket_by_syllables(words);
        info!(
            "built rhyme tables for {} words ({} distinct): \
             {} syllable buckets, {} rhyme groups in {:.2?}",
            words.len(),
            index.len(),
            words_by_syllable.len(),
            rhyme_groups.len(),
            started.elapsed()
        );
        Self {
            words_by_syllable,
            rhyme_groups,
        }
    }
}

#[derive(Debug)]
pub struct SongWriter {
    words: Vec<String>,
    tables: OnceLock<RhymeTables>,
    max_attempts: usize,
    max_lines: usize,
    max_line_syllables: u32,
}

impl SongWriter {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            tables: OnceLock::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_lines: DEFAULT_MAX_LINES,
            max_line_syllables: DEFAULT_MAX_LINE_SYLLABLES,
        }
    }

    /// Cap on attempts per `compose_song` call. Zero is treated as one.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Largest scheme accepted: at most `max_lines` lines of at most
    /// `max_line_syllables` syllables each.
    pub fn with_scheme_limits(mut self, max_lines: usize, max_line_syllables: u32) -> Self {
        self.max_lines = max_lines;
        self.max_line_syllables = max_line_syllables;
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Build the lookup tables if nobody has yet, and return them.
    pub fn ensure_built(&self) -> &RhymeTables {
        self.tables.get_or_init(|| RhymeTables::build(&self.words))
    }

    pub fn is_built(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Parse `descriptor` and compose a song for it, retrying transient failures.
    pub fn compose_song(
        &self,
        descriptor: &str,
        min_filler_syllables: u32,
        max_filler_syllables: u32,
        rng: &mut SongRng,
    ) -> Result<Vec<String>, SongError> {
        let scheme = RhymeScheme::parse(descriptor);
        self.compose_scheme(&scheme, min_filler_syllables, max_filler_syllables, rng)
    }

    /// Compose a song for an already-parsed scheme, retrying transient failures.
    pub fn compose_scheme(
        &self,
        scheme: &RhymeScheme,
        min_filler_syllables: u32,
        max_filler_syllables: u32,
        rng: &mut SongRng,
    ) -> Result<Vec<String>, SongError> {
        let mut last = None;
        for attempt in 1..=self.max_attempts {
            match self.try_compose(scheme, min_filler_syllables, max_filler_syllables, rng) {
                Ok(song) => {
                    debug!("composed '{scheme}' on attempt {attempt}");
                    return Ok(song);
                }
                Err(SongError::Transient(failure)) => {
                    debug!("attempt {attempt} for '{scheme}' failed: {failure}");
                    last = Some(failure);
                }
                Err(e) => return Err(e),
            }
        }
        warn!(
            "giving up on '{scheme}' after {} attempts",
            self.max_attempts
        );
        Err(SongError::AttemptsExhausted {
            attempts: self.max_attempts,
            last,
        })
    }

    /// A single composition attempt. Transient failures come back as
    /// `SongError::Transient` for the caller to retry or report.
    pub fn try_compose(
        &self,
        scheme: &RhymeScheme,
        min_filler_syllables: u32,
        max_filler_syllables: u32,
        rng: &mut SongRng,
    ) -> Result<Vec<String>, SongError> {
        if scheme.is_empty() {
            return Err(SongError::EmptyScheme);
        }
        let longest_line = scheme.lines().iter().map(|l| l.syllables).max().unwrap_or(0);
        if scheme.lines().len() > self.max_lines || longest_line > self.max_line_syllables {
            return Err(SongError::SchemeTooLarge {
                lines: scheme.lines().len(),
                longest_line,
                max_lines: self.max_lines,
                max_line_syllables: self.max_line_syllables,
            });
        }
        if min_filler_syllables == 0 || min_filler_syllables > max_filler_syllables {
            return Err(SongError::InvalidSyllableRange {
                min: min_filler_syllables,
                max: max_filler_syllables,
            });
        }
        let tables = self.ensure_built();
        let rhymes = scheme.distinct_rhymes();
        if tables.rhyme_groups.len() < rhymes.len() {
            return Err(SongError::InsufficientRhymeGroups {
                required: rhymes.len(),
                available: tables.rhyme_groups.len(),
            });
        }

        // Each rhyme tag gets its own group; no two tags share one.
        let mut available: Vec<&SyllableBuckets> = tables.rhyme_groups.iter().collect();
        let mut assigned = BTreeMap::new();
        for tag in rhymes {
            let pick = rng.range_usize(0, available.len());
            assigned.insert(tag, available.swap_remove(pick));
        }

        let range = (min_filler_syllables, max_filler_syllables);
        let mut song = Vec::with_capacity(scheme.lines().len());
        for line in scheme.lines() {
            let group = assigned[&line.rhyme];
            song.push(compose_line(line, group, &tables.words_by_syllable, range, rng)?);
        }
        Ok(song)
    }
}

fn compose_line(
    line: &SchemeLine,
    group: &SyllableBuckets,
    words_by_syllable: &SyllableBuckets,
    (min, max): (u32, u32),
    rng: &mut SongRng,
) -> Result<String, ComposeFailure> {
    let rhyme_target = rng.range_u32_inclusive(min, max);
    let mut words: Vec<&str> = Vec::new();
    let mut used = 0u32;
    while used.saturating_add(rhyme_target) < line.syllables {
        let syllables = rng.range_u32_inclusive(min, max);
        let word = words_by_syllable
            .get(&syllables)
            .and_then(|bucket| rng.choose(bucket))
            .ok_or(ComposeFailure::NoFillerWords { syllables })?;
        words.push(word);
        used = used.saturating_add(syllables);
    }

    // A zero remainder is the same as an empty bucket 0: no rhyme word has 0 syllables.
    let remaining = line
        .syllables
        .checked_sub(used)
        .filter(|&r| r > 0)
        .ok_or(ComposeFailure::Overshot {
            line_syllables: line.syllables,
            used,
        })?;
    let rhyme_word = group
        .get(&remaining)
        .and_then(|bucket| rng.choose(bucket))
        .ok_or(ComposeFailure::NoRhymeWords {
            tag: line.rhyme,
            syllables: remaining,
        })?;
    words.push(rhyme_word);
    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    /// A pool with plenty of 1-4 syllable words in a handful of rhyme groups.
    fn rich_pool() -> Vec<String> {
        let endings = ["an", "ish", "ob", "et", "ung", "ark"];
        let stems = ["b", "pal", "toromal", "sikanomab", "d", "kel", "mubor", "tadikel"];
        let mut words = Vec::new();
        for ending in endings {
            for stem in stems {
                words.push(format!("{stem}{ending}"));
            }
        }
        words
    }

    fn line_syllables(line: &str) -> u32 {
        line.split(' ').map(count_syllables).sum()
    }

    #[test]
    fn buckets_by_syllable_count() {
        let words = pool(&["fantastish", "fish", "dish", "glombar", "car", "phone", "tone"]);
        let buckets = bucket_by_syllables(&words);
        assert_eq!(buckets[&1], pool(&["fish", "dish", "car", "phone", "tone"]));
        assert_eq!(buckets[&2], pool(&["glombar"]));
        assert_eq!(buckets[&3], pool(&["fantastish"]));
    }

    #[test]
    fn tables_are_built_lazily_once() {
        let writer = SongWriter::new(rich_pool());
        assert!(!writer.is_built());
        let first: *const RhymeTables = writer.ensure_built();
        let second: *const RhymeTables = writer.ensure_built();
        assert!(writer.is_built());
        assert_eq!(first, second);
        assert_eq!(writer.ensure_built().rhyme_groups.len(), 6);
    }

    #[test]
    fn concurrent_callers_share_one_build() {
        let writer = std::sync::Arc::new(SongWriter::new(rich_pool()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let writer = writer.clone();
                std::thread::spawn(move || writer.ensure_built() as *const RhymeTables as usize)
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn lines_hit_exact_syllable_counts() {
        let writer = SongWriter::new(rich_pool());
        let mut rng = SongRng::new(42);
        let scheme = RhymeScheme::parse("8a,8a,5b,5b,8a");
        for _ in 0..50 {
            let song = writer.compose_scheme(&scheme, 1, 4, &mut rng).unwrap();
            assert_eq!(song.len(), 5);
            for (line, expected) in song.iter().zip(scheme.lines()) {
                assert_eq!(line_syllables(line), expected.syllables, "line '{line}'");
            }
        }
    }

    #[test]
    fn same_tag_lines_rhyme_and_different_tags_do_not() {
        let writer = SongWriter::new(rich_pool());
        let mut rng = SongRng::new(3);
        let ending = |line: &str| {
            let last = line.rsplit(' ').next().unwrap().to_string();
            ["an", "ish", "ob", "et", "ung", "ark"]
                .into_iter()
                .find(|e| last.ends_with(e))
                .unwrap()
        };
        for _ in 0..50 {
            let song = writer.compose_song("6a,6b,6a,6b", 1, 3, &mut rng).unwrap();
            assert_eq!(ending(&song[0]), ending(&song[2]));
            assert_eq!(ending(&song[1]), ending(&song[3]));
            assert_ne!(ending(&song[0]), ending(&song[1]));
        }
    }

    #[test]
    fn composing_does_not_touch_the_tables() {
        let writer = SongWriter::new(rich_pool());
        let before = writer.ensure_built().clone();
        let mut rng = SongRng::new(11);
        for _ in 0..20 {
            let _ = writer.compose_song("8a,8a,5b,5b,8a", 1, 4, &mut rng);
        }
        assert_eq!(writer.ensure_built(), &before);
        assert_eq!(writer.words(), rich_pool().as_slice());
    }

    #[test]
    fn same_seed_same_song() {
        let writer = SongWriter::new(rich_pool());
        let mut a = SongRng::new(77);
        let mut b = SongRng::new(77);
        assert_eq!(
            writer.compose_song("7a,7b,7a", 1, 4, &mut a).unwrap(),
            writer.compose_song("7a,7b,7a", 1, 4, &mut b).unwrap()
        );
    }

    #[test]
    fn too_many_rhymes_is_not_retryable() {
        let writer = SongWriter::new(pool(&["fish", "dish", "car", "bar"]));
        let mut rng = SongRng::new(1);
        let err = writer.compose_song("1a,1b,1c", 1, 1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SongError::InsufficientRhymeGroups {
                required: 3,
                available: 2
            }
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn missing_rhyme_bucket_exhausts_attempts() {
        // Only one-syllable words, so a two-syllable rhyme can never be found.
        let writer = SongWriter::new(pool(&["fish", "dish"])).with_max_attempts(5);
        let mut rng = SongRng::new(1);
        let err = writer.compose_song("2a", 2, 2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SongError::AttemptsExhausted {
                attempts: 5,
                last: Some(ComposeFailure::NoRhymeWords {
                    tag: 'a',
                    syllables: 2
                })
            }
        );
    }

    #[test]
    fn single_attempt_reports_transient_failure() {
        let writer = SongWriter::new(pool(&["fish", "dish"]));
        let mut rng = SongRng::new(1);
        let scheme = RhymeScheme::parse("2a");
        let err = writer.try_compose(&scheme, 2, 2, &mut rng).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn missing_filler_bucket_is_transient() {
        let writer = SongWriter::new(pool(&["fish", "dish"]));
        let mut rng = SongRng::new(1);
        let scheme = RhymeScheme::parse("9a");
        // Filler draws 3 syllables, which the pool does not have.
        let err = writer.try_compose(&scheme, 3, 3, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SongError::Transient(ComposeFailure::NoFillerWords { syllables: 3 })
        );
    }

    #[test]
    fn empty_scheme_and_bad_range_are_rejected() {
        let writer = SongWriter::new(rich_pool());
        let mut rng = SongRng::new(1);
        assert_eq!(
            writer.compose_song("nonsense", 1, 4, &mut rng),
            Err(SongError::EmptyScheme)
        );
        assert_eq!(
            writer.compose_song("8a", 0, 4, &mut rng),
            Err(SongError::InvalidSyllableRange { min: 0, max: 4 })
        );
        assert_eq!(
            writer.compose_song("8a", 5, 4, &mut rng),
            Err(SongError::InvalidSyllableRange { min: 5, max: 4 })
        );
    }

    #[test]
    fn oversized_schemes_are_rejected_up_front() {
        let writer = SongWriter::new(rich_pool());
        let mut rng = SongRng::new(1);
        let err = writer.compose_song("4000000000a", 1, 1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SongError::SchemeTooLarge {
                lines: 1,
                longest_line: 4_000_000_000,
                max_lines: DEFAULT_MAX_LINES,
                max_line_syllables: DEFAULT_MAX_LINE_SYLLABLES,
            }
        );
        assert!(!err.is_retryable());
        // Rejected before the tables are built.
        assert!(!writer.is_built());

        let long_song = vec!["2a"; DEFAULT_MAX_LINES + 1].join(",");
        assert!(matches!(
            writer.compose_song(&long_song, 1, 1, &mut rng),
            Err(SongError::SchemeTooLarge { lines, .. }) if lines == DEFAULT_MAX_LINES + 1
        ));
    }

    #[test]
    fn scheme_limits_are_configurable() {
        let writer = SongWriter::new(rich_pool()).with_scheme_limits(2, 6);
        let mut rng = SongRng::new(5);
        assert_eq!(writer.compose_song("6a,6a", 1, 2, &mut rng).unwrap().len(), 2);
        assert!(matches!(
            writer.compose_song("7a", 1, 2, &mut rng),
            Err(SongError::SchemeTooLarge { longest_line: 7, .. })
        ));
        assert!(matches!(
            writer.compose_song("2a,2a,2a", 1, 2, &mut rng),
            Err(SongError::SchemeTooLarge { lines: 3, .. })
        ));
    }

    #[test]
    fn extreme_syllable_counts_fail_cleanly() {
        // Draws at the top of u32 must not wrap the running total.
        let writer = SongWriter::new(rich_pool()).with_scheme_limits(1, u32::MAX);
        let mut rng = SongRng::new(9);
        let scheme = RhymeScheme::parse("4294967295a");
        let err = writer
            .try_compose(&scheme, u32::MAX - 1, u32::MAX, &mut rng)
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
