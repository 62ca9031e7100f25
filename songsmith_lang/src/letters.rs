// Letter-frequency model built from a source corpus.
//
// For each of the 26 lowercase letters we keep two tallies: how often the
// letter occurs at each position within a word (0-based), and how often each
// other letter immediately follows it. The word generator (`words.rs`) ranks
// letters by these tallies to decide what to append next.
//
// The model is filled once by scanning a corpus and is read-only afterwards;
// `WordGenerator` owns it and shares it by reference across the rayon workers
// in `pool.rs`.
//
// Ranking ties are broken by alphabet order (stable sort over `a..=z`), so
// every query is deterministic for a given corpus.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::LangError;

/// The fixed 26-letter working alphabet, in tie-break order.
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Vowels for syllable counting and the consonant-cluster rules.
pub const VOWELS: &str = "aeiouy";

/// Position of `c` in `ALPHABET`, or `None` if it is not a lowercase ASCII letter.
pub fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as usize)
    } else {
        None
    }
}

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Tallies for a single letter.
#[derive(Debug, Clone, Default)]
pub struct LetterStats {
    positions: BTreeMap<usize, u64>,
    followers: [u64; 26],
}

impl LetterStats {
    pub fn add_position(&mut self, position: usize) {
        *self.positions.entry(position).or_insert(0) += 1;
    }

    /// Count `follower` as coming directly after this letter. Non-letters are ignored.
    pub fn add_follower(&mut self, follower: char) {
        if let Some(idx) = letter_index(follower) {
            self.followers[idx] += 1;
        }
    }

    pub fn position_count(&self, position: usize) -> u64 {
        self.positions.get(&position).copied().unwrap_or(0)
    }

    pub fn follower_count(&self, follower: char) -> u64 {
        letter_index(follower).map_or(0, |idx| self.followers[idx])
    }
}

/// Per-letter position and follower statistics for a corpus.
#[derive(Debug, Clone)]
pub struct LetterFrequencyModel {
    letters: [LetterStats; 26],
    words_recorded: u64,
}

impl LetterFrequencyModel {
    /// An empty model: every count is zero.
    pub fn new() -> Self {
        Self {
            letters: std::array::from_fn(|_| LetterStats::default()),
            words_recorded: 0,
        }
    }

    /// Build a model from in-memory text.
    pub fn from_text(text: &str) -> Self {
        let mut model = Self::new();
        for line in text.lines() {
            model.record_line(line);
        }
        model
    }

    /// Build a model from any line-oriented reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LangError> {
        let mut model = Self::new();
        for line in reader.lines() {
            model.record_line(&line?);
        }
        Ok(model)
    }

    /// Build a model from a corpus file.
    pub fn from_path(path: &Path) -> Result<Self, LangError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Lowercase `line`, split it into maximal runs of `a`-`z`, and record each run.
    pub fn record_line(&mut self, line: &str) {
        let lowered = line.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_ascii_lowercase())
            .filter(|w| !w.is_empty())
        {
            self.record_occurrence(word);
        }
    }

    /// Record one cleaned word: each letter's position, and which letter follows it.
    pub fn record_occurrence(&mut self, word: &str) {
        let chars: Vec<char> = word.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            let Some(idx) = letter_index(c) else {
                continue;
            };
            if let Some(&next) = chars.get(i + 1) {
                self.letters[idx].add_follower(next);
            }
            self.letters[idx].add_position(i);
        }
        self.words_recorded += 1;
    }

    /// Stats for `letter`, or `None` outside the alphabet.
    pub fn stats(&self, letter: char) -> Option<&LetterStats> {
        letter_index(letter).map(|idx| &self.letters[idx])
    }

    pub fn words_recorded(&self) -> u64 {
        self.words_recorded
    }

    /// The `k` letters seen most often at `position`, most frequent first.
    ///
    /// Always ranks the whole alphabet, so letters never seen at `position`
    /// still fill out the result (in alphabet order) when `k` exceeds the
    /// number of letters that were seen.
    pub fn top_letters_at_position(&self, position: usize, k: usize) -> Vec<char> {
        let mut ranked = self.ranked_at_position(position);
        ranked.truncate(k);
        ranked
    }

    /// `candidates` re-ordered by frequency at `position`, most frequent first.
    ///
    /// Candidates outside the alphabet are dropped, as are duplicates.
    pub fn filter_by_frequency_at_position(
        &self,
        position: usize,
        candidates: &[char],
    ) -> Vec<char> {
        self.ranked_at_position(position)
            .into_iter()
            .filter(|c| candidates.contains(c))
            .collect()
    }

    /// The `k` letters that most often directly follow `letter`.
    pub fn top_followers(&self, letter: char, k: usize) -> Vec<char> {
        let Some(stats) = self.stats(letter) else {
            return Vec::new();
        };
        let mut ranked = rank_alphabet(|c| stats.follower_count(c));
        ranked.truncate(k);
        ranked
    }

    fn ranked_at_position(&self, position: usize) -> Vec<char> {
        rank_alphabet(|c| {
            self.stats(c)
                .map_or(0, |stats| stats.position_count(position))
        })
    }
}

impl Default for LetterFrequencyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// All 26 letters sorted by `count` descending; the stable sort keeps
/// alphabet order among equal counts.
fn rank_alphabet(count: impl Fn(char) -> u64) -> Vec<char> {
    let mut letters = ALPHABET.to_vec();
    letters.sort_by(|&a, &b| count(b).cmp(&count(a)));
    letters
}
