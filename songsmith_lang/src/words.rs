// Nonsense word synthesis from a letter-frequency model.
//
// Algorithm per word:
// 1. Draw a target length uniformly from `[min_length, max_length]`.
// 2. Pick the first letter uniformly from the `start_candidate_pool_size`
//    letters most frequent at position 0.
// 3. Until the target length is reached: take the `follower_candidate_count`
//    most frequent followers of the last letter (minus the last letter itself
//    when doubles are off), re-rank them by frequency at the next position,
//    keep the top `position_candidate_limit`, and draw one uniformly.
// 4. If the extended word hits the phonotactic denylist (`phonotactics.rs`),
//    drop the candidate and draw again at the same position.
//
// Step 4 is bounded: a position gets `max_attempts_per_position` draws, after
// which the whole word is restarted from a fresh first letter, and after
// `max_restarts` restarts generation fails with `GenerationStagnated`.
//
// All randomness comes from the caller's `SongRng`.

use log::debug;
use serde::{Deserialize, Serialize};
use songsmith_prng::SongRng;

use crate::error::LangError;
use crate::letters::LetterFrequencyModel;
use crate::phonotactics;

/// Longest word `GeneratorConfig::validate` accepts.
pub const MAX_WORD_LENGTH: usize = 64;

/// Tuning for `WordGenerator`. Defaults produce 4-9 letter words without doubles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Whether the same letter may be appended twice in a row.
    pub allow_doubles: bool,
    /// How many of the most common word-initial letters the first letter is drawn from.
    pub start_candidate_pool_size: usize,
    /// How many of the most common followers of the last letter are considered.
    pub follower_candidate_count: usize,
    /// How many followers survive re-ranking by position before the draw.
    pub position_candidate_limit: usize,
    pub max_attempts_per_position: usize,
    pub max_restarts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_length: 4,
            max_length: 9,
            allow_doubles: false,
            start_candidate_pool_size: 18,
            follower_candidate_count: 12,
            position_candidate_limit: 6,
            max_attempts_per_position: 64,
            max_restarts: 32,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), LangError> {
        if self.min_length == 0
            || self.min_length > self.max_length
            || self.max_length > MAX_WORD_LENGTH
        {
            return Err(LangError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        let counts = [
            ("start_candidate_pool_size", self.start_candidate_pool_size),
            ("follower_candidate_count", self.follower_candidate_count),
            ("position_candidate_limit", self.position_candidate_limit),
            ("max_attempts_per_position", self.max_attempts_per_position),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(LangError::InvalidCandidateCount { field });
            }
        }
        Ok(())
    }
}

/// Synthesizes pronounceable words from an owned, read-only letter model.
#[derive(Debug, Clone)]
pub struct WordGenerator {
    model: LetterFrequencyModel,
    config: GeneratorConfig,
    start_letters: Vec<char>,
}

impl WordGenerator {
    pub fn new(model: LetterFrequencyModel, config: GeneratorConfig) -> Result<Self, LangError> {
        config.validate()?;
        let start_letters = model.top_letters_at_position(0, config.start_candidate_pool_size);
        debug!("word generator start letters: {start_letters:?}");
        Ok(Self {
            model,
            config,
            start_letters,
        })
    }

    pub fn model(&self) -> &LetterFrequencyModel {
        &self.model
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one word whose length lies in `[min_length, max_length]`.
    pub fn generate_word(&self, rng: &mut SongRng) -> Result<String, LangError> {
        let target = rng.range_usize_inclusive(self.config.min_length, self.config.max_length);
        debug!("making a word {target} letters long");
        for restart in 0..=self.config.max_restarts {
            if let Some(word) = self.try_build(target, rng) {
                return Ok(word);
            }
            debug!("restarting {target}-letter word (restart {})", restart + 1);
        }
        Err(LangError::GenerationStagnated {
            attempts: self.config.max_restarts + 1,
        })
    }

    /// One pass at building a `target`-letter word. `None` when some position
    /// ran out of attempts.
    fn try_build(&self, target: usize, rng: &mut SongRng) -> Option<String> {
        let first = *rng.choose(&self.start_letters)?;
        let mut word = String::with_capacity(target);
        word.push(first);

        while word.len() < target {
            let candidates = self.next_candidates(&word);
            let mut accepted = false;
            for _ in 0..self.config.max_attempts_per_position {
                let next = *rng.choose(&candidates)?;
                word.push(next);
                if phonotactics::is_rejected(&word) {
                    debug!(
                        "word \"{word}\" failed on {:?}",
                        phonotactics::first_violation(&word)
                    );
                    word.pop();
                } else {
                    accepted = true;
                    break;
                }
            }
            if !accepted {
                return None;
            }
        }
        Some(word)
    }

    /// Letters that may follow `word`, best first, already cut to
    /// `position_candidate_limit`. Words are ASCII, so `len()` is the next position.
    fn next_candidates(&self, word: &str) -> Vec<char> {
        let Some(last) = word.chars().last() else {
            return Vec::new();
        };
        let mut followers = self
            .model
            .top_followers(last, self.config.follower_candidate_count);
        if !self.config.allow_doubles {
            followers.retain(|&c| c != last);
        }
        let mut ranked = self
            .model
            .filter_by_frequency_at_position(word.len(), &followers);
        ranked.truncate(self.config.position_candidate_limit);
        ranked
    }
}
