// Data-driven configuration for word generation and song composition.
//
// `SongsmithConfig` is loaded from JSON (every field optional, falling back
// to `Default`) and then overridden by command-line flags in the binaries.
// The defaults reproduce the classic setup: 4-9 letter words without double
// letters, a 50,000-word pool, and 1-4 syllable filler words.

use serde::{Deserialize, Serialize};
use songsmith_lang::GeneratorConfig;

use crate::writer::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_LINE_SYLLABLES, DEFAULT_MAX_LINES, SongWriter,
};

/// Filler range, retry budget and scheme size limits for composing songs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub min_filler_syllables: u32,
    pub max_filler_syllables: u32,
    /// Attempts per song before a transient failure becomes fatal.
    pub max_compose_attempts: usize,
    /// Longest scheme accepted, in lines.
    pub max_lines: usize,
    /// Most syllables accepted on a single line.
    pub max_line_syllables: u32,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_filler_syllables: 1,
            max_filler_syllables: 4,
            max_compose_attempts: DEFAULT_MAX_ATTEMPTS,
            max_lines: DEFAULT_MAX_LINES,
            max_line_syllables: DEFAULT_MAX_LINE_SYLLABLES,
        }
    }
}

impl ComposeConfig {
    /// A `SongWriter` over `words` with this config's retry budget and limits.
    pub fn writer(&self, words: Vec<String>) -> SongWriter {
        SongWriter::new(words)
            .with_max_attempts(self.max_compose_attempts)
            .with_scheme_limits(self.max_lines, self.max_line_syllables)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongsmithConfig {
    pub generator: GeneratorConfig,
    /// Number of words generated per session.
    pub pool_size: usize,
    pub compose: ComposeConfig,
    /// Seed for every random draw. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SongsmithConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            pool_size: 50_000,
            compose: ComposeConfig::default(),
            seed: None,
        }
    }
}

impl SongsmithConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The configured seed, or one taken from the clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed
            .unwrap_or_else(|| songsmith_prng::SongRng::from_time().next_u64())
    }
}
