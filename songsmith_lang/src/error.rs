// Error type for corpus loading and word synthesis.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LangError {
    /// Reading the corpus failed.
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
    /// Word length bounds are unusable: `min == 0`, `min > max`, or `max`
    /// above `MAX_WORD_LENGTH`.
    #[error("invalid word length range {min}..={max}")]
    InvalidLengthRange { min: usize, max: usize },
    /// A candidate-count tuning constant is zero.
    #[error("generator setting `{field}` must be at least 1")]
    InvalidCandidateCount { field: &'static str },
    /// The phonotactic retry budget ran out before a word could be completed.
    #[error(
        "gave up generating a word after {attempts} restarts; \
         the letter model keeps producing rejected clusters"
    )]
    GenerationStagnated { attempts: usize },
}
