// Errors from song composition.
//
// `Transient` failures mean one attempt drew from an empty bucket and a fresh
// attempt may well succeed; everything else will fail the same way again.

use thiserror::Error;

/// Why a single composition attempt was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeFailure {
    /// The pool has no word with this many syllables to use as filler.
    #[error("no filler word with {syllables} syllables")]
    NoFillerWords { syllables: u32 },
    /// The rhyme group assigned to `tag` has no word with this many syllables.
    #[error("rhyme '{tag}' has no word with {syllables} syllables")]
    NoRhymeWords { tag: char, syllables: u32 },
    /// Filler words used up the whole line, leaving nothing for the rhyme word.
    #[error("filler used {used} of {line_syllables} syllables, no room for a rhyme")]
    Overshot { line_syllables: u32, used: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SongError {
    /// The descriptor contained no well-formed `<count><letter>` tokens.
    #[error("rhyme scheme has no valid lines")]
    EmptyScheme,
    /// Filler syllable bounds with `min == 0` or `min > max`.
    #[error("invalid filler syllable range {min}..={max}")]
    InvalidSyllableRange { min: u32, max: u32 },
    /// More lines, or a longer line, than the writer accepts.
    #[error(
        "scheme has {lines} lines of up to {longest_line} syllables; \
         limit is {max_lines} lines of {max_line_syllables}"
    )]
    SchemeTooLarge {
        lines: usize,
        longest_line: u32,
        max_lines: usize,
        max_line_syllables: u32,
    },
    /// The pool has fewer rhyme groups than the scheme has distinct rhymes.
    #[error("scheme needs {required} distinct rhymes but only {available} rhyme groups exist")]
    InsufficientRhymeGroups { required: usize, available: usize },
    /// One attempt failed; retrying may succeed.
    #[error("composition attempt failed: {0}")]
    Transient(#[from] ComposeFailure),
    /// Every allowed attempt failed transiently.
    #[error("could not compose a song in {attempts} attempts{}", last_failure(.last))]
    AttemptsExhausted {
        attempts: usize,
        last: Option<ComposeFailure>,
    },
}

fn last_failure(last: &Option<ComposeFailure>) -> String {
    match last {
        Some(failure) => format!(" (last failure: {failure})"),
        None => String::new(),
    }
}

impl SongError {
    /// Whether a fresh attempt with the same arguments could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SongError::Transient(_))
    }
}
