// Rhyme scheme descriptors.
//
// A descriptor is a comma-joined list of `<syllables><rhyme>` tokens, e.g.
// "8a,8a,5b,5b,8a" for a limerick: five lines of 8, 8, 5, 5 and 8 syllables,
// where lines tagged with the same letter end on rhyming words.
//
// Parsing is lenient: well-formed tokens are extracted and anything else is
// skipped. A count of zero, or one too large for `u32`, makes its token
// malformed. A descriptor with no usable tokens parses to an empty scheme,
// which `SongWriter` rejects with `SongError::EmptyScheme`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)([a-z]),?").expect("scheme token pattern is malformed"));

/// One line of a scheme: how many syllables, and which rhyme it ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeLine {
    pub syllables: u32,
    pub rhyme: char,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhymeScheme {
    lines: Vec<SchemeLine>,
}

impl RhymeScheme {
    /// Extract every well-formed token from `descriptor`, in order.
    pub fn parse(descriptor: &str) -> Self {
        let lines = TOKEN
            .captures_iter(descriptor)
            .filter_map(|caps| {
                let syllables: u32 = caps[1].parse().ok().filter(|&n| n > 0)?;
                let rhyme = caps[2].chars().next()?;
                Some(SchemeLine { syllables, rhyme })
            })
            .collect();
        Self { lines }
    }

    pub fn from_lines(lines: Vec<SchemeLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[SchemeLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct rhyme tags in order of first appearance.
    pub fn distinct_rhymes(&self) -> Vec<char> {
        let mut tags = Vec::new();
        for line in &self.lines {
            if !tags.contains(&line.rhyme) {
                tags.push(line.rhyme);
            }
        }
        tags
    }
}

impl fmt::Display for RhymeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}{}", line.syllables, line.rhyme)?;
        }
        Ok(())
    }
}
