// Vowel-group syllable heuristic.
//
// Each maximal run of vowels (`aeiouy`) counts as one syllable, with two
// corrections: a lone trailing "e" is treated as silent, and the runs "ui",
// "ia", "ea", "io" count as two syllables each. Rhyme grouping in
// `songsmith_song` and the line syllable budgets both key on exactly these
// rules.

use crate::letters::is_vowel;

/// Vowel runs that are read as two syllables.
const SPLIT_RUNS: [&str; 4] = ["ui", "ia", "ea", "io"];

/// Estimate the syllable count of `word`. Returns 0 for a word with no vowels.
pub fn count_syllables(word: &str) -> u32 {
    let runs = vowel_runs(word);
    let Some(&last_run) = runs.last() else {
        return 0;
    };

    let mut syllables = runs.len() as u32;
    let ends_in_vowel = word.chars().last().is_some_and(is_vowel);
    if last_run == "e" && ends_in_vowel {
        syllables -= 1;
    }
    syllables += runs.iter().filter(|run| SPLIT_RUNS.contains(run)).count() as u32;
    syllables
}

/// Maximal contiguous vowel runs, in order.
fn vowel_runs(word: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, c) in word.char_indices() {
        match (is_vowel(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(&word[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(&word[s..]);
    }
    runs
}
