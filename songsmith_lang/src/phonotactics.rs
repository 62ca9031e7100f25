// Phonotactic denylist: letter clusters the word generator refuses to emit.
//
// Four families of rule, all folded into one regex compiled on first use:
// - three or more consonants in a row, anywhere;
// - clusters that may not open a word ("mr", "gn", ...);
// - clusters that may not appear mid-word next to a consonant run
//   ("br" + consonants, consonants + "dl", ...);
// - clusters that may not close a word ("tl", "sl", "dr", "dl").
//
// `words.rs` checks the word-so-far after every appended letter. Because the
// end-of-word rules are applied to partial words too, the word-final clusters
// never survive anywhere in a generated word.

use std::sync::LazyLock;

use regex::Regex;

/// Every letter outside `VOWELS`, as a regex character-class body.
const CONSONANTS: &str = "bcdfghjklmnpqrstvwxz";

const INVALID_START: [&str; 10] = ["mr", "gn", "hn", "hr", "rn", "mn", "nt", "lt", "nl", "wn"];

/// `{c}` stands for a run of one or more consonants.
const INVALID_MID: [&str; 5] = ["br{c}", "gn{c}", "{c}dl", "{c}lt", "{c}sl"];

const INVALID_END: [&str; 4] = ["tl", "sl", "dr", "dl"];

static DENYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&denylist_pattern()).expect("phonotactic denylist pattern is malformed")
});

/// The combined alternation that `is_rejected` matches against.
pub fn denylist_pattern() -> String {
    let consonant_run = format!("[{CONSONANTS}]+");
    let mut alternatives = vec![format!("[{CONSONANTS}]{{3,}}")];
    alternatives.extend(INVALID_START.iter().map(|p| format!(r"\b{p}+")));
    alternatives.extend(INVALID_MID.iter().map(|p| p.replace("{c}", &consonant_run)));
    alternatives.extend(INVALID_END.iter().map(|p| format!(r"{p}\b")));
    alternatives.join("|")
}

/// True if `word` contains any denied cluster.
pub fn is_rejected(word: &str) -> bool {
    DENYLIST.is_match(word)
}

/// The first denied cluster in `word`, for diagnostics.
pub fn first_violation(word: &str) -> Option<&str> {
    DENYLIST.find(word).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_compiles() {
        assert!(Regex::new(&denylist_pattern()).is_ok());
    }

    #[test]
    fn triple_consonants_rejected_anywhere() {
        assert!(is_rejected("strap"));
        assert!(is_rejected("abstract"));
        assert!(is_rejected("ghj"));
        assert!(!is_rejected("taste"));
    }

    #[test]
    fn start_clusters_only_at_word_start() {
        assert!(is_rejected("mrak"));
        assert!(is_rejected("gnome"));
        assert!(is_rejected("ntoa"));
        assert!(!is_rejected("amra"));
        assert!(!is_rejected("ante"));
    }

    #[test]
    fn mid_clusters_need_adjacent_consonants() {
        assert!(is_rejected("obrk"));
        assert!(!is_rejected("adlo"));
        assert!(is_rejected("asdlo"));
        assert!(!is_rejected("eslu"));
        assert!(is_rejected("ekslu"));
    }

    #[test]
    fn end_clusters_only_at_word_end() {
        assert!(is_rejected("bottl"));
        assert!(is_rejected("hassl"));
        assert!(is_rejected("cadr"));
        assert!(!is_rejected("atlas"));
        assert!(!is_rejected("adrift"));
    }

    #[test]
    fn single_letters_and_vowel_words_pass() {
        assert!(!is_rejected("b"));
        assert!(!is_rejected("aeiou"));
        assert!(!is_rejected(""));
    }

    #[test]
    fn first_violation_reports_cluster() {
        assert_eq!(first_violation("catl"), Some("tl"));
        assert_eq!(first_violation("bottl"), Some("ttl"));
        assert_eq!(first_violation("banana"), None);
    }
}
