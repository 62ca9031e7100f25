// Prefix tree over an arena of nodes, and the reverse-spelled rhyme index built on it.
//
// `PrefixTree` stores words letter by letter in a `Vec<PrefixNode>`; children
// are indices into that vector, keyed by letter in a `BTreeMap` so traversal
// order is fixed. All walks use an explicit stack rather than recursion, so
// long words cannot blow the call stack.
//
// `RhymeIndex` inserts every word spelled backwards. A path from the root then
// reads a word's ending in reverse, and the shortest paths that read as one
// syllable (per `songsmith_lang::count_syllables`) are exactly the rhyme
// endings. Every word below such a path shares that final syllable, which
// makes it one rhyme group.
//
// Query results are returned as sorted `Vec<String>`s.

use std::collections::{BTreeMap, BTreeSet};

use songsmith_lang::count_syllables;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct PrefixNode {
    /// `None` only for the root.
    letter: Option<char>,
    is_word: bool,
    children: BTreeMap<char, NodeId>,
}

impl PrefixNode {
    fn new(letter: Option<char>) -> Self {
        Self {
            letter,
            is_word: false,
            children: BTreeMap::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PrefixTree {
    nodes: Vec<PrefixNode>,
    word_count: usize,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![PrefixNode::new(None)],
            word_count: 0,
        }
    }

    /// Insert `word`, creating nodes as needed. Empty words and repeats are no-ops.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut current = ROOT;
        for letter in word.chars() {
            current = match self.nodes[current].children.get(&letter) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(PrefixNode::new(Some(letter)));
                    self.nodes[current].children.insert(letter, child);
                    child
                }
            };
        }
        if !self.nodes[current].is_word {
            self.nodes[current].is_word = true;
            self.word_count += 1;
        }
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every stored word, sorted.
    pub fn all_words(&self) -> Vec<String> {
        self.words_with_prefix("", false)
    }

    /// Every stored word starting with `prefix`, including `prefix` itself if
    /// it was inserted. With `reverse`, each result is spelled backwards before
    /// returning, for trees that hold reversed words.
    pub fn words_with_prefix(&self, prefix: &str, reverse: bool) -> Vec<String> {
        let Some(start) = self.locate(prefix) else {
            return Vec::new();
        };
        let found = self.collect_paths(start, prefix.to_string(), true, |node, _| node.is_word);
        if reverse {
            let mut words: Vec<String> = found.into_iter().map(|w| reversed(&w)).collect();
            words.sort();
            words
        } else {
            found.into_iter().collect()
        }
    }

    /// The shortest root paths that read as exactly `syllables` syllables.
    ///
    /// A walk from the root stops at the first node whose path matches, so a
    /// matching path never has a matching extension in the result. With
    /// `reverse`, paths are read backwards when counting, but returned as
    /// stored.
    pub fn prefixes_with_syllables(&self, syllables: u32, reverse: bool) -> Vec<String> {
        self.collect_paths(ROOT, String::new(), false, |_, path| {
            let syllable_count = if reverse {
                count_syllables(&reversed(path))
            } else {
                count_syllables(path)
            };
            syllable_count == syllables
        })
        .into_iter()
        .collect()
    }

    fn locate(&self, prefix: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for letter in prefix.chars() {
            current = *self.nodes[current].children.get(&letter)?;
        }
        Some(current)
    }

    /// Depth-first walk from `start`, whose path is `start_path`. Records every
    /// path for which `matches` holds; below a match the walk continues only
    /// when `descend_on_match` is set.
    fn collect_paths(
        &self,
        start: NodeId,
        start_path: String,
        descend_on_match: bool,
        matches: impl Fn(&PrefixNode, &str) -> bool,
    ) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut stack = vec![(start, start_path)];
        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id];
            let matched = matches(node, &path);
            if matched {
                found.insert(path.clone());
            }
            if node.is_leaf() || (matched && !descend_on_match) {
                continue;
            }
            for (&letter, &child) in &node.children {
                debug_assert_eq!(self.nodes[child].letter, Some(letter));
                let mut child_path = path.clone();
                child_path.push(letter);
                stack.push((child, child_path));
            }
        }
        found
    }
}

impl Default for PrefixTree {
    fn default() -> Self {
        Self::new()
    }
}

fn reversed(word: &str) -> String {
    word.chars().rev().collect()
}

/// Words indexed by their reversed spelling, for finding shared final syllables.
#[derive(Debug, Clone, Default)]
pub struct RhymeIndex {
    tree: PrefixTree,
}

impl RhymeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::new();
        for word in words {
            index.insert(word);
        }
        index
    }

    pub fn insert(&mut self, word: &str) {
        self.tree.insert(&reversed(word));
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The one-syllable word endings present in the index, spelled forwards.
    pub fn rhyme_endings(&self) -> Vec<String> {
        let mut endings: Vec<String> = self
            .tree
            .prefixes_with_syllables(1, true)
            .iter()
            .map(|p| reversed(p))
            .collect();
        endings.sort();
        endings
    }

    /// Words that end with `ending` (spelled forwards), sorted.
    pub fn words_ending_with(&self, ending: &str) -> Vec<String> {
        self.tree.words_with_prefix(&reversed(ending), true)
    }

    /// Partition the indexed words into groups sharing a final syllable.
    ///
    /// Words with no one-syllable ending (e.g. no vowels at all) belong to no
    /// group. Groups come out in order of their reversed ending.
    pub fn rhyme_groups(&self) -> Vec<Vec<String>> {
        self.tree
            .prefixes_with_syllables(1, true)
            .iter()
            .map(|prefix| self.tree.words_with_prefix(prefix, true))
            .filter(|group| !group.is_empty())
            .collect()
    }
}
