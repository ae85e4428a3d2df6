//! Recurring terms in free-text comparison reasoning.
//!
//! Reasoning is tokenized into lowercase words (longer than two characters)
//! and adjacent-word bigrams. A term is counted at most once per comparison.
//! Terms survive when they occur at least twice or their first word is a
//! known quality term (see [`IMPORTANT_TERMS`]).

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{comparison::DimensionFilter, dataset::TrainingRow};

/// Maximum number of themes returned.
pub const MAX_THEMES: usize = 50;

/// Maximum number of context snippets kept per theme.
pub const MAX_CONTEXTS: usize = 3;

/// Bytes of surrounding text kept on each side of a context match.
const CONTEXT_RADIUS: usize = 30;

const MIN_THEME_FREQUENCY: usize = 2;

pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "that", "which", "this", "these",
    "those", "what", "who", "whom", "with", "for", "from", "to", "of", "in", "on", "at", "by",
    "about", "but", "and", "or", "so", "if", "then", "than", "as", "also", "video", "first",
    "second", "one", "other", "both", "more", "less", "very", "really", "just", "only", "even",
    "still", "already", "not", "no", "none", "nor", "neither", "i", "me", "my", "we", "our",
    "you", "your", "he", "she", "it", "they", "them",
];

/// Quality vocabulary that is kept even when it occurs only once.
pub const IMPORTANT_TERMS: &[&str] = &[
    "replicable", "replicability", "replicate", "replication", "premise", "concept", "idea",
    "creative", "creativity", "original", "originality", "humor", "humour", "funny", "amusing",
    "comedic", "comedy", "joke", "acting", "performance", "performer", "actor", "energy",
    "charisma", "pacing", "tempo", "rhythm", "flow", "fast", "slow", "quick", "editing", "edit",
    "cuts", "transitions", "production", "engaging", "engagement", "attention", "captivating",
    "hook", "payoff", "punchline", "reveal", "twist", "surprise", "absurd", "absurdism",
    "absurdist", "surreal", "relatable", "relatability", "authentic", "genuine", "clever",
    "smart", "witty", "intelligent", "simple", "complex", "easy", "difficult", "hard",
    "attractive", "aesthetic", "visual", "visually",
];

/// A recurring term with the comparisons it appeared in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningTheme {
    pub term: String,
    /// Number of comparisons whose reasoning contains the term.
    pub frequency: usize,
    pub associated_wins: Vec<String>,
    pub associated_losses: Vec<String>,
    /// Up to [`MAX_CONTEXTS`] snippets of surrounding text.
    pub contexts: Vec<String>,
}

#[derive(Debug, Default)]
struct ThemeTally {
    frequency: usize,
    wins: BTreeSet<String>,
    losses: BTreeSet<String>,
    contexts: Vec<String>,
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| w.len() > 2)
        .collect()
}

/// Words and adjacent-word bigrams, first occurrence order, no duplicates.
fn candidate_terms(words: &[&str]) -> Vec<String> {
    let unigrams = words
        .iter()
        .filter(|w| !STOPWORDS.contains(w))
        .map(|w| (*w).to_owned());
    let bigrams = words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));

    let mut seen = BTreeSet::new();
    unigrams
        .chain(bigrams)
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn context_snippet(text: &str, term: &str) -> Option<String> {
    let index = text.find(term)?;
    let start = floor_char_boundary(text, index.saturating_sub(CONTEXT_RADIUS));
    let end = ceil_char_boundary(text, (index + term.len() + CONTEXT_RADIUS).min(text.len()));
    Some(format!("...{}...", &text[start..end]))
}

fn is_kept(term: &str, frequency: usize) -> bool {
    let first_word = term.split(' ').next().unwrap_or(term);
    frequency >= MIN_THEME_FREQUENCY || IMPORTANT_TERMS.contains(&first_word)
}

/// Mines recurring terms from the reasoning of rows selected by `filter`.
///
/// Themes are sorted by descending frequency; equal frequencies keep the
/// order in which terms were first seen.
///
/// # Examples
///
/// ```
/// use sigma_taste_analysis::{comparison::DimensionFilter, reasoning::mine_reasoning_themes};
///
/// assert!(mine_reasoning_themes(&[], &DimensionFilter::All).is_empty());
/// ```
#[must_use]
pub fn mine_reasoning_themes(rows: &[TrainingRow], filter: &DimensionFilter) -> Vec<ReasoningTheme> {
    let mut order: Vec<String> = vec![];
    let mut tallies: HashMap<String, ThemeTally> = HashMap::new();

    for row in rows.iter().filter(|r| filter.matches(&r.dimension)) {
        if row.reasoning.is_empty() {
            continue;
        }
        let text = row.reasoning.to_lowercase();
        let words = tokenize(&text);

        for term in candidate_terms(&words) {
            let tally = tallies.entry(term.clone()).or_insert_with(|| {
                order.push(term.clone());
                ThemeTally::default()
            });
            tally.frequency += 1;
            tally.wins.insert(row.winner_id.clone());
            tally.losses.insert(row.loser_id.clone());
            if tally.contexts.len() < MAX_CONTEXTS {
                tally.contexts.extend(context_snippet(&text, &term));
            }
        }
    }

    let mut themes = order
        .into_iter()
        .filter_map(|term| {
            let tally = tallies.remove(&term)?;
            is_kept(&term, tally.frequency).then(|| ReasoningTheme {
                term,
                frequency: tally.frequency,
                associated_wins: tally.wins.into_iter().collect(),
                associated_losses: tally.losses.into_iter().collect(),
                contexts: tally.contexts,
            })
        })
        .collect::<Vec<_>>();
    themes.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    themes.truncate(MAX_THEMES);
    themes
}
