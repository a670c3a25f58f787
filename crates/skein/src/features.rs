//! Keyword extraction
//!
//! Builds the weighted keyword multiset for each quality-surviving record.
//! Title tokens carry double weight: titles are human-curated summaries and
//! hold more topical signal than incidental body vocabulary.

use std::collections::{HashMap, HashSet};

use crate::record::InsightRecord;

/// Weight multiplier applied to title tokens
const TITLE_WEIGHT: u32 = 2;

/// Shortest token worth keeping
const MIN_TOKEN_LEN: usize = 3;

// violet ignore chunk
/// Common English stop words filtered out of keyword extraction
const STOP_WORDS: &[&str] = &[
  // Articles and determiners
  "the", "a", "an", "this", "that", "these", "those", "some", "any", "each",
  // Conjunctions
  "and", "or", "but", "nor", "so", "yet",
  // Prepositions
  "in", "on", "at", "to", "for", "of", "with", "by", "over", "into", "from", "about",
  // Common verbs
  "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
  "will", "would", "could", "should", "can", "may", "might", "must", "get", "got", "use", "used",
  "using", "make", "makes", "made",
  // Pronouns
  "you", "your", "we", "our", "us", "they", "them", "their", "it", "its", "he", "she", "him",
  "her", "one", "all", "not", "when", "how", "what", "which", "who", "where", "why", "there",
  "here", "also", "just", "only", "more", "most", "other", "than", "then", "very", "such", "via",
];

/// Stop words as a set for fast lookup
pub fn stop_words() -> HashSet<&'static str> {
  STOP_WORDS.iter().copied().collect()
}

/// Split text into lowercase tokens, dropping short tokens and stop words
pub fn tokenize(text: &str) -> Vec<String> {
  let stop_words = stop_words();

  text
    .split(|c: char| !c.is_alphanumeric())
    .map(|word| word.to_lowercase())
    .filter(|word| word.len() >= MIN_TOKEN_LEN && !stop_words.contains(word.as_str()))
    .collect()
}

/// Build the weighted keyword multiset for one record
pub fn extract(record: &InsightRecord) -> HashMap<String, u32> {
  let mut keywords: HashMap<String, u32> = HashMap::new();

  for token in tokenize(&record.title) {
    *keywords.entry(token).or_insert(0) += TITLE_WEIGHT;
  }
  for token in tokenize(&record.body) {
    *keywords.entry(token).or_insert(0) += 1;
  }

  keywords
}

/// Annotate every record in place with its keyword multiset
pub fn annotate(records: &mut [InsightRecord]) {
  for record in records {
    record.keywords = extract(record);
  }
}
