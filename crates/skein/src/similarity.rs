//! Pairwise similarity scoring
//!
//! Additive lexical score over independent signals. Roughly on a [0, 1]
//! scale, but the shared-keyword term is uncapped so dense overlaps can push
//! a pair above 1.0; threshold comparisons tolerate that.

use rayon::prelude::*;
use std::collections::HashSet;

use crate::features;
use crate::record::InsightRecord;

/// Awarded when both records carry the same category label
const SAME_CATEGORY: f32 = 0.30;

/// Awarded per keyword shared by token identity
const PER_SHARED_KEYWORD: f32 = 0.10;

/// Awarded when the records were created within the recency window
const RECENT_PAIR: f32 = 0.05;

/// Scales the Jaccard overlap of title token sets
const TITLE_OVERLAP: f32 = 0.15;

/// Scales the shared-over-distinct keyword fraction
const CONCEPT_OVERLAP: f32 = 0.20;

/// Creation dates this close count as related work
const RECENCY_WINDOW_DAYS: i64 = 7;

/// One scored, unordered pair of record indices (`a < b`)
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEdge {
  pub a: usize,
  pub b: usize,
  pub score: f32,
}

/// Score a pair of feature-annotated records; symmetric by construction
pub fn score_pair(a: &InsightRecord, b: &InsightRecord) -> f32 {
  let mut score = 0.0;

  if a.category == b.category {
    score += SAME_CATEGORY;
  }

  let shared = shared_keyword_count(a, b);
  score += PER_SHARED_KEYWORD * shared as f32;

  if (a.date - b.date).num_days().abs() <= RECENCY_WINDOW_DAYS {
    score += RECENT_PAIR;
  }

  score += TITLE_OVERLAP * title_overlap(&a.title, &b.title);
  score += CONCEPT_OVERLAP * concept_overlap(a, b, shared);

  score
}

/// Score every unordered pair of records.
///
/// Each pair is independent, so the O(n^2) pass fans out across worker
/// threads; the indexed collect keeps the edge order deterministic.
pub fn score_all(records: &[InsightRecord]) -> Vec<SimilarityEdge> {
  let mut pairs = Vec::new();
  for a in 0..records.len() {
    for b in (a + 1)..records.len() {
      pairs.push((a, b));
    }
  }

  pairs
    .into_par_iter()
    .map(|(a, b)| SimilarityEdge { a, b, score: score_pair(&records[a], &records[b]) })
    .collect()
}

/// Keywords present in both records, by token identity
fn shared_keyword_count(a: &InsightRecord, b: &InsightRecord) -> usize {
  let (small, large) =
    if a.keywords.len() <= b.keywords.len() { (a, b) } else { (b, a) };

  small.keywords.keys().filter(|token| large.keywords.contains_key(*token)).count()
}

/// Jaccard overlap of the two title token sets
fn title_overlap(a: &str, b: &str) -> f32 {
  let a: HashSet<String> = features::tokenize(a).into_iter().collect();
  let b: HashSet<String> = features::tokenize(b).into_iter().collect();

  if a.is_empty() || b.is_empty() {
    return 0.0;
  }

  let intersection = a.intersection(&b).count();
  let union = a.union(&b).count();
  intersection as f32 / union as f32
}

/// Shared keywords over distinct keywords across both records
fn concept_overlap(a: &InsightRecord, b: &InsightRecord, shared: usize) -> f32 {
  let distinct: HashSet<&String> = a.keywords.keys().chain(b.keywords.keys()).collect();

  if distinct.is_empty() {
    return 0.0;
  }

  shared as f32 / distinct.len() as f32
}
