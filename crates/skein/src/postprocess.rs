//! Cluster post-processing
//!
//! Splits oversized clusters and computes per-cluster characteristics:
//! dominant category, shared keywords, and structure recommendations.

use std::collections::{HashMap, HashSet};

use crate::config::ClusterConfig;
use crate::graph::UnionFind;
use crate::record::InsightRecord;
use crate::report::{ClusterReport, Complexity, MemberRef, Pattern};

/// Shared keywords considered when re-clustering an oversized cluster
const SPLIT_KEYWORD_LIMIT: usize = 5;

// violet ignore chunk
/// Cue vocabularies matched against member bodies. Highest total hit count
/// wins; ties (including zero hits everywhere) fall back to phase-based.
const CUE_VOCABULARIES: &[(Pattern, &[&str])] = &[
  (Pattern::PhaseBased, &["first", "then", "next", "finally", "step", "phase", "stage"]),
  (Pattern::ModeBased, &["alternatively", "either", "option", "mode", "depending", "instead"]),
  (Pattern::Validation, &["verify", "check", "validate", "ensure", "audit", "confirm"]),
  (Pattern::DataProcessing, &["parse", "transform", "convert", "extract", "serialize", "format"]),
];

/// Characterize a cluster, splitting it first when it exceeds the size cap.
///
/// Split policies apply in priority order (temporal, keyword sub-groups,
/// quality median); the first one yielding at least two sub-groups of two or
/// more members wins, and still-oversized pieces are processed again. A
/// cluster that resists every policy is kept whole and flagged for review.
pub fn process_cluster(
  members: Vec<usize>,
  records: &[InsightRecord],
  config: &ClusterConfig,
) -> Vec<ClusterReport> {
  if members.len() > config.max_cluster_size {
    if let Some(parts) = split_oversized(&members, records) {
      return parts
        .into_iter()
        .flat_map(|part| process_cluster(part, records, config))
        .collect();
    }
    return vec![characterize(&members, records, true)];
  }

  vec![characterize(&members, records, false)]
}

fn split_oversized(members: &[usize], records: &[InsightRecord]) -> Option<Vec<Vec<usize>>> {
  temporal_split(members, records)
    .or_else(|| keyword_split(members, records))
    .or_else(|| quality_split(members, records))
}

/// Partition at the midpoint of the member date range
fn temporal_split(members: &[usize], records: &[InsightRecord]) -> Option<Vec<Vec<usize>>> {
  let earliest = members.iter().map(|&member| records[member].date).min()?;
  let latest = members.iter().map(|&member| records[member].date).max()?;
  if earliest == latest {
    return None;
  }

  let midpoint = earliest + (latest - earliest) / 2;
  let (early, late): (Vec<usize>, Vec<usize>) =
    members.iter().copied().partition(|&member| records[member].date <= midpoint);

  (early.len() >= 2 && late.len() >= 2).then_some(vec![early, late])
}

/// Re-cluster members on the top shared keywords alone, ignoring
/// category and date
fn keyword_split(members: &[usize], records: &[InsightRecord]) -> Option<Vec<Vec<usize>>> {
  let top: HashSet<String> = shared_keywords(members, records)
    .into_iter()
    .take(SPLIT_KEYWORD_LIMIT)
    .collect();
  if top.is_empty() {
    return None;
  }

  let member_tops: Vec<HashSet<&str>> = members
    .iter()
    .map(|&member| {
      records[member]
        .keywords
        .keys()
        .filter(|keyword| top.contains(*keyword))
        .map(String::as_str)
        .collect()
    })
    .collect();

  let mut sets = UnionFind::new(members.len());
  for a in 0..members.len() {
    for b in (a + 1)..members.len() {
      if !member_tops[a].is_disjoint(&member_tops[b]) {
        sets.union(a, b);
      }
    }
  }

  let mut order: Vec<usize> = Vec::new();
  let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
  for position in 0..members.len() {
    let root = sets.find(position);
    if !groups.contains_key(&root) {
      order.push(root);
    }
    groups.entry(root).or_default().push(members[position]);
  }

  let parts: Vec<Vec<usize>> =
    order.iter().filter_map(|root| groups.remove(root)).collect();
  let solid = parts.iter().filter(|part| part.len() >= 2).count();

  (parts.len() >= 2 && solid >= 2).then_some(parts)
}

/// Partition at the member quality median
fn quality_split(members: &[usize], records: &[InsightRecord]) -> Option<Vec<Vec<usize>>> {
  let mut scores: Vec<u8> = members.iter().map(|&member| records[member].quality).collect();
  scores.sort_unstable();

  let middle = scores.len() / 2;
  let median = if scores.len() % 2 == 0 {
    (scores[middle - 1] as f32 + scores[middle] as f32) / 2.0
  } else {
    scores[middle] as f32
  };

  let (below, above): (Vec<usize>, Vec<usize>) =
    members.iter().copied().partition(|&member| records[member].quality as f32 <= median);

  (below.len() >= 2 && above.len() >= 2).then_some(vec![below, above])
}

/// Annotate one final cluster with its characteristics
fn characterize(
  members: &[usize],
  records: &[InsightRecord],
  needs_manual_review: bool,
) -> ClusterReport {
  ClusterReport {
    members: members
      .iter()
      .map(|&member| MemberRef {
        id: records[member].id.clone(),
        title: records[member].title.clone(),
      })
      .collect(),
    dominant_category: dominant_category(members, records),
    shared_keywords: shared_keywords(members, records),
    complexity: Complexity::for_size(members.len()),
    pattern: pattern_for(members, records),
    needs_manual_review,
  }
}

/// Mode of the member categories, ties broken by earliest-seen category
fn dominant_category(members: &[usize], records: &[InsightRecord]) -> String {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  let mut first_seen: Vec<&str> = Vec::new();

  for &member in members {
    let category = records[member].category.as_str();
    if !counts.contains_key(category) {
      first_seen.push(category);
    }
    *counts.entry(category).or_insert(0) += 1;
  }

  // only a strictly higher count replaces the leader, so ties keep the
  // earliest-seen category
  let mut leader = "";
  let mut leader_count = 0;
  for category in first_seen {
    let count = counts.get(category).copied().unwrap_or(0);
    if count > leader_count {
      leader = category;
      leader_count = count;
    }
  }

  leader.to_string()
}

/// Keywords present in at least two members, aggregate weight descending
/// (alphabetical on ties, for reproducible output)
fn shared_keywords(members: &[usize], records: &[InsightRecord]) -> Vec<String> {
  let mut member_counts: HashMap<&str, usize> = HashMap::new();
  let mut weights: HashMap<&str, u32> = HashMap::new();

  for &member in members {
    for (keyword, weight) in &records[member].keywords {
      *member_counts.entry(keyword.as_str()).or_insert(0) += 1;
      *weights.entry(keyword.as_str()).or_insert(0) += weight;
    }
  }

  let mut shared: Vec<(&str, u32)> = member_counts
    .into_iter()
    .filter(|(_, count)| *count >= 2)
    .map(|(keyword, _)| (keyword, weights[keyword]))
    .collect();

  shared.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
  shared.into_iter().map(|(keyword, _)| keyword.to_string()).collect()
}

/// Best-matching cue vocabulary over the member bodies
fn pattern_for(members: &[usize], records: &[InsightRecord]) -> Pattern {
  let bodies: Vec<String> =
    members.iter().map(|&member| records[member].body.to_lowercase()).collect();

  let hits: Vec<(Pattern, usize)> = CUE_VOCABULARIES
    .iter()
    .map(|(pattern, phrases)| {
      let total = bodies
        .iter()
        .map(|body| phrases.iter().map(|phrase| body.matches(phrase).count()).sum::<usize>())
        .sum();
      (*pattern, total)
    })
    .collect();

  let best = hits.iter().map(|(_, count)| *count).max().unwrap_or(0);
  let winners: Vec<Pattern> =
    hits.iter().filter(|(_, count)| *count == best).map(|(pattern, _)| *pattern).collect();

  if best == 0 || winners.len() > 1 {
    Pattern::PhaseBased
  } else {
    winners[0]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn record(title: &str, body: &str, category: &str, day: u32, quality: u8) -> InsightRecord {
    let mut record = InsightRecord::new(
      title.to_string(),
      body.to_string(),
      category.to_string(),
      Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
      "test".to_string(),
    );
    record.quality = quality;
    record.keywords = crate::features::extract(&record);
    record
  }

  fn config(max_cluster_size: usize) -> ClusterConfig {
    ClusterConfig { max_cluster_size, ..ClusterConfig::default() }
  }

  #[test]
  fn test_small_cluster_is_characterized_in_place() {
    let records = vec![
      record("flaky suite", "verify the suite, check the retries", "testing", 1, 5),
      record("flaky retries", "validate and confirm retries pass", "testing", 2, 5),
    ];

    let reports = process_cluster(vec![0, 1], &records, &config(5));
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report.dominant_category, "testing");
    assert_eq!(report.complexity, Complexity::Standard);
    assert_eq!(report.pattern, Pattern::Validation);
    assert!(!report.needs_manual_review);
    assert_eq!(report.members.len(), 2);
  }

  #[test]
  fn test_dominant_category_tie_breaks_on_first_seen() {
    let records = vec![
      record("one", "body", "architecture", 1, 5),
      record("two", "body", "testing", 2, 5),
      record("three", "body", "testing", 3, 5),
      record("four", "body", "architecture", 4, 5),
    ];

    assert_eq!(dominant_category(&[0, 1, 2, 3], &records), "architecture");
    assert_eq!(dominant_category(&[1, 0, 3, 2], &records), "testing");
  }

  #[test]
  fn test_shared_keywords_require_two_members() {
    let records = vec![
      record("flaky suite", "timeout budget", "testing", 1, 5),
      record("flaky parser", "timeout spikes", "testing", 2, 5),
    ];

    let shared = shared_keywords(&[0, 1], &records);
    // flaky: title weight in both (4) beats timeout: body weight in both (2)
    assert_eq!(shared, vec!["flaky".to_string(), "timeout".to_string()]);
  }

  #[test]
  fn test_pattern_defaults_to_phase_based() {
    let records = vec![record("quiet", "no structural cues at all", "testing", 1, 5)];
    assert_eq!(pattern_for(&[0], &records), Pattern::PhaseBased);
  }

  #[test]
  fn test_pattern_tie_defaults_to_phase_based() {
    // one mode-based hit and one data-processing hit
    let records =
      vec![record("tied", "either way we parse the log", "testing", 1, 5)];
    assert_eq!(pattern_for(&[0], &records), Pattern::PhaseBased);
  }

  #[test]
  fn test_pattern_picks_highest_hit_count() {
    let records = vec![record(
      "pipeline",
      "parse the input, transform the rows, convert to events",
      "testing",
      1,
      5,
    )];
    assert_eq!(pattern_for(&[0], &records), Pattern::DataProcessing);
  }

  #[test]
  fn test_temporal_split_fires_first() {
    let records = vec![
      record("one", "early body", "testing", 1, 5),
      record("two", "early body", "testing", 2, 5),
      record("three", "early body", "testing", 3, 5),
      record("four", "late body", "testing", 20, 5),
      record("five", "late body", "testing", 21, 5),
      record("six", "late body", "testing", 22, 5),
    ];

    let reports = process_cluster((0..6).collect(), &records, &config(5));
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].members.len(), 3);
    assert_eq!(reports[1].members.len(), 3);
    assert!(reports.iter().all(|report| !report.needs_manual_review));
  }

  #[test]
  fn test_temporal_split_rejects_lone_halves() {
    // five early members, one late straggler: both halves must keep two
    let members: Vec<InsightRecord> = vec![
      record("one", "body", "testing", 1, 5),
      record("two", "body", "testing", 1, 5),
      record("three", "body", "testing", 1, 5),
      record("four", "body", "testing", 1, 5),
      record("five", "body", "testing", 1, 5),
      record("six", "body", "testing", 28, 5),
    ];

    assert!(temporal_split(&[0, 1, 2, 3, 4, 5], &members).is_none());
  }

  #[test]
  fn test_keyword_split_separates_subgroups() {
    // same day defeats the temporal policy; two disjoint keyword families
    let records = vec![
      record("flaky suite retries", "", "testing", 1, 5),
      record("flaky suite retries", "", "testing", 1, 5),
      record("flaky suite retries", "", "testing", 1, 5),
      record("flaky suite retries", "", "testing", 1, 5),
      record("parser grammar tokens", "", "testing", 1, 5),
      record("parser grammar tokens", "", "testing", 1, 5),
      record("parser grammar tokens", "", "testing", 1, 5),
    ];

    let reports = process_cluster((0..7).collect(), &records, &config(5));
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].members.len(), 4);
    assert_eq!(reports[1].members.len(), 3);
    assert!(reports[0].shared_keywords.contains(&"flaky".to_string()));
    assert!(reports[1].shared_keywords.contains(&"parser".to_string()));
  }

  #[test]
  fn test_quality_split_on_median() {
    // identical dates and keywords leave only the quality policy
    let records = vec![
      record("same keywords here", "", "testing", 1, 4),
      record("same keywords here", "", "testing", 1, 4),
      record("same keywords here", "", "testing", 1, 4),
      record("same keywords here", "", "testing", 1, 8),
      record("same keywords here", "", "testing", 1, 8),
      record("same keywords here", "", "testing", 1, 9),
    ];

    let reports = process_cluster((0..6).collect(), &records, &config(5));
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].members.len(), 3);
    assert_eq!(reports[1].members.len(), 3);
  }

  #[test]
  fn test_unsplittable_cluster_is_flagged() {
    // same day, same keywords, same quality: nothing can split this
    let records: Vec<InsightRecord> = (0..6)
      .map(|_| record("same keywords here", "", "testing", 1, 5))
      .collect();

    let reports = process_cluster((0..6).collect(), &records, &config(5));
    assert_eq!(reports.len(), 1);
    assert!(reports[0].needs_manual_review);
    assert_eq!(reports[0].complexity, Complexity::Complex);
    assert_eq!(reports[0].members.len(), 6);
  }
}
