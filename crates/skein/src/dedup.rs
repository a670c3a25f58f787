use std::collections::HashSet;

use crate::record::{fingerprint, InsightRecord};

/// Result of a deduplication pass
#[derive(Debug)]
pub struct DedupOutcome {
  pub records: Vec<InsightRecord>,
  pub duplicates_removed: usize,
}

/// Collapse near-identical records by content fingerprint.
///
/// Ordering matters: the first occurrence of a fingerprint wins and later
/// ones are dropped, so the output preserves the loader's iteration order.
pub fn dedup(records: Vec<InsightRecord>) -> DedupOutcome {
  let mut seen: HashSet<String> = HashSet::new();
  let mut kept = Vec::with_capacity(records.len());
  let mut duplicates_removed = 0;

  for record in records {
    let print = fingerprint(&record.title, &record.body);
    if seen.insert(print) {
      kept.push(record);
    } else {
      duplicates_removed += 1;
    }
  }

  DedupOutcome { records: kept, duplicates_removed }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn record(title: &str, body: &str) -> InsightRecord {
    InsightRecord::new(
      title.to_string(),
      body.to_string(),
      "testing".to_string(),
      Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
      "test".to_string(),
    )
  }

  #[test]
  fn test_first_occurrence_wins() {
    let records = vec![
      record("Same title", "same body, first copy"),
      record("Other title", "unrelated"),
      record("Same title", "same body, first copy"),
    ];

    let outcome = dedup(records);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.duplicates_removed, 1);
    assert_eq!(outcome.records[0].body, "same body, first copy");
    assert_eq!(outcome.records[1].title, "Other title");
  }

  #[test]
  fn test_near_duplicates_beyond_window_collapse() {
    let base = "word ".repeat(60);
    let records = vec![
      record("Same title", &format!("{base}original ending")),
      record("Same title", &format!("{base}different trailing content entirely")),
    ];

    let outcome = dedup(records);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.duplicates_removed, 1);
    assert!(outcome.records[0].body.ends_with("original ending"));
  }

  #[test]
  fn test_dedup_is_idempotent() {
    let records = vec![
      record("One", "body one"),
      record("Two", "body two"),
      record("One", "body one"),
    ];

    let first = dedup(records);
    assert_eq!(first.duplicates_removed, 1);

    let second = dedup(first.records);
    assert_eq!(second.duplicates_removed, 0);
    assert_eq!(second.records.len(), 2);
  }

  #[test]
  fn test_empty_input() {
    let outcome = dedup(Vec::new());
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.duplicates_removed, 0);
  }
}
