//! Heuristic quality scoring
//!
//! Rates how actionable and substantial an insight is on a 0-9 scale, then
//! partitions the pool into clustering survivors and excluded records.

use regex::Regex;

use crate::record::InsightRecord;

/// Highest score the point table can award
pub const MAX_SCORE: u8 = 9;

/// Records scoring below this never reach similarity scoring
pub const CLUSTERING_FLOOR: u8 = 4;

/// Body length that earns the substance point
const WORD_COUNT_BAR: usize = 200;

/// Markers treated as a warning or caution callout
const WARNING_MARKERS: &[&str] = &["warning", "caution", "beware", "pitfall", "gotcha", "⚠"];

/// Score one record against the additive point table:
/// checklist item +3, fenced code block +2, numbered step sequence +2,
/// body over 200 words +1, warning marker +1.
pub fn score(record: &InsightRecord) -> u8 {
  let body = &record.body;
  let mut points = 0;

  if has_checklist_line(body) {
    points += 3;
  }
  if fenced_block_count(body) >= 1 {
    points += 2;
  }
  if numbered_line_count(body) >= 2 {
    points += 2;
  }
  if body.split_whitespace().count() > WORD_COUNT_BAR {
    points += 1;
  }
  if has_warning_marker(body) {
    points += 1;
  }

  points
}

/// Quality on a 0-1 scale, for comparison against promotion thresholds
pub fn normalized(score: u8) -> f32 {
  score as f32 / MAX_SCORE as f32
}

/// Annotate every record in place with its quality score
pub fn annotate(records: &mut [InsightRecord]) {
  for record in records {
    record.quality = score(record);
  }
}

/// Split annotated records into (survivors, excluded), both in input order
pub fn partition(records: Vec<InsightRecord>) -> (Vec<InsightRecord>, Vec<InsightRecord>) {
  let mut survivors = Vec::new();
  let mut excluded = Vec::new();

  for record in records {
    if record.quality >= CLUSTERING_FLOOR {
      survivors.push(record);
    } else {
      excluded.push(record);
    }
  }

  (survivors, excluded)
}

fn has_checklist_line(body: &str) -> bool {
  body.lines().any(|line| {
    let trimmed = line.trim_start();
    trimmed.starts_with("- [ ]")
      || trimmed.starts_with("- [x]")
      || trimmed.starts_with("- [X]")
      || trimmed.starts_with("* [ ]")
      || trimmed.starts_with("* [x]")
      || trimmed.starts_with("* [X]")
  })
}

fn fenced_block_count(body: &str) -> usize {
  let fence_lines = body.lines().filter(|line| line.trim_start().starts_with("```")).count();
  fence_lines / 2
}

fn numbered_line_count(body: &str) -> usize {
  let numbered = Regex::new(r"^\d+[.)]\s").unwrap();
  body.lines().filter(|line| numbered.is_match(line.trim_start())).count()
}

fn has_warning_marker(body: &str) -> bool {
  let lowered = body.to_lowercase();
  WARNING_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn record(body: &str) -> InsightRecord {
    InsightRecord::new(
      "Scored record".to_string(),
      body.to_string(),
      "testing".to_string(),
      Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
      "test".to_string(),
    )
  }

  #[test]
  fn test_checklist_scores_three() {
    assert_eq!(score(&record("- [ ] write the fix")), 3);
    assert_eq!(score(&record("* [x] already done")), 3);
  }

  #[test]
  fn test_fenced_code_scores_two() {
    assert_eq!(score(&record("```\nlet x = 1;\n```")), 2);
  }

  #[test]
  fn test_numbered_sequence_scores_two() {
    assert_eq!(score(&record("1. do this\n2. then that")), 2);
  }

  #[test]
  fn test_single_numbered_line_is_not_a_sequence() {
    assert_eq!(score(&record("1. a lone step")), 0);
  }

  #[test]
  fn test_long_body_scores_one() {
    let body = "word ".repeat(201);
    assert_eq!(score(&record(&body)), 1);
  }

  #[test]
  fn test_warning_marker_scores_one() {
    assert_eq!(score(&record("Caution: this resets the index")), 1);
  }

  #[test]
  fn test_rich_record_scores_five() {
    // three code blocks, two numbered steps, 250 words, no checklist,
    // no warnings: 2 + 2 + 1
    let filler = "word ".repeat(250);
    let body = format!("1. first\n2. second\n```\na\n```\n```\nb\n```\n```\nc\n```\n{filler}");
    assert_eq!(score(&record(&body)), 5);
  }

  #[test]
  fn test_thin_record_scores_zero() {
    let body = "a short note with no structure and not much content at all";
    assert_eq!(score(&record(body)), 0);
  }

  #[test]
  fn test_full_table_scores_nine() {
    let filler = "word ".repeat(201);
    let body =
      format!("- [ ] fix it\n1. step one\n2. step two\n```\ncode\n```\nWarning: risky\n{filler}");
    assert_eq!(score(&record(&body)), MAX_SCORE);
  }

  #[test]
  fn test_scoring_is_deterministic() {
    let body = "- [ ] same text\n```\nsame code\n```";
    assert_eq!(score(&record(body)), score(&record(body)));
  }

  #[test]
  fn test_normalized_scale() {
    assert_eq!(normalized(0), 0.0);
    assert_eq!(normalized(MAX_SCORE), 1.0);
    assert!((normalized(5) - 5.0 / 9.0).abs() < f32::EPSILON);
  }

  #[test]
  fn test_partition_keeps_input_order() {
    let mut records = vec![
      record("- [ ] keep me\n```\ncode\n```"),
      record("too thin"),
      record("- [ ] also kept\n```\nmore\n```"),
    ];
    annotate(&mut records);

    let (survivors, excluded) = partition(records);
    assert_eq!(survivors.len(), 2);
    assert_eq!(excluded.len(), 1);
    assert!(survivors[0].body.contains("keep me"));
    assert!(survivors[1].body.contains("also kept"));
    assert_eq!(excluded[0].quality, 0);
  }
}
