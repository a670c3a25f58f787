use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Characters of normalized body text that feed the content fingerprint
const FINGERPRINT_BODY_CHARS: usize = 200;

/// One unit of extracted knowledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecord {
  pub id: String,
  pub title: String,
  pub body: String,
  pub category: String,
  pub date: DateTime<Utc>,
  /// Opaque pointer to the record's origin (file path, session id)
  pub source: String,
  /// Weighted keyword multiset; empty until the feature extractor runs
  #[serde(default)]
  pub keywords: HashMap<String, u32>,
  /// Heuristic 0-9 quality score; 0 until the quality scorer runs
  #[serde(default)]
  pub quality: u8,
}

impl InsightRecord {
  /// Create a record with its id derived from the content fingerprint
  pub fn new(
    title: String,
    body: String,
    category: String,
    date: DateTime<Utc>,
    source: String,
  ) -> Self {
    let id = fingerprint(&title, &body);
    Self { id, title, body, category, date, source, keywords: HashMap::new(), quality: 0 }
  }
}

/// Lowercase, strip punctuation to spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
  let stripped: String = text
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() { c } else { ' ' })
    .collect();

  stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Content fingerprint: hash of the normalized title plus the first 200
/// characters of the normalized body. An empty body degenerates to a title
/// hash, which is still a valid fingerprint.
pub fn fingerprint(title: &str, body: &str) -> String {
  let normalized_title = normalize(title);
  let normalized_body: String = normalize(body).chars().take(FINGERPRINT_BODY_CHARS).collect();

  let mut hasher = Sha256::new();
  hasher.update(normalized_title.as_bytes());
  hasher.update(normalized_body.as_bytes());
  let digest = hasher.finalize();

  digest.iter().take(8).map(|byte| format!("{byte:02x}")).collect()
}
