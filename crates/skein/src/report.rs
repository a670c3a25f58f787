//! Clustering report
//!
//! The pipeline's only output: clusters, promoted standalones, and the
//! records excluded by the quality filter, kept for auditability.

use serde::{Deserialize, Serialize};

/// Skill-structure recommendation by size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
  Minimal,
  Standard,
  Complex,
}

impl Complexity {
  /// minimal for singletons, standard for 2-4 members, complex for 5+
  pub fn for_size(size: usize) -> Self {
    match size {
      0 | 1 => Complexity::Minimal,
      2..=4 => Complexity::Standard,
      _ => Complexity::Complex,
    }
  }
}

/// Coarse structural template suggested for a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
  PhaseBased,
  ModeBased,
  Validation,
  DataProcessing,
}

/// One cluster member, id plus its human-readable title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRef {
  pub id: String,
  pub title: String,
}

/// A connected group of records treated as one skill candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
  pub members: Vec<MemberRef>,
  pub dominant_category: String,
  /// Keywords appearing in at least two members, aggregate weight descending
  pub shared_keywords: Vec<String>,
  pub complexity: Complexity,
  pub pattern: Pattern,
  /// Set when an oversized cluster resisted every split policy
  #[serde(default)]
  pub needs_manual_review: bool,
}

/// A high-quality record with no qualifying peers, promoted individually
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandaloneReport {
  pub id: String,
  pub title: String,
  pub category: String,
  pub quality: u8,
  pub normalized_quality: f32,
}

/// A record dropped by the quality filter, kept for auditability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedReport {
  pub id: String,
  pub title: String,
  pub quality: u8,
}

/// Run-level counts for the summary line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
  pub records_loaded: usize,
  pub duplicates_removed: usize,
  pub surviving: usize,
  pub cluster_count: usize,
  pub standalone_count: usize,
  pub excluded_count: usize,
}

/// Full clustering report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub summary: Summary,
  pub clusters: Vec<ClusterReport>,
  pub standalones: Vec<StandaloneReport>,
  pub excluded: Vec<ExcludedReport>,
}
