//! Configuration management
//!
//! Thresholds travel as an explicit struct passed into every pipeline call,
//! never module-level state, so runs stay pure and testable with varied
//! settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Clustering thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
  /// Minimum pairwise similarity for an edge between two records
  #[serde(default = "default_cluster_minimum")]
  pub cluster_minimum: f32,
  /// Minimum normalized quality to promote an unclustered record
  #[serde(default = "default_standalone_quality")]
  pub standalone_quality: f32,
  /// Cluster size beyond which a split is attempted
  #[serde(default = "default_max_cluster_size")]
  pub max_cluster_size: usize,
}

fn default_cluster_minimum() -> f32 {
  0.6
}
fn default_standalone_quality() -> f32 {
  0.8
}
fn default_max_cluster_size() -> usize {
  5
}

impl Default for ClusterConfig {
  fn default() -> Self {
    Self {
      cluster_minimum: default_cluster_minimum(),
      standalone_quality: default_standalone_quality(),
      max_cluster_size: default_max_cluster_size(),
    }
  }
}

impl ClusterConfig {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: ClusterConfig = serde_json::from_str(&content)?;
    Ok(config)
  }

  /// Load configuration from the current directory or fall back to defaults
  pub fn load() -> Result<Self> {
    let config_paths = [".skein.json", "skein.json"];

    for path in &config_paths {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    Ok(ClusterConfig::default())
  }
}
