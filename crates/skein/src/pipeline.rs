//! Clustering pipeline
//!
//! The single entry point: a pure function from (records, config) to a
//! report. Dedup, quality filtering, feature extraction, pairwise scoring,
//! component extraction, and post-processing run in order; data-quality
//! problems land in the report, never in an error.

use crate::config::ClusterConfig;
use crate::dedup;
use crate::features;
use crate::graph;
use crate::postprocess;
use crate::quality;
use crate::record::InsightRecord;
use crate::report::{ExcludedReport, Report, StandaloneReport, Summary};
use crate::similarity;

/// Run the full clustering pipeline over an ordered record pool
pub fn run(records: Vec<InsightRecord>, config: &ClusterConfig) -> Report {
  let records_loaded = records.len();
  tracing::debug!(records = records_loaded, "starting clustering pipeline");

  let outcome = dedup::dedup(records);
  let duplicates_removed = outcome.duplicates_removed;
  tracing::debug!(duplicates_removed, "deduplicated record pool");

  let mut records = outcome.records;
  quality::annotate(&mut records);
  let (mut survivors, excluded_records) = quality::partition(records);
  for record in &excluded_records {
    tracing::info!(id = %record.id, quality = record.quality, "excluded below quality floor");
  }

  features::annotate(&mut survivors);

  let edges = similarity::score_all(&survivors);
  tracing::debug!(survivors = survivors.len(), edges = edges.len(), "scored record pairs");

  let components = graph::connected_components(survivors.len(), &edges, config.cluster_minimum);

  let mut clusters = Vec::new();
  for members in components.clusters {
    clusters.extend(postprocess::process_cluster(members, &survivors, config));
  }

  let mut standalones = Vec::new();
  for index in components.standalones {
    let record = &survivors[index];
    let normalized_quality = quality::normalized(record.quality);
    if normalized_quality >= config.standalone_quality {
      standalones.push(StandaloneReport {
        id: record.id.clone(),
        title: record.title.clone(),
        category: record.category.clone(),
        quality: record.quality,
        normalized_quality,
      });
    } else {
      tracing::debug!(id = %record.id, quality = record.quality, "standalone below promotion threshold");
    }
  }

  let excluded: Vec<ExcludedReport> = excluded_records
    .iter()
    .map(|record| ExcludedReport {
      id: record.id.clone(),
      title: record.title.clone(),
      quality: record.quality,
    })
    .collect();

  let summary = Summary {
    records_loaded,
    duplicates_removed,
    surviving: survivors.len(),
    cluster_count: clusters.len(),
    standalone_count: standalones.len(),
    excluded_count: excluded.len(),
  };
  tracing::debug!(
    clusters = summary.cluster_count,
    standalones = summary.standalone_count,
    excluded = summary.excluded_count,
    "clustering pipeline finished"
  );

  Report { summary, clusters, standalones, excluded }
}
