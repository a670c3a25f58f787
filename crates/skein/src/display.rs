//! Report rendering for terminal output

use colored::*;

use crate::report::{ClusterReport, Complexity, Pattern, Report};

fn complexity_label(complexity: Complexity) -> &'static str {
  match complexity {
    Complexity::Minimal => "minimal",
    Complexity::Standard => "standard",
    Complexity::Complex => "complex",
  }
}

fn pattern_label(pattern: Pattern) -> &'static str {
  match pattern {
    Pattern::PhaseBased => "phase-based",
    Pattern::ModeBased => "mode-based",
    Pattern::Validation => "validation",
    Pattern::DataProcessing => "data-processing",
  }
}

/// Render the full report to stdout
pub fn render(report: &Report) {
  let summary = &report.summary;
  println!(
    "{} records, {} duplicates removed, {} surviving",
    summary.records_loaded.to_string().cyan(),
    summary.duplicates_removed.to_string().yellow(),
    summary.surviving.to_string().cyan(),
  );
  println!();

  if report.clusters.is_empty() {
    println!("No clusters formed.");
  }
  for (index, cluster) in report.clusters.iter().enumerate() {
    render_cluster(index + 1, cluster);
  }

  if !report.standalones.is_empty() {
    println!("{}", "Standalone candidates".blue().bold());
    for standalone in &report.standalones {
      println!(
        "  {} {}/{} (quality {})",
        "✓".green(),
        standalone.category.cyan(),
        standalone.title.yellow(),
        standalone.quality,
      );
    }
    println!();
  }

  if !report.excluded.is_empty() {
    println!("{}", "Excluded by quality filter".blue().bold());
    for excluded in &report.excluded {
      println!("  {} {} (quality {})", "✗".red(), excluded.title, excluded.quality);
    }
    println!();
  }
}

fn render_cluster(number: usize, cluster: &ClusterReport) {
  let header = format!(
    "=== cluster {}: {} ({} members) ===",
    number,
    cluster.dominant_category,
    cluster.members.len()
  );
  println!("{}", header.blue().bold());

  for member in &cluster.members {
    println!("  {} {}", member.id.dimmed(), member.title.yellow());
  }

  if !cluster.shared_keywords.is_empty() {
    println!("  keywords: {}", cluster.shared_keywords.join(", ").cyan());
  }
  println!(
    "  structure: {} / {}",
    complexity_label(cluster.complexity),
    pattern_label(cluster.pattern)
  );
  if cluster.needs_manual_review {
    println!("  {}", "needs manual review: could not split oversized cluster".yellow());
  }
  println!();
}
