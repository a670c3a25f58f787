use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use skein::config::ClusterConfig;
use skein::{display, loader, pipeline, quality};

#[derive(Parser)]
#[command(name = "skein")]
#[command(
  about = "Skein - Insight Clustering Engine\nGroups stored insights into reusable skill candidates"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

/// Common corpus arguments
#[derive(Args)]
struct CorpusArgs {
  /// Corpus root (defaults to SKEIN_INSIGHTS_ROOT or ~/.kernelle/insights)
  path: Option<PathBuf>,
  /// Emit JSON on stdout instead of formatted text
  #[arg(long)]
  json: bool,
}

#[derive(Subcommand)]
enum Command {
  /// Cluster the insight corpus into skill candidates
  Cluster {
    #[command(flatten)]
    corpus: CorpusArgs,
    /// Minimum pairwise similarity to connect two insights
    #[arg(long)]
    cluster_minimum: Option<f32>,
    /// Minimum normalized quality to promote an unclustered insight
    #[arg(long)]
    standalone_quality: Option<f32>,
    /// Cluster size that triggers a split attempt
    #[arg(long)]
    max_cluster_size: Option<usize>,
  },
  /// Show per-insight quality scores
  Score {
    #[command(flatten)]
    corpus: CorpusArgs,
  },
}

fn resolve_root(corpus: &CorpusArgs) -> Result<PathBuf> {
  match &corpus.path {
    Some(path) => Ok(path.clone()),
    None => loader::corpus_root(),
  }
}

fn run_cluster(
  corpus: CorpusArgs,
  cluster_minimum: Option<f32>,
  standalone_quality: Option<f32>,
  max_cluster_size: Option<usize>,
) -> Result<()> {
  let root = resolve_root(&corpus)?;

  let mut config = ClusterConfig::load()?;
  if let Some(minimum) = cluster_minimum {
    config.cluster_minimum = minimum;
  }
  if let Some(threshold) = standalone_quality {
    config.standalone_quality = threshold;
  }
  if let Some(size) = max_cluster_size {
    config.max_cluster_size = size;
  }

  hazel::info(&format!("clustering insights under {}", root.display()));
  let records = loader::load_corpus(&root)?;
  let report = pipeline::run(records, &config);

  if corpus.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    display::render(&report);
  }

  hazel::success(&format!(
    "{} clusters, {} standalones, {} excluded",
    report.summary.cluster_count,
    report.summary.standalone_count,
    report.summary.excluded_count
  ));

  Ok(())
}

fn run_score(corpus: CorpusArgs) -> Result<()> {
  let root = resolve_root(&corpus)?;

  hazel::info(&format!("scoring insights under {}", root.display()));
  let mut records = loader::load_corpus(&root)?;
  quality::annotate(&mut records);

  if corpus.json {
    let rows: Vec<serde_json::Value> = records
      .iter()
      .map(|record| {
        serde_json::json!({
          "id": record.id,
          "category": record.category,
          "title": record.title,
          "quality": record.quality,
        })
      })
      .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    return Ok(());
  }

  for record in &records {
    let score = if record.quality >= quality::CLUSTERING_FLOOR {
      record.quality.to_string().green()
    } else {
      record.quality.to_string().red()
    };
    println!("{} {}/{}", score, record.category.cyan(), record.title.yellow());
  }

  Ok(())
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match cli.command {
    Command::Cluster { corpus, cluster_minimum, standalone_quality, max_cluster_size } => {
      run_cluster(corpus, cluster_minimum, standalone_quality, max_cluster_size)
    }
    Command::Score { corpus } => run_score(corpus),
  }
}
