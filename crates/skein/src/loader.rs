//! Insight corpus loader
//!
//! Reads the on-disk insight store: one `<category>/<name>.insight.md` file
//! per record, YAML frontmatter (overview, optional date) above a markdown
//! details body. Malformed files are skipped with a warning; the run never
//! fails over a single bad record.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::record::InsightRecord;

/// YAML frontmatter carried by insight files
#[derive(Debug, Default, Deserialize)]
pub struct FrontMatter {
  #[serde(default)]
  pub overview: String,
  #[serde(default)]
  pub date: Option<DateTime<Utc>>,
}

/// Resolve the corpus root: env override first, then the shared insight
/// store under the home directory
pub fn corpus_root() -> Result<PathBuf> {
  if let Ok(custom_root) = env::var("SKEIN_INSIGHTS_ROOT") {
    return Ok(PathBuf::from(custom_root));
  }

  let home = dirs::home_dir().ok_or_else(|| anyhow!("could not find home directory"))?;
  Ok(home.join(".kernelle").join("insights"))
}

/// Whether a path looks like an insight file (`*.insight.md`)
pub fn is_insight_file(path: &Path) -> bool {
  path.extension().and_then(|ext| ext.to_str()) == Some("md")
    && path
      .file_stem()
      .and_then(|stem| stem.to_str())
      .is_some_and(|stem| stem.ends_with(".insight"))
}

/// Load every record under the corpus root, in deterministic order
/// (categories sorted, file names sorted within each category)
pub fn load_corpus(root: &Path) -> Result<Vec<InsightRecord>> {
  if !root.exists() {
    return Err(anyhow!("insight corpus not found at {}", root.display()));
  }

  let mut categories: Vec<PathBuf> = Vec::new();
  for entry in fs::read_dir(root)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      categories.push(entry.path());
    }
  }
  categories.sort();

  let mut records = Vec::new();
  for category_path in categories {
    let category =
      category_path.file_name().and_then(|name| name.to_str()).unwrap_or("unknown").to_string();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(&category_path)? {
      let entry = entry?;
      let path = entry.path();
      if is_insight_file(&path) {
        files.push(path);
      }
    }
    files.sort();

    for path in files {
      match record_from_file(&path, &category) {
        Ok(record) => records.push(record),
        Err(error) => {
          tracing::warn!(path = %path.display(), %error, "skipping unreadable insight file");
        }
      }
    }
  }

  Ok(records)
}

/// Split insight file content into frontmatter and details.
///
/// Files without a frontmatter block are tolerated: the whole content
/// becomes the details body and the frontmatter stays empty, so a malformed
/// record degrades to a low quality score instead of failing the run.
pub fn parse_insight(content: &str) -> (FrontMatter, String) {
  if let Some(after_open) = content.strip_prefix("---\n") {
    if let Some(end) = after_open.find("\n---\n") {
      let frontmatter_section = &after_open[..end];
      let body = &after_open[end + 5..];

      let frontmatter =
        serde_yaml::from_str::<FrontMatter>(frontmatter_section).unwrap_or_default();
      let details = body
        .lines()
        .skip_while(|line| line.trim().is_empty() || line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

      return (frontmatter, details);
    }
  }

  (FrontMatter::default(), content.trim().to_string())
}

fn record_from_file(path: &Path, category: &str) -> Result<InsightRecord> {
  let content = fs::read_to_string(path)?;
  let (frontmatter, details) = parse_insight(&content);

  let name = path
    .file_stem()
    .and_then(|stem| stem.to_str())
    .map(|stem| stem.trim_end_matches(".insight"))
    .unwrap_or("unknown");
  let title = name.replace(['_', '-'], " ");

  let body = if frontmatter.overview.is_empty() {
    details
  } else if details.is_empty() {
    frontmatter.overview.clone()
  } else {
    format!("{}\n\n{}", frontmatter.overview, details)
  };

  let date = match frontmatter.date {
    Some(date) => date,
    None => file_modified(path).unwrap_or(DateTime::UNIX_EPOCH),
  };

  Ok(InsightRecord::new(
    title,
    body,
    category.to_string(),
    date,
    path.display().to_string(),
  ))
}

fn file_modified(path: &Path) -> Option<DateTime<Utc>> {
  let modified = fs::metadata(path).ok()?.modified().ok()?;
  Some(DateTime::<Utc>::from(modified))
}
