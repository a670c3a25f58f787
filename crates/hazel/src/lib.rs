//! Leveled logging for CLI output
//!
//! - Standard levels (info, warn, error, debug, success)
//! - Multi-line messages keep the level prefix on every line
//! - Banner display for section headings
//! - All output goes to stderr so stdout stays machine-readable

use colored::*;

/// Core output function; one stderr line per message line
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn prefix(color: Color, label: &str) -> String {
  format!("[{}]", label.color(color).bold())
}

/// Info level - general progress
pub fn info(message: &str) {
  let tag = prefix(Color::Blue, "info");
  for line in message.lines() {
    log(&format!("{tag} {line}"));
  }
}

/// Warning level - recoverable problems worth surfacing
pub fn warn(message: &str) {
  let tag = prefix(Color::Yellow, "warn");
  for line in message.lines() {
    log(&format!("{tag} {line}"));
  }
}

/// Error level - something went wrong
pub fn error(message: &str) {
  let tag = prefix(Color::Red, "error");
  for line in message.lines() {
    log(&format!("{tag} {line}"));
  }
}

/// Debug level - diagnostic detail
pub fn debug(message: &str) {
  let tag = prefix(Color::Magenta, "debug");
  for line in message.lines() {
    log(&format!("{tag} {line}"));
  }
}

/// Success level - a step completed
pub fn success(message: &str) {
  let tag = prefix(Color::Green, "done");
  for line in message.lines() {
    log(&format!("{tag} {line}"));
  }
}

/// Build a banner line of the given width
pub fn banner_line(width: usize, fill: char) -> String {
  fill.to_string().repeat(width)
}

/// Display a message framed by banner lines
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, fill: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let fill = fill.unwrap_or('=');
  let banner = banner_line(width, fill);

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// Section heading for report output
pub fn heading(message: &str) {
  as_banner(|line| log(&line.cyan().bold().to_string()), message, Some(50), Some('-'));
}
