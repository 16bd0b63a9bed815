use indicatif::{ProgressBar, ProgressStyle};

/// Counter shown while search pages come in: `Dataset PIDs found: 40 of 112`.
pub fn pid_counter(show: bool) -> ProgressBar {
  if !show {
    return ProgressBar::hidden();
  }
  let bar = ProgressBar::new(0);
  if let Ok(style) = ProgressStyle::with_template("Dataset PIDs found: {pos} of {len}") {
    bar.set_style(style);
  }
  bar
}

/// Dot trail that grows by one per dataset written.
pub fn dots(total: u64, show: bool) -> ProgressBar {
  if !show {
    return ProgressBar::hidden();
  }
  let bar = ProgressBar::new(total);
  if let Ok(style) = ProgressStyle::with_template("{prefix} {bar:40} {pos}/{len}") {
    bar.set_style(style.progress_chars(".. "));
  }
  bar
}
