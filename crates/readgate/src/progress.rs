//! Progress bar for batch runs.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar on stderr that only shows up in interactive sessions.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a progress bar for `total` documents.
    ///
    /// Nothing is drawn unless `enabled` is true, there is more than one
    /// document, stderr is a terminal and `NO_COLOR` is unset.
    pub fn new(enabled: bool, total: usize) -> Self {
        let bar = (enabled && total > 1 && is_interactive()).then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{spinner:.cyan} [{bar:30}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb.set_message("analyzing");
            pb
        });
        Self { bar }
    }

    /// Record that `done` documents have finished.
    pub fn update(&self, done: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(done as u64);
        }
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn is_interactive() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
