//! CLI-specific progress handling for course-dl
//!
//! Renders a single byte-progress bar that is reused across the sequential
//! lesson downloads: each new lesson resets the length, the bar is cleared
//! once the whole batch is done.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a byte-progress bar for CLI display
pub fn create_progress_bar(total_size: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {bytes_per_sec}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Progress manager shared across a batch of downloads
#[derive(Clone)]
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            pb: create_progress_bar(0),
        }
    }

    /// Advance the bar; a new total means a new lesson started.
    pub fn update(&self, downloaded: u64, total: u64) {
        if self.pb.length().unwrap_or(0) != total {
            self.pb.set_length(total);
        }
        self.pb.set_position(downloaded);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
