//! Progress reporting

use crate::types::Entry;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown on stderr while a tree is being listed
///
/// indicatif hides it when stderr is not a terminal.
pub struct ScanSpinner {
    bar: ProgressBar,
    label: &'static str,
}

impl ScanSpinner {
    /// Start spinning with "Analyzing `label` files"
    pub fn start(label: &'static str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(format!("Analyzing {} files", label));
        Self { bar, label }
    }

    /// Spinner that never draws
    pub fn hidden(label: &'static str) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            label,
        }
    }

    /// Replace the spinner with a summary of the listing
    pub fn finish(&self, entries: &[Entry]) {
        self.bar.finish_with_message(scan_message(self.label, entries));
    }

    /// Remove the spinner without a summary
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

fn scan_message(label: &str, entries: &[Entry]) -> String {
    let bytes: u64 = entries.iter().filter(|e| !e.is_dir).map(|e| e.size).sum();
    format!(
        "Analyzed {} files: {} entries | {}",
        label,
        entries.len(),
        HumanBytes(bytes)
    )
}
