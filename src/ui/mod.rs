//! Console output

pub mod progress;
pub mod reporter;

pub use progress::ScanSpinner;
pub use reporter::{
    ColorMode, ItemOutcome, NoProgress, Phase, ProgressSink, Reporter, TextReporter,
};
