//! Per-item outcome reporting
//!
//! The executor never writes to the console itself. It announces phases,
//! items and progress through [`Reporter`]; [`TextReporter`] renders them as
//! plain or colored text lines.

use crate::executor::SyncSummary;
use crate::types::MirrorError;
use console::style;
use std::io::{self, Stdout, Write};

/// Receives transfer progress for the current item
pub trait ProgressSink {
    /// Show `percent` in place of any previous indicator
    fn update(&mut self, percent: u32);

    /// Remove the indicator entirely
    fn clear(&mut self);
}

/// Discards progress updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&mut self, _percent: u32) {}
    fn clear(&mut self) {}
}

/// Execution phase, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Delete,
    Create,
    Update,
}

impl Phase {
    /// Verb used on item lines
    pub fn verb(self) -> &'static str {
        match self {
            Phase::Delete => "deleting",
            Phase::Create => "creating",
            Phase::Update => "updating",
        }
    }

    /// Heading printed before the phase's items
    pub fn heading(self) -> &'static str {
        match self {
            Phase::Delete => "Deleting remote files",
            Phase::Create => "Creating new files",
            Phase::Update => "Updating modified files",
        }
    }
}

/// How one item ended
#[derive(Debug, Clone, Copy)]
pub enum ItemOutcome<'a> {
    Done,
    Failed(&'a MirrorError),
    /// Listed only; nothing was sent to the remote side
    Simulated,
}

/// Sink for structured execution output
pub trait Reporter: ProgressSink {
    /// A non-empty phase is about to run
    fn phase_start(&mut self, phase: Phase, items: usize);

    /// Work on `path` begins
    fn item_start(&mut self, phase: Phase, path: &str);

    /// Work on the current item ended
    fn item_end(&mut self, outcome: ItemOutcome<'_>);

    /// All phases finished
    fn summary(&mut self, summary: &SyncSummary);
}

/// Output styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Plain,
    Colored,
}

impl ColorMode {
    /// Colored when stdout is a terminal and colors were not disabled
    pub fn detect(no_color: bool) -> Self {
        if !no_color && console::Term::stdout().is_term() {
            ColorMode::Colored
        } else {
            ColorMode::Plain
        }
    }
}

/// Line-oriented text reporter
pub struct TextReporter<W: Write> {
    out: W,
    color: ColorMode,
    indicator_width: usize,
}

impl TextReporter<Stdout> {
    /// Reporter writing to stdout
    pub fn stdout(color: ColorMode) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, color: ColorMode) -> Self {
        Self {
            out,
            color,
            indicator_width: 0,
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&self) -> bool {
        self.color == ColorMode::Colored
    }

    // Write errors on the console are ignored
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    fn erase_indicator(&mut self) {
        if self.indicator_width == 0 {
            return;
        }
        let back = "\x08".repeat(self.indicator_width);
        let blank = " ".repeat(self.indicator_width);
        let text = format!("{back}{blank}{back}");
        self.indicator_width = 0;
        self.emit(&text);
    }
}

impl<W: Write> ProgressSink for TextReporter<W> {
    fn update(&mut self, percent: u32) {
        self.erase_indicator();
        let indicator = format!(" {}%", percent);
        self.indicator_width = indicator.len();
        self.emit(&indicator);
    }

    fn clear(&mut self) {
        self.erase_indicator();
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn phase_start(&mut self, phase: Phase, _items: usize) {
        let heading = style(phase.heading()).bold().force_styling(self.colored());
        self.emit(&format!("{}\n", heading));
    }

    fn item_start(&mut self, phase: Phase, path: &str) {
        let verb = style(phase.verb()).cyan().force_styling(self.colored());
        self.emit(&format!("  {} {}", verb, path));
    }

    fn item_end(&mut self, outcome: ItemOutcome<'_>) {
        self.erase_indicator();
        let colored = self.colored();
        let line = match outcome {
            ItemOutcome::Done => format!(" {}\n", style("OK").green().force_styling(colored)),
            ItemOutcome::Failed(err) => format!(
                " {} ({})\n",
                style("FAILED").red().bold().force_styling(colored),
                err
            ),
            ItemOutcome::Simulated => "\n".to_string(),
        };
        self.emit(&line);
    }

    fn summary(&mut self, summary: &SyncSummary) {
        let text = style(summary.to_string()).bold().force_styling(self.colored());
        self.emit(&format!("{}\n", text));
    }
}
