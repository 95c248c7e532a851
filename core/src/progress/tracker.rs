use indicatif::{ProgressBar, ProgressStyle};

/// Stateful "work done / work total" accumulator behind one stage's bar.
///
/// The bar is created lazily on `initialize` so a stage that never reports a
/// total (e.g. a tool that fails before printing its header) draws nothing.
/// When `enabled` is false a hidden bar keeps all the accounting without
/// touching the terminal.
pub struct ProgressTracker {
    label: String,
    enabled: bool,
    bar: Option<ProgressBar>,
    total: Option<u64>,
    current: u64,
}

impl ProgressTracker {
    pub fn new(label: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            enabled,
            bar: None,
            total: None,
            current: 0,
        }
    }

    /// Fix the total. At most once per run; later calls are no-ops.
    pub fn initialize(&mut self, total: u64) {
        if self.total.is_some() {
            return;
        }
        self.total = Some(total);

        let bar = if self.enabled {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%)")
                    .unwrap()
                    .progress_chars("█▓▒░  "),
            );
            bar.set_message(self.label.clone());
            bar
        } else {
            ProgressBar::hidden()
        };
        self.bar = Some(bar);
    }

    pub fn is_initialized(&self) -> bool {
        self.total.is_some()
    }

    /// Move the bar forward. Ties and regressions are ignored: line noise is
    /// never allowed to move the bar backward. A no-op until initialized.
    pub fn advance(&mut self, position: u64) {
        if self.total.is_none() || position <= self.current {
            return;
        }
        self.current = position;
        if let Some(bar) = &self.bar {
            bar.set_position(position);
        }
    }

    /// Force completion and close the display. Success path only.
    pub fn finish(&mut self) {
        match self.total {
            Some(total) => {
                self.current = total;
                if let Some(bar) = &self.bar {
                    bar.set_position(total);
                    bar.finish();
                }
            }
            None => {
                if let Some(bar) = &self.bar {
                    bar.finish_and_clear();
                }
            }
        }
    }

    /// Close the display at the last genuinely observed position. Used on
    /// failure and cancellation so the bar reflects the incomplete run.
    pub fn abandon(&mut self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }
}
