use super::parser::{LineGrammar, ToolFamily};
use super::signal::{ClockPos, ProgressSignal};
use super::tracker::ProgressTracker;

/// Drives one stage's tracker from the raw lines of that stage's tool log.
///
/// Holds the duration until the total becomes derivable: the renderer needs a
/// frame rate as well, the encoder only the duration. The first derivable
/// total initializes the tracker exactly once.
pub struct StageMonitor {
    grammar: LineGrammar,
    tracker: ProgressTracker,
    duration: Option<ClockPos>,
    rate: Option<f64>,
}

impl StageMonitor {
    pub fn renderer(label: impl Into<String>, enabled: bool) -> Self {
        Self::new(LineGrammar::renderer(), label, enabled)
    }

    pub fn encoder(label: impl Into<String>, enabled: bool) -> Self {
        Self::new(LineGrammar::encoder(), label, enabled)
    }

    fn new(grammar: LineGrammar, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            grammar,
            tracker: ProgressTracker::new(label, enabled),
            duration: None,
            rate: None,
        }
    }

    pub fn observe_line(&mut self, line: &str) {
        let Some(signal) = self.grammar.extract(line) else {
            return;
        };
        match signal {
            ProgressSignal::Duration(clock) => {
                if self.duration.is_none() {
                    self.duration = Some(clock);
                }
            }
            ProgressSignal::Rate(rate) => {
                if self.rate.is_none() {
                    self.rate = Some(rate);
                }
            }
            ProgressSignal::Position(position) => self.tracker.advance(position),
        }
        self.try_initialize();
    }

    fn try_initialize(&mut self) {
        if self.tracker.is_initialized() {
            return;
        }
        let Some(duration) = self.duration else {
            return;
        };
        let total = match self.grammar.family() {
            // Frame-accurate: seconds times rate plus the trailing frames.
            ToolFamily::Renderer => {
                let Some(rate) = self.rate else {
                    return;
                };
                ((duration.whole_seconds() as f64) * rate + duration.subs as f64).round() as u64
            }
            // The encoder's progress clock only resolves whole seconds, so
            // the total is floored to seconds as well.
            ToolFamily::Encoder => duration.whole_seconds(),
        };
        self.tracker.initialize(total);
    }

    pub fn finish(&mut self) {
        self.tracker.finish();
    }

    pub fn abandon(&mut self) {
        self.tracker.abandon();
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }
}
