use regex::{Captures, Regex};

use super::signal::{ClockPos, ProgressSignal};

/// Which external tool's log grammar applies to a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFamily {
    Renderer,
    Encoder,
}

/// Best-effort, per-line pattern matcher over one tool's log output.
///
/// Lines that match nothing yield `None`; so do lines whose numeric captures
/// fail to parse. Malformed tool output must never take the pipeline down.
pub struct LineGrammar {
    family: ToolFamily,
    duration: Regex,
    rate: Option<Regex>,
    position: Regex,
}

impl LineGrammar {
    /// Grammar for the aerender console log.
    pub fn renderer() -> Self {
        Self {
            family: ToolFamily::Renderer,
            // aerender localizes its labels with the install language.
            duration: Regex::new(r"(?:Duration|Duração):\s*(\d+):(\d+):(\d+):(\d+)").unwrap(),
            rate: Some(Regex::new(r"(?:Frame Rate|Taxa de quadros):\s*([\d.,]+)").unwrap()),
            position: Regex::new(r"\((\d+)\):").unwrap(),
        }
    }

    /// Grammar for the ffmpeg log.
    pub fn encoder() -> Self {
        Self {
            family: ToolFamily::Encoder,
            duration: Regex::new(r"Duration:\s*(\d+):(\d+):(\d+)\.(\d+)").unwrap(),
            rate: None,
            position: Regex::new(r"time=(\d+):(\d+):(\d+)\.(\d+)").unwrap(),
        }
    }

    pub fn family(&self) -> ToolFamily {
        self.family
    }

    /// Extract at most one progress signal from a log line.
    pub fn extract(&self, line: &str) -> Option<ProgressSignal> {
        if let Some(caps) = self.duration.captures(line) {
            if let Some(clock) = clock_from_captures(&caps) {
                return Some(ProgressSignal::Duration(clock));
            }
        }

        if let Some(rate) = &self.rate {
            if let Some(caps) = rate.captures(line) {
                // The renderer prints the frame rate with the console
                // locale's decimal separator; the comma form is normalized
                // here and nowhere else.
                let raw = caps[1].replace(',', ".");
                if let Ok(value) = raw.parse::<f64>() {
                    return Some(ProgressSignal::Rate(value));
                }
            }
        }

        if let Some(caps) = self.position.captures(line) {
            match self.family {
                ToolFamily::Renderer => {
                    if let Ok(frame) = caps[1].parse::<u64>() {
                        return Some(ProgressSignal::Position(frame));
                    }
                }
                ToolFamily::Encoder => {
                    if let Some(clock) = clock_from_captures(&caps) {
                        return Some(ProgressSignal::Position(clock.whole_seconds()));
                    }
                }
            }
        }

        None
    }
}

fn clock_from_captures(caps: &Captures<'_>) -> Option<ClockPos> {
    Some(ClockPos {
        hours: caps.get(1)?.as_str().parse().ok()?,
        minutes: caps.get(2)?.as_str().parse().ok()?,
        seconds: caps.get(3)?.as_str().parse().ok()?,
        subs: caps.get(4)?.as_str().parse().ok()?,
    })
}
