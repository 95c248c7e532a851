pub mod monitor;
pub mod parser;
pub mod signal;
pub mod tracker;

pub use monitor::StageMonitor;
pub use parser::{LineGrammar, ToolFamily};
pub use signal::{ClockPos, ProgressSignal};
pub use tracker::ProgressTracker;
