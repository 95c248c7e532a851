pub mod orchestrator;
pub mod stage;

pub use orchestrator::{Pipeline, PipelineInputs, PipelineOutcome};
pub use stage::{Stage, StageTransition};
