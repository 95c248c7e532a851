use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::stage::TransitionError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("config error: {0}")]
    Config(String),
    #[error("input collection failed: {0}")]
    Input(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("project template not found: {path:?}")]
    MissingTemplate { path: PathBuf },
    #[error("input preparation failed: {0}")]
    Inputs(#[source] anyhow::Error),
    #[error("failed to start {stage}: {reason}")]
    Spawn { stage: &'static str, reason: String },
    #[error("{stage} failed with exit code {exit_code}")]
    ToolFailed { stage: &'static str, exit_code: i32 },
    #[error("{stage} reported success but produced no output at {path:?}")]
    MissingArtifact { stage: &'static str, path: PathBuf },
    #[error("invalid stage transition: {0}")]
    State(#[from] TransitionError),
    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("wait failed: {0}")]
    Wait(String),
}
