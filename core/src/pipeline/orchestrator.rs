use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::inputs::{avatar, metadata};
use crate::progress::StageMonitor;
use crate::runner::{self, RunOutcome, ToolSpec};

use super::stage::{Stage, StageTransition};

/// Everything collected from the user before the pipeline starts.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub name: String,
    pub role: String,
    pub avatar: PathBuf,
}

/// How a pipeline run ended when it did not error out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Finished { output: PathBuf },
    /// User cancellation. Not an error: remaining stages are skipped and the
    /// partial artifacts are left in place.
    Interrupted,
}

/// Sequences prepare-inputs → render → convert, one external process at a
/// time, and maps tool outcomes to user-visible results.
pub struct Pipeline {
    config: AppConfig,
    stage: Stage,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub async fn run(
        &mut self,
        inputs: &PipelineInputs,
        mut cancel: Option<&mut mpsc::Receiver<String>>,
    ) -> Result<PipelineOutcome, PipelineError> {
        if let Err(e) = tokio::fs::create_dir_all(&self.config.paths.output_dir).await {
            return self.abort_with(PipelineError::Io(e));
        }
        self.remove_stale_outputs().await;

        let project = self.config.render.project_path.clone();
        if !project.exists() {
            return self.abort_with(PipelineError::MissingTemplate { path: project });
        }

        if let Err(e) = self.prepare_inputs(inputs) {
            return self.abort_with(e);
        }
        self.enter(Stage::InputsPrepared)?;

        let progress = self.config.progress.enabled;

        // Render the composition to the intermediate .mov.
        let render_spec = self.render_spec();
        let mut monitor = StageMonitor::renderer("Rendering", progress);
        match runner::run_tool(&render_spec, &mut monitor, cancel.as_deref_mut()).await? {
            RunOutcome::Completed => self.enter(Stage::Rendered)?,
            RunOutcome::Failed { exit_code } => {
                return self.abort_with(PipelineError::ToolFailed {
                    stage: "render",
                    exit_code,
                });
            }
            RunOutcome::SpawnFailed { reason } => {
                return self.abort_with(PipelineError::Spawn {
                    stage: "render",
                    reason,
                });
            }
            RunOutcome::Interrupted => return self.interrupt(),
        }

        // The renderer has been seen to exit 0 without writing anything, so
        // the exit code alone is not trusted.
        let intermediate = self.config.paths.intermediate_video();
        if !intermediate.exists() {
            return self.abort_with(PipelineError::MissingArtifact {
                stage: "render",
                path: intermediate,
            });
        }

        // Transcode the intermediate to the final MP4.
        let convert_spec = self.convert_spec();
        let mut monitor = StageMonitor::encoder("Converting to MP4", progress);
        match runner::run_tool(&convert_spec, &mut monitor, cancel.as_deref_mut()).await? {
            RunOutcome::Completed => self.enter(Stage::Converted)?,
            RunOutcome::Failed { exit_code } => {
                return self.abort_with(PipelineError::ToolFailed {
                    stage: "convert",
                    exit_code,
                });
            }
            RunOutcome::SpawnFailed { reason } => {
                return self.abort_with(PipelineError::Spawn {
                    stage: "convert",
                    reason,
                });
            }
            RunOutcome::Interrupted => return self.interrupt(),
        }

        self.enter(Stage::Done)?;
        let output = self.config.paths.final_video();
        tracing::info!(output = %output.display(), "pipeline finished");
        Ok(PipelineOutcome::Finished { output })
    }

    fn prepare_inputs(&self, inputs: &PipelineInputs) -> Result<(), PipelineError> {
        let record = metadata::VideoMetadata {
            name: inputs.name.clone(),
            role: inputs.role.clone(),
        };
        metadata::write_metadata(&self.config.paths.data_dir(), &record)
            .map_err(PipelineError::Inputs)?;

        avatar::prepare_avatar(
            &inputs.avatar,
            &inputs.name,
            &self.config.paths.images_dir(),
            &self.config.paths.data_dir(),
        )
        .map_err(PipelineError::Inputs)?;

        Ok(())
    }

    fn render_spec(&self) -> ToolSpec {
        let render = &self.config.render;
        ToolSpec {
            stage: "render",
            program: render.aerender_path.clone(),
            args: vec![
                "-comp".to_string(),
                render.composition.clone(),
                "-project".to_string(),
                render.project_path.to_string_lossy().into_owned(),
                "-output".to_string(),
                self.config
                    .paths
                    .intermediate_video()
                    .to_string_lossy()
                    .into_owned(),
            ],
            output_encoding: Some(render.output_encoding.clone()),
        }
    }

    fn convert_spec(&self) -> ToolSpec {
        let encode = &self.config.encode;
        ToolSpec {
            stage: "convert",
            program: encode.ffmpeg_path.clone(),
            args: vec![
                "-i".to_string(),
                self.config
                    .paths
                    .intermediate_video()
                    .to_string_lossy()
                    .into_owned(),
                "-vcodec".to_string(),
                encode.video_codec.clone(),
                "-crf".to_string(),
                encode.crf.to_string(),
                "-preset".to_string(),
                encode.preset.clone(),
                "-acodec".to_string(),
                encode.audio_codec.clone(),
                "-b:a".to_string(),
                encode.audio_bitrate.clone(),
                self.config.paths.final_video().to_string_lossy().into_owned(),
            ],
            output_encoding: None,
        }
    }

    /// Leftovers from a previous run would let a failed render go unnoticed,
    /// so both output paths are cleared up front. Removal errors are logged
    /// and tolerated.
    async fn remove_stale_outputs(&self) {
        for path in [
            self.config.paths.final_video(),
            self.config.paths.intermediate_video(),
        ] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::info!(path = %path.display(), "removed stale output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove stale output");
                }
            }
        }
    }

    fn enter(&mut self, to: Stage) -> Result<(), PipelineError> {
        StageTransition::validate(self.stage, to)?;
        tracing::debug!(from = ?self.stage, to = ?to, "stage transition");
        self.stage = to;
        Ok(())
    }

    fn abort_with(&mut self, err: PipelineError) -> Result<PipelineOutcome, PipelineError> {
        self.stage = Stage::Aborted;
        Err(err)
    }

    fn interrupt(&mut self) -> Result<PipelineOutcome, PipelineError> {
        self.stage = Stage::Aborted;
        tracing::warn!("pipeline interrupted; remaining stages skipped");
        Ok(PipelineOutcome::Interrupted)
    }
}
