#![cfg(unix)]

use std::path::{Path, PathBuf};

use image::RgbImage;
use parabens_core::config::AppConfig;
use parabens_core::error::PipelineError;
use parabens_core::pipeline::{Pipeline, PipelineInputs, PipelineOutcome, Stage};

fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn test_config(dir: &Path, renderer: PathBuf, encoder: PathBuf) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.paths.base_dir = dir.to_path_buf();
    cfg.paths.output_dir = dir.join("final");
    cfg.render.aerender_path = renderer;
    cfg.render.project_path = dir.join("BirthdayVideoTemplate.aep");
    cfg.render.output_encoding = "utf-8".to_string();
    cfg.encode.ffmpeg_path = encoder;
    cfg.progress.enabled = false;
    cfg
}

fn test_inputs(dir: &Path) -> PipelineInputs {
    let avatar = dir.join("photo.png");
    RgbImage::new(64, 32).save(&avatar).unwrap();
    PipelineInputs {
        name: "Ana".to_string(),
        role: "Engenheira".to_string(),
        avatar,
    }
}

// The render stub receives `-comp C -project P -output O`; "$6" is O.
const RENDER_OK: &str = r#"printf 'Duration: 0:00:02:00\nFrame Rate: 10\n(10):\n(20):\n'
touch "$6"
"#;

const CONVERT_OK: &str =
    "printf 'Duration: 00:00:02.00\\ntime=00:00:01.00\\ntime=00:00:02.00\\n'\n";

#[tokio::test]
async fn happy_path_runs_both_stages_to_done() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = write_tool(dir.path(), "fake-aerender", RENDER_OK);
    let encoder = write_tool(dir.path(), "fake-ffmpeg", CONVERT_OK);
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg.clone());
    let outcome = pipeline.run(&inputs, None).await.unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Finished {
            output: cfg.paths.final_video()
        }
    );
    assert_eq!(pipeline.stage(), Stage::Done);
    assert!(cfg.paths.data_dir().join("info.json").exists());
    assert!(cfg.paths.data_dir().join("avatar.jpg").exists());
}

#[tokio::test]
async fn unreadable_avatar_aborts_during_input_preparation() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = write_tool(dir.path(), "fake-aerender", "touch render-marker\n");
    let encoder = write_tool(dir.path(), "fake-ffmpeg", CONVERT_OK);
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    let inputs = PipelineInputs {
        name: "Ana".to_string(),
        role: "Engenheira".to_string(),
        avatar: dir.path().join("missing.png"),
    };
    let mut pipeline = Pipeline::new(cfg);
    let err = pipeline.run(&inputs, None).await.unwrap_err();

    assert!(matches!(err, PipelineError::Inputs(_)));
    assert_eq!(pipeline.stage(), Stage::Aborted);
    assert!(!dir.path().join("render-marker").exists());
}

#[tokio::test]
async fn missing_template_aborts_before_any_stage() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = write_tool(dir.path(), "fake-aerender", RENDER_OK);
    let encoder = write_tool(dir.path(), "fake-ffmpeg", CONVERT_OK);
    let cfg = test_config(dir.path(), renderer, encoder);

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg);
    let err = pipeline.run(&inputs, None).await.unwrap_err();

    assert!(matches!(err, PipelineError::MissingTemplate { .. }));
    assert_eq!(pipeline.stage(), Stage::Aborted);
}

#[tokio::test]
async fn render_failure_surfaces_exit_code_and_skips_convert() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = write_tool(dir.path(), "fake-aerender", "exit 13\n");
    // A convert run would leave a marker; its absence shows it never ran.
    let encoder = write_tool(dir.path(), "fake-ffmpeg", "touch converted-marker\n");
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg);
    let err = pipeline.run(&inputs, None).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ToolFailed {
            stage: "render",
            exit_code: 13
        }
    ));
    assert_eq!(pipeline.stage(), Stage::Aborted);
    assert!(!dir.path().join("converted-marker").exists());
}

#[tokio::test]
async fn silent_render_failure_is_caught_by_artifact_guard() {
    let dir = tempfile::tempdir().unwrap();
    // Exit 0 without writing the intermediate file.
    let renderer = write_tool(dir.path(), "fake-aerender", "printf 'done\\n'\n");
    let encoder = write_tool(dir.path(), "fake-ffmpeg", CONVERT_OK);
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg);
    let err = pipeline.run(&inputs, None).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MissingArtifact { stage: "render", .. }
    ));
    assert_eq!(pipeline.stage(), Stage::Aborted);
}

#[tokio::test]
async fn cancellation_mid_render_skips_the_convert_stage() {
    use std::time::Duration;
    use tokio::sync::mpsc;

    let dir = tempfile::tempdir().unwrap();
    let renderer = write_tool(dir.path(), "fake-aerender", "sleep 30\n");
    let encoder = write_tool(dir.path(), "fake-ffmpeg", "touch converted-marker\n");
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    let (cancel_tx, mut cancel_rx) = mpsc::channel::<String>(1);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = cancel_tx.send("interrupted by user".to_string()).await;
    });

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg);
    let started = std::time::Instant::now();
    let outcome = pipeline.run(&inputs, Some(&mut cancel_rx)).await.unwrap();

    assert_eq!(outcome, PipelineOutcome::Interrupted);
    assert_eq!(pipeline.stage(), Stage::Aborted);
    assert!(!dir.path().join("converted-marker").exists());
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "render child was not terminated promptly"
    );
}

#[tokio::test]
async fn stale_outputs_are_removed_before_running() {
    let dir = tempfile::tempdir().unwrap();
    // A renderer that writes nothing: if the stale intermediate survived the
    // cleanup, the artifact guard would wrongly pass.
    let renderer = write_tool(dir.path(), "fake-aerender", "printf 'done\\n'\n");
    let encoder = write_tool(dir.path(), "fake-ffmpeg", CONVERT_OK);
    let cfg = test_config(dir.path(), renderer, encoder);
    std::fs::write(&cfg.render.project_path, b"aep").unwrap();

    std::fs::create_dir_all(&cfg.paths.output_dir).unwrap();
    std::fs::write(cfg.paths.intermediate_video(), b"stale").unwrap();
    std::fs::write(cfg.paths.final_video(), b"stale").unwrap();

    let inputs = test_inputs(dir.path());
    let mut pipeline = Pipeline::new(cfg.clone());
    let err = pipeline.run(&inputs, None).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MissingArtifact { stage: "render", .. }
    ));
    assert!(!cfg.paths.final_video().exists());
}
