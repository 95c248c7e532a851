use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the final deliverable; the intermediate render lands next to
/// it with a `.mov` extension.
pub const FINAL_VIDEO_NAME: &str = "BirthdayVideoFinal.mp4";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub encode: EncodeConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            render: RenderConfig::default(),
            encode: EncodeConfig::default(),
            progress: ProgressConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Project base directory; the template's linked assets live under it.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Where the final and intermediate videos are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./final")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl PathsConfig {
    /// Directory holding the records the After Effects template links
    /// (`info.json`, `avatar.jpg`).
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("dados")
    }

    /// Per-name prepared avatar images.
    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join("imagens")
    }

    pub fn final_video(&self) -> PathBuf {
        self.output_dir.join(FINAL_VIDEO_NAME)
    }

    pub fn intermediate_video(&self) -> PathBuf {
        self.final_video().with_extension("mov")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Full path to the aerender executable.
    #[serde(default = "default_aerender_path")]
    pub aerender_path: PathBuf,

    /// The After Effects project the composition lives in.
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// Composition to render.
    #[serde(default = "default_composition")]
    pub composition: String,

    /// encoding_rs label for aerender's console output. The tool writes its
    /// log in the console's legacy single-byte codepage, not UTF-8.
    #[serde(default = "default_output_encoding")]
    pub output_encoding: String,
}

fn default_aerender_path() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Adobe\Adobe After Effects 2020\Support Files\aerender.exe")
}

fn default_project_path() -> PathBuf {
    PathBuf::from("./BirthdayVideoTemplate.aep")
}

fn default_composition() -> String {
    "PRINCIPAL".to_string()
}

fn default_output_encoding() -> String {
    "windows-1252".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aerender_path: default_aerender_path(),
            project_path: default_project_path(),
            composition: default_composition(),
            output_encoding: default_output_encoding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Encoder executable; resolved through PATH when not absolute.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_crf")]
    pub crf: u32,

    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u32 {
    23
}

fn default_preset() -> String {
    "slow".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "128k".to_string()
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            video_codec: default_video_codec(),
            crf: default_crf(),
            preset: default_preset(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// If false, progress bars are hidden but position accounting still runs.
    #[serde(default = "default_progress_enabled")]
    pub enabled: bool,
}

fn default_progress_enabled() -> bool {
    true
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: default_progress_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "parabens_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}
