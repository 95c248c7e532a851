use clap::Parser;
mod app;
mod commands;
use commands::cli;
use parabens_core::config::LoggingConfig;
use parabens_core::error::{CliError, PipelineError, RunnerError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg =
        parabens_core::config::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(CliError::Config)?;

    app::run_app(args, cfg).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config / template problems
    // 12: input collection (picker cancelled, empty name, bad avatar)
    // 20: spawn / IO error
    // 30: external tool returned a nonzero exit code
    // 31: tool claimed success but produced no output
    // 50: internal/uncategorized
    // 130: interrupted by the user (mapped from the pipeline outcome)
    match e {
        CliError::Config(_) => 11,
        CliError::Input(_) => 12,
        CliError::Pipeline(pe) => match pe {
            PipelineError::MissingTemplate { .. } => 11,
            PipelineError::Inputs(_) => 12,
            PipelineError::Spawn { .. } => 20,
            PipelineError::ToolFailed { .. } => 30,
            PipelineError::MissingArtifact { .. } => 31,
            PipelineError::Runner(re) => match re {
                RunnerError::StreamIo { .. } => 20,
                RunnerError::Wait(_) => 20,
            },
            PipelineError::Io(_) => 20,
            PipelineError::State(_) => 50,
        },
        CliError::Io(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("parabens"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("parabens.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
