use std::io::Write;
use std::path::PathBuf;

use parabens_core::config::AppConfig;
use parabens_core::error::CliError;
use parabens_core::pipeline::{Pipeline, PipelineInputs, PipelineOutcome};
use tokio::sync::mpsc;

use crate::commands::cli::Args;

pub async fn run_app(args: Args, mut cfg: AppConfig) -> Result<i32, CliError> {
    if let Some(dir) = args.output_dir {
        cfg.paths.output_dir = dir;
    }
    if args.no_progress {
        cfg.progress.enabled = false;
    }

    let inputs = collect_inputs(args.name, args.role, args.avatar)?;
    tracing::debug!(avatar = %inputs.avatar.display(), "inputs collected");

    // Ctrl-C becomes a cancellation message; the supervisor terminates the
    // child in flight and the orchestrator skips the remaining stages.
    let (cancel_tx, mut cancel_rx) = mpsc::channel::<String>(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send("interrupted by user".to_string()).await;
        }
    });

    let mut pipeline = Pipeline::new(cfg);
    match pipeline.run(&inputs, Some(&mut cancel_rx)).await? {
        PipelineOutcome::Finished { output } => {
            println!("Video saved to {}", output.display());
            Ok(0)
        }
        PipelineOutcome::Interrupted => {
            eprintln!("Interrupted; remaining stages were skipped.");
            Ok(130)
        }
    }
}

fn collect_inputs(
    name: Option<String>,
    role: Option<String>,
    avatar: Option<PathBuf>,
) -> Result<PipelineInputs, CliError> {
    let name = match name {
        Some(name) => name,
        None => prompt("Name: ")?,
    };
    if name.trim().is_empty() {
        return Err(CliError::Input("a recipient name is required".to_string()));
    }

    let role = match role {
        Some(role) => role,
        None => prompt("Role: ")?,
    };

    let avatar = match avatar {
        Some(path) => path,
        None => pick_avatar()?,
    };

    Ok(PipelineInputs {
        name: name.trim().to_string(),
        role: role.trim().to_string(),
        avatar,
    })
}

fn prompt(label: &str) -> Result<String, CliError> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut buf = String::new();
    std::io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn pick_avatar() -> Result<PathBuf, CliError> {
    rfd::FileDialog::new()
        .set_title("Select the avatar image")
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif"])
        .pick_file()
        .ok_or_else(|| CliError::Input("no avatar image selected".to_string()))
}
