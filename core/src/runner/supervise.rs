use tokio::sync::mpsc;

use crate::error::RunnerError;
use crate::progress::StageMonitor;

use super::io_pump::{self, LineStream, LineTap};
use super::process::ProcessSession;
use super::traits::ToolSession;
use super::types::{RunOutcome, ToolSpec};

/// The tools emit at most a handful of lines per frame of work, so a small
/// buffer never backpressures the pumps for long.
const LINE_CHANNEL_CAPACITY: usize = 256;

/// Spawn the tool described by `spec` and supervise it to completion.
pub async fn run_tool(
    spec: &ToolSpec,
    monitor: &mut StageMonitor,
    cancel: Option<&mut mpsc::Receiver<String>>,
) -> Result<RunOutcome, RunnerError> {
    tracing::info!(
        stage = spec.stage,
        program = %spec.program.display(),
        "launching external tool"
    );
    let session = match ProcessSession::spawn(spec) {
        Ok(session) => session,
        Err(e) => {
            return Ok(RunOutcome::SpawnFailed {
                reason: e.to_string(),
            });
        }
    };
    supervise(Box::new(session), spec, monitor, cancel).await
}

/// Drive a running session: merge its output streams into one line sequence,
/// feed every line to the stage monitor, then collect the exit code.
///
/// The merged stream is read to exhaustion before waiting on the exit code;
/// stream closure precedes process exit, so no progress line is lost.
pub async fn supervise(
    mut session: Box<dyn ToolSession>,
    spec: &ToolSpec,
    monitor: &mut StageMonitor,
    mut cancel: Option<&mut mpsc::Receiver<String>>,
) -> Result<RunOutcome, RunnerError> {
    let encoding = spec.resolve_encoding();
    if spec.output_encoding.is_some() && encoding.is_none() {
        tracing::warn!(
            stage = spec.stage,
            label = spec.output_encoding.as_deref().unwrap_or_default(),
            "unknown output encoding label, falling back to lossy UTF-8"
        );
    }

    let (line_tx, mut line_rx) = mpsc::channel::<LineTap>(LINE_CHANNEL_CAPACITY);
    let mut pumps = Vec::new();
    if let Some(rd) = session.stdout() {
        pumps.push(io_pump::pump_lines(
            rd,
            encoding,
            line_tx.clone(),
            LineStream::Stdout,
        ));
    }
    if let Some(rd) = session.stderr() {
        pumps.push(io_pump::pump_lines(
            rd,
            encoding,
            line_tx.clone(),
            LineStream::Stderr,
        ));
    }
    drop(line_tx);

    loop {
        tokio::select! {
            tap = line_rx.recv() => match tap {
                Some(tap) => monitor.observe_line(&tap.line),
                None => break,
            },
            reason = recv_cancel(&mut cancel) => match reason {
                Some(reason) => {
                    tracing::warn!(stage = spec.stage, %reason, "terminating child on cancellation");
                    if let Err(e) = session.kill().await {
                        tracing::warn!(stage = spec.stage, error = %e, "failed to terminate child");
                    }
                    for pump in pumps {
                        pump.abort();
                    }
                    monitor.abandon();
                    return Ok(RunOutcome::Interrupted);
                }
                // The cancel sender is gone; from here on only the line
                // stream can end this loop.
                None => cancel = None,
            },
        }
    }

    for pump in pumps {
        match pump.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!(stage = spec.stage, error = %e, "output pump failed"),
            Err(e) => tracing::warn!(stage = spec.stage, error = %e, "output pump panicked"),
        }
    }

    let exit_code = session
        .wait()
        .await
        .map_err(|e| RunnerError::Wait(e.to_string()))?;

    if exit_code == 0 {
        monitor.finish();
        tracing::info!(stage = spec.stage, "tool completed");
        Ok(RunOutcome::Completed)
    } else {
        monitor.abandon();
        tracing::error!(stage = spec.stage, exit_code, "tool failed");
        Ok(RunOutcome::Failed { exit_code })
    }
}

async fn recv_cancel(cancel: &mut Option<&mut mpsc::Receiver<String>>) -> Option<String> {
    match cancel {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
