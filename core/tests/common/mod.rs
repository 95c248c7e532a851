use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parabens_core::runner::{ToolSession, ToolSpec};
use tokio::io::{AsyncRead, DuplexStream};

pub fn spec(stage: &'static str, program: &str, args: &[&str]) -> ToolSpec {
    ToolSpec {
        stage,
        program: program.into(),
        args: args.iter().map(|s| s.to_string()).collect(),
        output_encoding: None,
    }
}

/// In-memory session that replays a canned log and exits with a fixed code.
pub struct ScriptedSession {
    stdout: Option<Box<dyn AsyncRead + Unpin + Send>>,
    exit_code: i32,
}

impl ScriptedSession {
    pub fn new(output: &str, exit_code: i32) -> Self {
        Self {
            stdout: Some(Box::new(Cursor::new(output.as_bytes().to_vec()))),
            exit_code,
        }
    }
}

#[async_trait]
impl ToolSession for ScriptedSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stdout.take()
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        None
    }

    async fn kill(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn wait(&mut self) -> anyhow::Result<i32> {
        Ok(self.exit_code)
    }
}

/// Session whose output stream never closes until it is killed; stands in
/// for a long render when exercising cancellation.
pub struct HangingSession {
    reader: Option<DuplexStream>,
    writer: Option<DuplexStream>,
    killed: Arc<AtomicBool>,
}

impl HangingSession {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let (writer, reader) = tokio::io::duplex(1024);
        let killed = Arc::new(AtomicBool::new(false));
        (
            Self {
                reader: Some(reader),
                writer: Some(writer),
                killed: killed.clone(),
            },
            killed,
        )
    }
}

#[async_trait]
impl ToolSession for HangingSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.reader
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        None
    }

    async fn kill(&mut self) -> anyhow::Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        self.writer.take();
        Ok(())
    }

    async fn wait(&mut self) -> anyhow::Result<i32> {
        Ok(if self.killed.load(Ordering::SeqCst) {
            130
        } else {
            0
        })
    }
}
