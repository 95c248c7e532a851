use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

use super::traits::ToolSession;
use super::types::ToolSpec;

/// A spawned child process with piped output streams.
pub struct ProcessSession {
    child: Child,
}

impl ProcessSession {
    pub fn spawn(spec: &ToolSpec) -> std::io::Result<Self> {
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        Ok(Self { child })
    }
}

#[async_trait]
impl ToolSession for ProcessSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn kill(&mut self) -> anyhow::Result<()> {
        // tokio's kill also reaps the child, so no zombie is left behind.
        self.child.kill().await?;
        Ok(())
    }

    async fn wait(&mut self) -> anyhow::Result<i32> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }
}
