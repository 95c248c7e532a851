use async_trait::async_trait;
use tokio::io::AsyncRead;

/// A running external tool, as seen by the supervisor.
///
/// `ProcessSession` is the real implementation; tests drive the supervisor
/// with in-memory sessions instead of spawned children.
#[async_trait]
pub trait ToolSession: Send {
    /// Primary output stream. Take-once.
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;

    /// Secondary output stream, merged with stdout by the supervisor.
    /// Take-once.
    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;

    /// Terminate the tool and wait for it to exit. Must not leave an
    /// orphaned child behind.
    async fn kill(&mut self) -> anyhow::Result<()>;

    /// Block until the tool exits and return its exit code.
    async fn wait(&mut self) -> anyhow::Result<i32>;
}
