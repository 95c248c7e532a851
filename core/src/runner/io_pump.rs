use encoding_rs::Encoding;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

#[derive(Debug)]
pub struct LineTap {
    pub line: String,
    pub stream: LineStream,
}

#[derive(Debug, Clone, Copy)]
pub enum LineStream {
    Stdout,
    Stderr,
}

impl LineStream {
    fn label(self) -> &'static str {
        match self {
            LineStream::Stdout => "stdout",
            LineStream::Stderr => "stderr",
        }
    }
}

/// Pump one output stream into the shared line channel.
///
/// Both `\n` and `\r` terminate a line: the encoder rewrites its stats line
/// in place with bare carriage returns, and those updates must reach the
/// grammar while the run is still going. Complete lines are decoded with the
/// tool's console encoding (lossy UTF-8 when none is given); decoding whole
/// lines sidesteps multi-byte sequences split across read chunks.
pub fn pump_lines<R>(
    mut rd: R,
    encoding: Option<&'static Encoding>,
    line_tx: mpsc::Sender<LineTap>,
    stream: LineStream,
) -> JoinHandle<Result<u64, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut total = 0u64;
        let mut line_buf: Vec<u8> = Vec::with_capacity(8 * 1024);

        loop {
            let n = rd.read(&mut buf).await.map_err(|e| RunnerError::StreamIo {
                stream: stream.label(),
                source: e,
            })?;
            if n == 0 {
                break;
            }
            total += n as u64;

            line_buf.extend_from_slice(&buf[..n]);
            while let Some(pos) = line_buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                let mut one = line_buf.drain(..=pos).collect::<Vec<u8>>();
                one.pop();
                if one.is_empty() {
                    continue;
                }
                let _ = line_tx
                    .send(LineTap {
                        line: decode_line(&one, encoding),
                        stream,
                    })
                    .await;
            }
        }

        // EOF flush: deliver the last partial line if it lacks a terminator.
        if !line_buf.is_empty() {
            let _ = line_tx
                .send(LineTap {
                    line: decode_line(&line_buf, encoding),
                    stream,
                })
                .await;
        }

        Ok(total)
    })
}

fn decode_line(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    match encoding {
        Some(enc) => {
            let (text, _, _) = enc.decode(bytes);
            text.into_owned()
        }
        None => String::from_utf8_lossy(bytes).to_string(),
    }
}
