//! Stint host
//!
//! Reads one JSON request per line and writes one JSON response per line.
//! The transport is just the pipe; all state lives in the tracker.

mod state;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use stint_core::{Config, CoreError, Response};

pub use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "stint", version, about = "Session time tracker host")]
pub struct Args {
    /// Directory holding the database (defaults to $STINT_DATA_DIR or the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long)]
    pub in_memory: bool,

    /// Append each stopped run to the session list
    #[arg(long)]
    pub record_on_stop: bool,
}

impl Args {
    pub fn config(&self) -> Config {
        let data_dir = self.data_dir.clone().unwrap_or_else(Config::data_dir);
        let mut config = Config::new(data_dir);
        config.record_on_stop = self.record_on_stop;
        config
    }
}

/// Serve requests until `reader` hits EOF, returning how many were handled
///
/// Lines are read as raw bytes so one undecodable line gets an error
/// response instead of ending the session.
pub async fn serve<R, W>(state: &AppState, mut reader: R, mut writer: W) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                state.handle_line(line)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected request that is not UTF-8");
                Response::error(CoreError::MalformedRequest(e.to_string()).to_string())
            }
        };

        writer.write_all(response.to_json().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.config();
    let state = AppState::new(config, args.in_memory)?;

    tracing::info!(in_memory = args.in_memory, "Stint host started");

    let served = serve(&state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await;

    // Queued snapshots are written even when the pipe broke
    state.flusher().shutdown().await;

    match served {
        Ok(handled) => {
            tracing::info!(handled, "Stint host stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Stint host stopped on transport error");
            Err(e)
        }
    }
}
