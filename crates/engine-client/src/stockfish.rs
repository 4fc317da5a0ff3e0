//! Stockfish fallback client using the UCI protocol (async I/O)
//!
//! Each query spawns a private engine process, configures its strength,
//! searches one position and kills the process again. Every wait on the
//! engine is bounded by a deadline, and the child is killed on every exit
//! path: explicitly after the protocol finishes, and through `kill_on_drop`
//! if the query future is dropped midway.

use std::process::Stdio;
use std::time::Duration;

use book_core::{Profile, NULL_MOVE_UCI};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Protocol phase of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Starting,
    Configuring,
    AwaitingReady,
    Searching,
    Done,
    Failed,
}

/// Strength and style passed to the engine as UCI options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthSettings {
    /// Value for `UCI_Elo`
    pub elo: i64,
    /// Value for `Contempt`
    pub contempt: i64,
}

impl Default for StrengthSettings {
    fn default() -> Self {
        Self {
            elo: 1200,
            contempt: 20,
        }
    }
}

impl From<&Profile> for StrengthSettings {
    fn from(profile: &Profile) -> Self {
        Self {
            elo: profile.estimated_elo,
            contempt: profile.estimated_contempt_score.round() as i64,
        }
    }
}

/// A running engine process
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    state: EngineState,
}

impl StockfishEngine {
    /// Spawn the engine process with fresh pipes.
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut process = Command::new(&config.stockfish_path)
            .args(&config.engine_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {e}", config.stockfish_path)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("stdout not captured".into()))?;

        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            state: EngineState::Starting,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    fn set_state(&mut self, state: EngineState) {
        debug!(from = ?self.state, to = ?state, "Engine state");
        self.state = state;
    }

    /// Send a command line to the engine
    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| EngineError::Write(e.to_string()))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EngineError::Write(e.to_string()))?;
        Ok(())
    }

    /// Read one trimmed line. End of output is reported as `Closed`.
    async fn next_line(&mut self, expected: &'static str) -> Result<String, EngineError> {
        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| EngineError::Read(e.to_string()))?;
        if n == 0 {
            return Err(EngineError::Closed(expected));
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for an exact response line within `deadline`.
    async fn wait_for(&mut self, expected: &'static str, deadline: Duration) -> Result<(), EngineError> {
        let wait = async {
            loop {
                if self.next_line(expected).await? == expected {
                    return Ok::<(), EngineError>(());
                }
            }
        };
        timeout(deadline, wait).await.map_err(|_| EngineError::Timeout {
            expected,
            waited: deadline,
        })?
    }

    /// UCI handshake, strength options and the readiness check.
    pub async fn configure(
        &mut self,
        settings: StrengthSettings,
        ready_timeout: Duration,
    ) -> Result<(), EngineError> {
        self.set_state(EngineState::Configuring);
        self.send("uci").await?;
        self.wait_for("uciok", ready_timeout).await?;

        self.send("setoption name UCI_LimitStrength value true").await?;
        self.send(&format!("setoption name UCI_Elo value {}", settings.elo)).await?;
        self.send(&format!("setoption name Contempt value {}", settings.contempt)).await?;

        self.set_state(EngineState::AwaitingReady);
        self.send("isready").await?;
        self.wait_for("readyok", ready_timeout).await
    }

    /// Search a position to a fixed depth and return the engine's move, or
    /// `None` if it reported no move.
    pub async fn search(
        &mut self,
        fen: &str,
        depth: u32,
        search_timeout: Duration,
    ) -> Result<Option<String>, EngineError> {
        self.set_state(EngineState::Searching);
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let wait = async {
            loop {
                let line = self.next_line("bestmove").await?;
                if line.starts_with("bestmove") {
                    return Ok::<_, EngineError>(parse_bestmove(&line).map(String::from));
                }
            }
        };
        timeout(search_timeout, wait).await.map_err(|_| EngineError::Timeout {
            expected: "bestmove",
            waited: search_timeout,
        })?
    }

    async fn run(
        &mut self,
        config: &EngineConfig,
        fen: &str,
        settings: StrengthSettings,
    ) -> Result<Option<String>, EngineError> {
        self.configure(settings, config.ready_timeout).await?;
        self.search(fen, config.search_depth, config.search_timeout).await
    }

    /// Kill the process and reap it.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.process.kill().await {
            debug!("Engine kill failed: {e}");
            let _ = timeout(Duration::from_secs(1), self.process.wait()).await;
        }
    }
}

/// Ask a fresh engine process for its best move. Never fails: any spawn,
/// pipe or timeout problem yields the null move `0000`.
pub async fn best_move(config: &EngineConfig, fen: &str, settings: StrengthSettings) -> String {
    let mut engine = match StockfishEngine::spawn(config) {
        Ok(engine) => engine,
        Err(e) => {
            warn!("Engine fallback failed: {e}");
            return NULL_MOVE_UCI.to_string();
        }
    };

    let result = engine.run(config, fen, settings).await;
    engine.set_state(if result.is_ok() {
        EngineState::Done
    } else {
        EngineState::Failed
    });
    engine.shutdown().await;

    match result {
        Ok(Some(mv)) => mv,
        Ok(None) => {
            warn!(fen, "Engine returned no move");
            NULL_MOVE_UCI.to_string()
        }
        Err(e) => {
            warn!(fen, "Engine fallback failed: {e}");
            NULL_MOVE_UCI.to_string()
        }
    }
}

/// Move token of a `bestmove` line. `(none)` and a bare `bestmove` give `None`.
pub fn parse_bestmove(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("bestmove") {
        return None;
    }
    parts.next().filter(|mv| *mv != "(none)")
}
