//! Engine configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the UCI engine binary
    pub stockfish_path: String,

    /// Extra arguments passed to the engine
    pub engine_args: Vec<String>,

    /// Fixed search depth for `go depth N`
    pub search_depth: u32,

    /// Deadline for each `uciok` / `readyok` handshake
    pub ready_timeout: Duration,

    /// Deadline for the search to produce a `bestmove` line
    pub search_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stockfish_path: default_stockfish_path(),
            engine_args: Vec::new(),
            search_depth: 15,
            ready_timeout: Duration::from_millis(5_000),
            search_timeout: Duration::from_millis(30_000),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let stockfish_path = env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);

        let engine_args = env::var("STOCKFISH_ARGS")
            .map(|v| v.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        let search_depth = env::var("SEARCH_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.search_depth);

        let ready_timeout = env::var("ENGINE_READY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.ready_timeout);

        let search_timeout = env::var("ENGINE_SEARCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.search_timeout);

        Self {
            stockfish_path,
            engine_args,
            search_depth,
            ready_timeout,
            search_timeout,
        }
    }
}

/// `stockfish.exe` next to the running executable on Windows,
/// `/usr/local/bin/stockfish` elsewhere.
pub fn default_stockfish_path() -> String {
    if cfg!(windows) {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("stockfish.exe")))
            .unwrap_or_else(|| PathBuf::from("stockfish.exe"))
            .display()
            .to_string()
    } else {
        "/usr/local/bin/stockfish".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.search_depth, 15);
        assert!(config.engine_args.is_empty());
        #[cfg(unix)]
        assert_eq!(config.stockfish_path, "/usr/local/bin/stockfish");
    }
}
