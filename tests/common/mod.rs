#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_client::EngineConfig;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Position after 1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5, White to move with castling available.
pub const ITALIAN_FEN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

/// A small history for player "alice".
pub const ALICE_GAMES: &str = r#"[Event "Club"]
[White "alice"]
[Black "bob"]
[WhiteElo "1500"]
[BlackElo "1480"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 d6 1-0

[Event "Club"]
[White "bob"]
[Black "Alice"]
[WhiteElo "1490"]
[BlackElo "1520"]
[Result "1/2-1/2"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 1/2-1/2

[Event "Club"]
[White "alice"]
[Black "carol"]
[WhiteElo "1540"]
[Result "0-1"]

1. e4 c5 2. Nf3 d6 3. d4 cxd4 0-1

[Event "Other"]
[White "dave"]
[Black "erin"]
[Result "1-0"]

1. c4 e5 1-0
"#;

pub const SINGLE_WIN: &str = r#"[White "solo"]
[Black "rival"]
[WhiteElo "1550"]
[BlackElo "1600"]
[Result "1-0"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0
"#;

/// Fake UCI engine: logs every command to $1 and answers `bestmove g1f3`.
pub const RESPONSIVE_ENGINE: &str = r#"
log="$1"
while IFS= read -r line; do
  echo "$line" >> "$log"
  case "$line" in
    uci) echo "id name FakeFish"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 20 pv g1f3"; echo "bestmove g1f3 ponder d7d5" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Writes its pid to $1 and exits without output.
pub const EXITING_ENGINE: &str = r#"echo $$ > "$1"; exit 0"#;

/// Writes its pid to $1, then reads forever without answering.
pub const SILENT_ENGINE: &str = r#"
echo $$ > "$1"
while IFS= read -r line; do :; done
"#;

/// Completes the handshake, then exits when asked to search.
pub const DYING_ENGINE: &str = r#"
while IFS= read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) exit 1 ;;
  esac
done
"#;

/// Completes the handshake and reports that it has no move.
pub const NO_MOVE_ENGINE: &str = r#"
while IFS= read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "bestmove (none)" ;;
  esac
done
"#;

/// Run `script` through `/bin/sh -c`, with `arg` as `$1`.
pub fn fake_engine(script: &str, arg: &Path) -> EngineConfig {
    EngineConfig {
        stockfish_path: "/bin/sh".to_string(),
        engine_args: vec![
            "-c".to_string(),
            script.to_string(),
            "fake-engine".to_string(),
            arg.display().to_string(),
        ],
        search_depth: 15,
        ready_timeout: Duration::from_millis(500),
        search_timeout: Duration::from_secs(2),
    }
}

pub fn missing_engine() -> EngineConfig {
    EngineConfig {
        stockfish_path: "/nonexistent/stockfish".to_string(),
        ..EngineConfig::default()
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
