//! Answer a move for a position: book move if available, engine otherwise.
//!
//! Usage: bot-move --book PATH --profile PATH --fen FEN
//!
//! Engine settings come from the environment (STOCKFISH_PATH, SEARCH_DEPTH,
//! ENGINE_READY_TIMEOUT_MS, ENGINE_SEARCH_TIMEOUT_MS).

use std::env;

use anyhow::bail;
use book_service::{get_bot_move, ServiceConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    book_service::init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut book = None;
    let mut profile = None;
    let mut fen = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--book" => book = value,
            "--profile" => profile = value,
            "--fen" => fen = value,
            other => bail!("Unknown argument {other}"),
        }
        i += 2;
    }

    let (Some(book), Some(profile), Some(fen)) = (book, profile, fen) else {
        bail!("Usage: bot-move --book PATH --profile PATH --fen FEN");
    };

    let config = ServiceConfig::from_env();
    info!(stockfish_path = %config.engine.stockfish_path, "Finding move for {fen}");

    let mut rng = StdRng::from_entropy();
    let mv = get_bot_move(&config, &book, &profile, &fen, &mut rng).await?;

    println!("{}", serde_json::to_string(&mv)?);
    Ok(())
}
