//! Look up a book move for a position.
//!
//! Usage: find-move --book PATH --fen FEN
//!
//! Prints `{"uci_move": "..."}`; the move is empty when the book has none.

use std::env;

use anyhow::bail;
use book_service::{find_opening_move, ServiceConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    book_service::init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut book = None;
    let mut fen = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--book" => book = args.get(i + 1).cloned(),
            "--fen" => fen = args.get(i + 1).cloned(),
            other => bail!("Unknown argument {other}"),
        }
        i += 2;
    }

    let (Some(book), Some(fen)) = (book, fen) else {
        bail!("Usage: find-move --book PATH --fen FEN");
    };

    let config = ServiceConfig::from_env();
    let mv = find_opening_move(&book, &fen, config.selection, &mut rand::thread_rng())?;

    println!("{}", serde_json::json!({ "uci_move": mv.unwrap_or_default() }));
    Ok(())
}
