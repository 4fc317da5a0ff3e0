//! Build a player's opening book and profile from PGN files.
//!
//! Usage: build-book <pgn_file_or_dir> --player NAME [--max-ply 10]
//!        [--record all|player] [--out book.bin] [--profile profile.json]
//!
//! Example:
//!   cargo run --release --bin build-book -- games/ --player magnus --out data/magnus.bin

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use book_core::builder::DEFAULT_MAX_PLY;
use book_core::{write_book, write_profile, BookBuilder, BuildOptions, GameSource, RecordingPolicy};
use tracing::info;

const DEFAULT_BOOK_PATH: &str = "data/opening_book.bin";
const DEFAULT_PROFILE_PATH: &str = "data/profile.json";

struct Args {
    input: PathBuf,
    options: BuildOptions,
    book_path: PathBuf,
    profile_path: PathBuf,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <pgn_file_or_dir> --player NAME [--max-ply N] [--record all|player] \
         [--out PATH] [--profile PATH]"
    )
}

/// Value following `flag`; a flag at the end of the line is an error.
fn flag_value(flag: &str, value: Option<&String>, program: &str) -> anyhow::Result<String> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(v.clone()),
        _ => bail!("{flag} expects a value\n{}", usage(program)),
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let program = args.first().map(String::as_str).unwrap_or("build-book");

    let Some(input) = args.get(1).filter(|a| !a.starts_with("--")) else {
        bail!(usage(program));
    };

    let mut player = None;
    let mut max_ply = DEFAULT_MAX_PLY;
    let mut recording = RecordingPolicy::default();
    let mut book_path = PathBuf::from(DEFAULT_BOOK_PATH);
    let mut profile_path = PathBuf::from(DEFAULT_PROFILE_PATH);

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || flag_value(flag, args.get(i + 1), program);
        match flag {
            "--player" => player = Some(value()?),
            "--max-ply" => max_ply = value()?.parse().context("--max-ply expects a number")?,
            "--record" => recording = value()?.parse().map_err(anyhow::Error::msg)?,
            "--out" => book_path = PathBuf::from(value()?),
            "--profile" => profile_path = PathBuf::from(value()?),
            other => bail!("Unknown argument {other}\n{}", usage(program)),
        }
        i += 2;
    }

    let Some(player) = player else {
        bail!("--player is required\n{}", usage(program));
    };

    Ok(Args {
        input: PathBuf::from(input),
        options: BuildOptions {
            player,
            max_ply,
            recording,
        },
        book_path,
        profile_path,
    })
}

/// A single PGN file, or every `*.pgn` in a directory (sorted, so repeated
/// builds see the games in the same order).
fn pgn_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let pattern = format!("{}/*.pgn", input.display());
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(|p| p.ok()).collect();
    files.sort();
    if files.is_empty() {
        bail!("No PGN files found in {}", input.display());
    }
    Ok(files)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    book_service::init_tracing();

    let args = parse_args(&env::args().collect::<Vec<_>>())?;
    let files = pgn_files(&args.input)?;

    info!(
        player = %args.options.player,
        max_ply = args.options.max_ply,
        recording = ?args.options.recording,
        files = files.len(),
        "Building opening book"
    );

    let start = Instant::now();
    let mut builder = BookBuilder::new(args.options.clone());
    let mut total_games = 0u64;

    for path in &files {
        info!("Processing {}...", path.display());
        let source =
            GameSource::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        for game in source {
            let game = game.with_context(|| format!("Failed to read {}", path.display()))?;
            builder.add_game(&game);
            total_games += 1;
            if total_games % 50_000 == 0 {
                info!(games = total_games, elapsed_s = start.elapsed().as_secs(), "Progress");
            }
        }
    }

    let built = builder.finish();

    write_book(&args.book_path, &built.entries)?;
    write_profile(&args.profile_path, &built.profile)?;

    println!("Done in {:.1}s", start.elapsed().as_secs_f64());
    println!("  Games scanned: {}", built.stats.games_scanned);
    println!("  Games used:    {}", built.stats.games_used);
    println!("  Games skipped: {}", built.stats.games_skipped);
    println!("  Positions:     {}", built.stats.positions);
    println!("  Entries:       {}", built.stats.entries);
    println!("  Book:          {}", args.book_path.display());
    println!("  Profile:       {}", args.profile_path.display());
    println!(
        "  Estimated Elo: {} (average {}), contempt {}",
        built.profile.estimated_elo,
        built.profile.average_rating,
        built.profile.estimated_contempt_score
    );

    Ok(())
}
