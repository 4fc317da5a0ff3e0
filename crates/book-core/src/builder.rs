//! Build an opening book and profile from a player's games.
//!
//! Every recorded ply bumps the weight of (position before the move, move).
//! The finished table is flattened into entries sorted by key, which is the
//! order the reader's binary search relies on.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use shakmaty::{Chess, Color, Position};
use tracing::{info, warn};

use crate::encoding::{encode_entries, BookEntry, EncodedMove};
use crate::error::{BuildError, RulesError};
use crate::game_data::GameRecord;
use crate::profile::{Profile, ProfileAccumulator};
use crate::rules;

pub const DEFAULT_MAX_PLY: usize = 10;

/// Which plies of a game end up in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingPolicy {
    /// Every ply, whichever side played it.
    AllPlies,
    /// Only plies where the target player was to move.
    #[default]
    PlayerMoves,
}

impl FromStr for RecordingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(RecordingPolicy::AllPlies),
            "player" => Ok(RecordingPolicy::PlayerMoves),
            other => Err(format!("unknown recording policy '{other}' (expected all|player)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Target player, matched case-insensitively against White/Black
    pub player: String,
    /// Plies replayed per game
    pub max_ply: usize,
    pub recording: RecordingPolicy,
}

impl BuildOptions {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            max_ply: DEFAULT_MAX_PLY,
            recording: RecordingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub games_scanned: u64,
    pub games_used: u64,
    pub games_skipped: u64,
    pub positions: usize,
    pub entries: usize,
}

/// Result of a build: sorted entries, the profile and counters.
#[derive(Debug, Clone)]
pub struct BuiltBook {
    pub entries: Vec<BookEntry>,
    pub profile: Profile,
    pub stats: BuildStats,
}

/// Position key -> moves seen from it, in first-seen order.
type AggregationTable = BTreeMap<u64, Vec<(EncodedMove, u32)>>;

pub struct BookBuilder {
    options: BuildOptions,
    table: AggregationTable,
    profile: ProfileAccumulator,
    stats: BuildStats,
}

impl BookBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            table: BTreeMap::new(),
            profile: ProfileAccumulator::default(),
            stats: BuildStats::default(),
        }
    }

    /// Which side the target player had, if any.
    fn player_color(&self, game: &GameRecord) -> Option<Color> {
        let player = self.options.player.as_str();
        if game.headers.white.eq_ignore_ascii_case(player) {
            Some(Color::White)
        } else if game.headers.black.eq_ignore_ascii_case(player) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Feed one game. Games without the target player are ignored; games that
    /// cannot be replayed are counted for the profile but add no book moves.
    pub fn add_game(&mut self, game: &GameRecord) {
        self.stats.games_scanned += 1;

        let Some(color) = self.player_color(game) else {
            return;
        };
        self.stats.games_used += 1;
        self.profile.record(&game.headers, color == Color::White);

        match self.replay(game, color) {
            Ok(plies) => {
                for (key, mv) in plies {
                    self.bump(key, mv);
                }
            }
            Err(e) => {
                self.stats.games_skipped += 1;
                warn!(
                    game = self.stats.games_scanned,
                    white = %game.headers.white,
                    black = %game.headers.black,
                    "Skipping game: {e}"
                );
            }
        }
    }

    /// Replay the opening of a game and collect the (key, move) pairs to
    /// record. Nothing is committed until the whole prefix replays cleanly.
    fn replay(&self, game: &GameRecord, color: Color) -> Result<Vec<(u64, EncodedMove)>, RulesError> {
        let mut pos = match &game.headers.fen {
            Some(fen) => rules::parse_fen(fen)?,
            None => Chess::default(),
        };

        let mut plies = Vec::new();
        for san in game.moves.iter().take(self.options.max_ply) {
            let mover = pos.turn();
            let mv = rules::san_to_move(&pos, san)?;

            let record = match self.options.recording {
                RecordingPolicy::AllPlies => true,
                RecordingPolicy::PlayerMoves => mover == color,
            };
            if record {
                let encoded = rules::encode_move(&mv).ok_or_else(|| RulesError::IllegalMove {
                    san: san.to_string(),
                    reason: "move cannot be encoded".to_string(),
                })?;
                plies.push((rules::position_key(&pos), encoded));
            }

            pos.play_unchecked(mv);
        }
        Ok(plies)
    }

    fn bump(&mut self, key: u64, mv: EncodedMove) {
        let moves = self.table.entry(key).or_default();
        match moves.iter_mut().find(|(m, _)| *m == mv) {
            Some((_, weight)) => *weight += 1,
            None => moves.push((mv, 1)),
        }
    }

    /// Flatten the table into sorted entries and compute the profile.
    pub fn finish(self) -> BuiltBook {
        let mut entries: Vec<BookEntry> = self
            .table
            .iter()
            .flat_map(|(key, moves)| {
                moves.iter().map(move |(mv, weight)| {
                    let weight = u16::try_from(*weight).unwrap_or(u16::MAX);
                    BookEntry::new(*key, *mv, weight)
                })
            })
            .collect();
        // BTreeMap iteration is already key-ordered; the stable sort keeps
        // that guarantee explicit without disturbing move order.
        entries.sort_by_key(|e| e.key);

        let stats = BuildStats {
            positions: self.table.len(),
            entries: entries.len(),
            ..self.stats
        };
        let profile = self.profile.finish(&self.options.player);

        info!(
            games_scanned = stats.games_scanned,
            games_used = stats.games_used,
            games_skipped = stats.games_skipped,
            positions = stats.positions,
            entries = stats.entries,
            "Opening book built"
        );

        BuiltBook {
            entries,
            profile,
            stats,
        }
    }
}

/// Run a full build over a game source. A read error from the source aborts
/// the build.
pub fn build_book<I>(games: I, options: BuildOptions) -> Result<BuiltBook, BuildError>
where
    I: IntoIterator<Item = io::Result<GameRecord>>,
{
    let mut builder = BookBuilder::new(options);
    for game in games {
        let game = game.map_err(BuildError::Source)?;
        builder.add_game(&game);
    }
    Ok(builder.finish())
}

/// Write the book file. Data goes to a temporary sibling first and is renamed
/// into place, so a failed write never leaves a truncated book behind.
pub fn write_book<P: AsRef<Path>>(path: P, entries: &[BookEntry]) -> Result<(), BuildError> {
    write_atomic(path.as_ref(), &encode_entries(entries))
}

/// Write the profile as pretty JSON.
pub fn write_profile<P: AsRef<Path>>(path: P, profile: &Profile) -> Result<(), BuildError> {
    let json = serde_json::to_vec_pretty(profile)?;
    write_atomic(path.as_ref(), &json)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let write_err = |source: io::Error| BuildError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let result = File::create(tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(tmp_path, path));

    if let Err(e) = result {
        let _ = fs::remove_file(tmp_path);
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::GameSource;
    use crate::rules::parse_fen;

    const START_KEY: u64 = 0x463b96181691fc9c;

    fn build(pgn: &str, options: BuildOptions) -> BuiltBook {
        build_book(GameSource::new(pgn.as_bytes()), options).unwrap()
    }

    fn options(player: &str, recording: RecordingPolicy) -> BuildOptions {
        BuildOptions {
            recording,
            ..BuildOptions::new(player)
        }
    }

    const GAMES: &str = r#"[White "Alice"]
[Black "bob"]
[WhiteElo "1500"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 1-0

[White "carol"]
[Black "alice"]
[BlackElo "1700"]
[Result "0-1"]

1. e4 c5 2. Nf3 d6 0-1

[White "alice"]
[Black "dave"]
[Result "1/2-1/2"]

1. d4 d5 1/2-1/2

[White "x"]
[Black "y"]
[Result "1-0"]

1. c4 1-0
"#;

    #[test]
    fn test_all_plies_weights() {
        let book = build(GAMES, options("alice", RecordingPolicy::AllPlies));

        let start: Vec<_> = book.entries.iter().filter(|e| e.key == START_KEY).collect();
        assert_eq!(start.len(), 2);
        // e4 seen twice, first; d4 once
        assert_eq!(start[0].mv.to_string(), "e2e4");
        assert_eq!(start[0].weight, 2);
        assert_eq!(start[1].mv.to_string(), "d2d4");
        assert_eq!(start[1].weight, 1);

        assert_eq!(book.stats.games_scanned, 4);
        assert_eq!(book.stats.games_used, 3);
        assert_eq!(book.entries.len(), 9);
        assert!(book.entries.iter().all(|e| e.learn == 0));
    }

    #[test]
    fn test_player_moves_only() {
        let book = build(GAMES, options("alice", RecordingPolicy::PlayerMoves));

        let start: Vec<_> = book.entries.iter().filter(|e| e.key == START_KEY).collect();
        // carol's e4 is not alice's move
        assert_eq!(start.len(), 2);
        assert_eq!(start[0].weight, 1);

        // game 1: e4, Nf3; game 2: c5, d6; game 3: d4
        assert_eq!(book.entries.len(), 5);
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let book = build(GAMES, options("alice", RecordingPolicy::AllPlies));
        assert!(book.entries.windows(2).all(|w| w[0].key <= w[1].key));
    }

    #[test]
    fn test_depth_limit() {
        let book = build(
            GAMES,
            BuildOptions {
                max_ply: 1,
                ..options("alice", RecordingPolicy::AllPlies)
            },
        );
        assert!(book.entries.iter().all(|e| e.key == START_KEY));
    }

    #[test]
    fn test_illegal_game_skipped_without_partial_plies() {
        let pgn = r#"[White "alice"]
[Black "bob"]
[Result "1-0"]

1. e4 e5 2. Ke3 1-0

[White "alice"]
[Black "bob"]
[Result "1-0"]

1. d4 1-0
"#;
        let book = build(pgn, options("alice", RecordingPolicy::AllPlies));
        assert_eq!(book.stats.games_skipped, 1);
        assert_eq!(book.entries.len(), 1);
        assert_eq!(book.entries[0].mv.to_string(), "d2d4");
        // skipped games still count toward the profile
        assert_eq!(book.profile.games_played, 2);
    }

    #[test]
    fn test_custom_start_position() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        let pgn = format!(
            "[White \"alice\"]\n[Black \"bob\"]\n[SetUp \"1\"]\n[FEN \"{fen}\"]\n[Result \"*\"]\n\n1. e4 *\n"
        );
        let book = build(&pgn, options("alice", RecordingPolicy::AllPlies));
        let expected_key = rules::position_key(&parse_fen(fen).unwrap());
        assert_eq!(book.entries.len(), 1);
        assert_eq!(book.entries[0].key, expected_key);
    }

    #[test]
    fn test_no_player_games() {
        let book = build(GAMES, options("nobody", RecordingPolicy::AllPlies));
        assert!(book.entries.is_empty());
        assert_eq!(book.profile.estimated_elo, 1400);
        assert_eq!(book.profile.games_played, 0);
    }

    #[test]
    fn test_profile_from_games() {
        let book = build(GAMES, options("alice", RecordingPolicy::PlayerMoves));
        let p = &book.profile;
        assert_eq!(p.games_played, 3);
        assert_eq!((p.wins, p.draws, p.losses), (2, 1, 0));
        // (1500 + 1700 + 1200) / 3
        assert_eq!(p.average_rating, 1466);
        assert_eq!(p.estimated_elo, 1700);
        assert_eq!(p.estimated_contempt_score, 66.67);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build(GAMES, options("alice", RecordingPolicy::AllPlies));
        let b = build(GAMES, options("alice", RecordingPolicy::AllPlies));
        assert_eq!(encode_entries(&a.entries), encode_entries(&b.entries));
    }

    #[test]
    fn test_source_error_aborts() {
        let games = vec![Err(io::Error::new(io::ErrorKind::Other, "boom"))];
        assert!(matches!(
            build_book(games, BuildOptions::new("alice")),
            Err(BuildError::Source(_))
        ));
    }

    #[test]
    fn test_write_book_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let book = build(GAMES, options("alice", RecordingPolicy::AllPlies));

        let book_path = dir.path().join("out").join("book.bin");
        write_book(&book_path, &book.entries).unwrap();
        let bytes = fs::read(&book_path).unwrap();
        assert_eq!(bytes.len(), book.entries.len() * 16);
        assert!(!dir.path().join("out").join("book.bin.tmp").exists());

        let profile_path = dir.path().join("profile.json");
        write_profile(&profile_path, &book.profile).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(&profile_path).unwrap()).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["estimated_elo"], 1700);
        assert_eq!(json["games_played"], 3);
    }

    #[test]
    fn test_empty_book_is_zero_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        write_book(&path, &[]).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_recording_policy_from_str() {
        assert_eq!("all".parse::<RecordingPolicy>(), Ok(RecordingPolicy::AllPlies));
        assert_eq!("Player".parse::<RecordingPolicy>(), Ok(RecordingPolicy::PlayerMoves));
        assert!("both".parse::<RecordingPolicy>().is_err());
    }

    #[test]
    fn test_weight_saturates_at_u16_max() {
        let game = GameSource::new(&b"[White \"alice\"]\n[Black \"bob\"]\n\n1. e4 *\n"[..])
            .next()
            .unwrap()
            .unwrap();
        let mut builder = BookBuilder::new(BuildOptions::new("alice"));
        for _ in 0..=u32::from(u16::MAX) + 1 {
            builder.add_game(&game);
        }
        let book = builder.finish();
        assert_eq!(book.entries.len(), 1);
        assert_eq!(book.entries[0].key, START_KEY);
        assert_eq!(book.entries[0].weight, u16::MAX);
    }
}
