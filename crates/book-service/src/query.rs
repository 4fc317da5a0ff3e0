//! Move queries: opening book first, engine second.

use std::fs;
use std::path::Path;

use book_core::{rules, select_entry, BookEntry, OpeningBook, SelectionPolicy};
use engine_client::{best_move, StrengthSettings};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::Chess;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Book,
    Engine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotMove {
    pub uci_move: String,
    pub source: MoveSource,
}

/// Engine-relevant fields of a profile file. Anything else in the file is
/// ignored.
#[derive(Deserialize)]
struct ProfileSettings {
    estimated_elo: Option<f64>,
    estimated_contempt_score: Option<f64>,
}

/// Read strength settings from a profile JSON file. Missing fields fall back
/// to elo 1200 and contempt 20.
pub fn load_strength_settings<P: AsRef<Path>>(path: P) -> Result<StrengthSettings, ServiceError> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| ServiceError::InvalidProfile(format!("{}: {e}", path.as_ref().display())))?;
    let parsed: ProfileSettings =
        serde_json::from_str(&text).map_err(|e| ServiceError::InvalidProfile(e.to_string()))?;

    let defaults = StrengthSettings::default();
    Ok(StrengthSettings {
        elo: parsed.estimated_elo.map(|v| v as i64).unwrap_or(defaults.elo),
        contempt: parsed
            .estimated_contempt_score
            .map(|v| v.round() as i64)
            .unwrap_or(defaults.contempt),
    })
}

/// Pick a book move for `pos`, or `None` when the book has nothing usable.
/// An unreadable or malformed book counts as having nothing.
pub fn lookup_book_move<P, R>(
    book_path: P,
    pos: &Chess,
    policy: SelectionPolicy,
    rng: &mut R,
) -> Option<String>
where
    P: AsRef<Path>,
    R: Rng + ?Sized,
{
    let book = match OpeningBook::open(book_path.as_ref()) {
        Ok(book) => book,
        Err(e) => {
            warn!(path = %book_path.as_ref().display(), "Opening book error: {e}");
            return None;
        }
    };

    let key = rules::position_key(pos);
    // Entries that are not legal here belong to a colliding position.
    let candidates: Vec<BookEntry> = book
        .find_all(key)
        .iter()
        .filter(|e| rules::decode_move(pos, e.mv).is_some())
        .copied()
        .collect();
    info!(key = %format!("{key:016x}"), candidates = candidates.len(), "Book lookup");

    let entry = select_entry(&candidates, policy, rng)?;
    rules::entry_to_uci(pos, entry)
}

/// Book-only lookup.
pub fn find_opening_move<P, R>(
    book_path: P,
    fen: &str,
    policy: SelectionPolicy,
    rng: &mut R,
) -> Result<Option<String>, ServiceError>
where
    P: AsRef<Path>,
    R: Rng + ?Sized,
{
    let pos = rules::parse_fen(fen)?;
    Ok(lookup_book_move(book_path, &pos, policy, rng))
}

/// Book move if there is one, otherwise the engine's move tuned by the
/// profile. Only a bad profile or FEN is an error.
pub async fn get_bot_move<P, Q, R>(
    config: &ServiceConfig,
    book_path: P,
    profile_path: Q,
    fen: &str,
    rng: &mut R,
) -> Result<BotMove, ServiceError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: Rng + ?Sized,
{
    let pos = rules::parse_fen(fen)?;
    let settings = load_strength_settings(profile_path)?;

    if let Some(uci_move) = lookup_book_move(book_path, &pos, config.selection, rng) {
        return Ok(BotMove {
            uci_move,
            source: MoveSource::Book,
        });
    }

    info!(fen, elo = settings.elo, contempt = settings.contempt, "No book move, asking engine");
    let uci_move = best_move(&config.engine, fen.trim(), settings).await;
    Ok(BotMove {
        uci_move,
        source: MoveSource::Engine,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_settings_from_full_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "p.json",
            r#"{"username":"a","estimated_elo":1800,"estimated_contempt_score":66.67}"#,
        );
        let settings = load_strength_settings(&path).unwrap();
        assert_eq!(settings.elo, 1800);
        assert_eq!(settings.contempt, 67);
    }

    #[test]
    fn test_settings_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "p.json", "{}");
        assert_eq!(load_strength_settings(&path).unwrap(), StrengthSettings::default());
    }

    #[test]
    fn test_settings_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "p.json", "{not json");
        assert!(matches!(
            load_strength_settings(&path),
            Err(ServiceError::InvalidProfile(_))
        ));

        let path = write(dir.path(), "q.json", r#"{"estimated_elo":"strong"}"#);
        assert!(matches!(
            load_strength_settings(&path),
            Err(ServiceError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_find_opening_move_rejects_bad_fen() {
        let mut rng = rand::thread_rng();
        assert!(matches!(
            find_opening_move("unused.bin", "garbage", SelectionPolicy::Uniform, &mut rng),
            Err(ServiceError::InvalidFen(_))
        ));
    }
}
