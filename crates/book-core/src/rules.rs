//! Narrow wrapper over shakmaty: FEN parsing, move application, position keys
//! and conversion between shakmaty moves and the packed book encoding.
//!
//! Position keys are Polyglot-compatible Zobrist hashes. Two distinct
//! positions can share a key; such collisions are accepted and the book
//! treats them as the same position.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position, Role};

use crate::encoding::{BookEntry, EncodedMove, Promotion};
use crate::error::RulesError;

/// Build a position from a FEN string.
pub fn parse_fen(fen: &str) -> Result<Chess, RulesError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| RulesError::InvalidFen(format!("{e}")))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| RulesError::InvalidFen(format!("{e}")))
}

/// Position key of a board.
pub fn position_key(pos: &Chess) -> u64 {
    let z: Zobrist64 = pos.zobrist_hash(EnPassantMode::Legal);
    z.0
}

/// Pack a shakmaty move. Drops (`Move::Put`) have no origin square and cannot
/// occur in standard chess, so they are not encodable.
pub fn encode_move(mv: &Move) -> Option<EncodedMove> {
    let from = mv.from()?;
    let promotion = match mv.promotion() {
        None => Promotion::None,
        Some(Role::Knight) => Promotion::Knight,
        Some(Role::Bishop) => Promotion::Bishop,
        Some(Role::Rook) => Promotion::Rook,
        Some(Role::Queen) => Promotion::Queen,
        Some(_) => return None,
    };
    Some(EncodedMove::new(from as u8, mv.to() as u8, promotion))
}

/// Resolve a SAN ply against the position and return the legal move.
pub fn san_to_move(pos: &Chess, san: &SanPlus) -> Result<Move, RulesError> {
    san.san.to_move(pos).map_err(|e| RulesError::IllegalMove {
        san: san.to_string(),
        reason: format!("{e}"),
    })
}

/// Find the legal move in `pos` that packs to `mv`.
pub fn decode_move(pos: &Chess, mv: EncodedMove) -> Option<Move> {
    pos.legal_moves()
        .into_iter()
        .find(|legal| encode_move(legal) == Some(mv))
}

/// Standard UCI text of a book entry in the given position (castling comes out
/// as `e1g1`). Returns `None` if the entry is not a legal move there.
pub fn entry_to_uci(pos: &Chess, entry: &BookEntry) -> Option<String> {
    decode_move(pos, entry.mv).map(|m| m.to_uci(CastlingMode::Standard).to_string())
}
