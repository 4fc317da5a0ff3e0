//! Packed move encoding and the 16-byte book entry layout.
//!
//! The layout is the Polyglot one: every entry is
//! `key (u64) | move (u16) | weight (u16) | learn (u32)`, all big-endian.

use std::fmt;

/// Size of a single book entry in bytes.
pub const ENTRY_SIZE: usize = 16;

/// UCI text of the null move.
pub const NULL_MOVE_UCI: &str = "0000";

const SQUARE_MASK: u16 = 0x3f;
const PROMOTION_MASK: u16 = 0x7;

/// Promotion piece as stored in bits 12-14 of an encoded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    None = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}

impl Promotion {
    /// Decode a promotion code. Codes 5-7 are not valid.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Promotion::None),
            1 => Some(Promotion::Knight),
            2 => Some(Promotion::Bishop),
            3 => Some(Promotion::Rook),
            4 => Some(Promotion::Queen),
            _ => None,
        }
    }

    fn uci_suffix(self) -> Option<char> {
        match self {
            Promotion::None => None,
            Promotion::Knight => Some('n'),
            Promotion::Bishop => Some('b'),
            Promotion::Rook => Some('r'),
            Promotion::Queen => Some('q'),
        }
    }
}

/// A move packed into 16 bits: destination in bits 0-5, origin in bits 6-11,
/// promotion piece in bits 12-14.
///
/// Castling is stored as the king moving onto its own rook (`e1h1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EncodedMove(pub u16);

impl EncodedMove {
    /// The "no move" sentinel (origin and destination both a1).
    pub const NULL: EncodedMove = EncodedMove(0);

    /// Pack origin, destination and promotion. Square indices are masked to
    /// six bits.
    pub fn new(from: u8, to: u8, promotion: Promotion) -> Self {
        let to = u16::from(to) & SQUARE_MASK;
        let from = u16::from(from) & SQUARE_MASK;
        EncodedMove(to | (from << 6) | ((promotion as u16) << 12))
    }

    pub fn from_square(self) -> u8 {
        ((self.0 >> 6) & SQUARE_MASK) as u8
    }

    pub fn to_square(self) -> u8 {
        (self.0 & SQUARE_MASK) as u8
    }

    /// Promotion piece, or `None` if the code is out of range.
    pub fn promotion(self) -> Option<Promotion> {
        Promotion::from_code((self.0 >> 12) & PROMOTION_MASK)
    }

    pub fn is_null(self) -> bool {
        self.from_square() == 0 && self.to_square() == 0
    }
}

impl fmt::Display for EncodedMove {
    /// Raw coordinate form without consulting a board, so castling shows as
    /// king-takes-rook.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str(NULL_MOVE_UCI);
        }
        f.write_str(&square_name(self.from_square()))?;
        f.write_str(&square_name(self.to_square()))?;
        if let Some(c) = self.promotion().and_then(Promotion::uci_suffix) {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// A single record of the opening book file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    /// Position key of the board before the move
    pub key: u64,
    /// Encoded move
    pub mv: EncodedMove,
    /// Number of times the move was played from this position
    pub weight: u16,
    /// Reserved, always written as zero
    pub learn: u32,
}

impl BookEntry {
    pub fn new(key: u64, mv: EncodedMove, weight: u16) -> Self {
        Self {
            key,
            mv,
            weight,
            learn: 0,
        }
    }

    /// Serialize as 16 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[0..8].copy_from_slice(&self.key.to_be_bytes());
        out[8..10].copy_from_slice(&self.mv.0.to_be_bytes());
        out[10..12].copy_from_slice(&self.weight.to_be_bytes());
        out[12..16].copy_from_slice(&self.learn.to_be_bytes());
        out
    }

    /// Parse an entry from 16 big-endian bytes.
    pub fn from_bytes(bytes: &[u8; ENTRY_SIZE]) -> Self {
        Self {
            key: u64::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            mv: EncodedMove(u16::from_be_bytes([bytes[8], bytes[9]])),
            weight: u16::from_be_bytes([bytes[10], bytes[11]]),
            learn: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }
}

/// Concatenate entries into the on-disk representation.
pub fn encode_entries(entries: &[BookEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.len() * ENTRY_SIZE);
    for entry in entries {
        out.extend_from_slice(&entry.to_bytes());
    }
    out
}

fn square_name(index: u8) -> String {
    let file = (b'a' + (index % 8)) as char;
    let rank = (b'1' + (index / 8)) as char;
    format!("{file}{rank}")
}
