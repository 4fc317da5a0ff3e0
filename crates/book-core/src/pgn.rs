//! Lazy PGN game source built on pgn-reader.
//!
//! Games are produced one at a time in file order; the source is forward-only
//! and has to be reopened to read the games again.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::ops::ControlFlow;
use std::path::Path;

use pgn_reader::{RawTag, Reader, SanPlus, Visitor};

use crate::game_data::{GameHeaders, GameRecord, GameResult};

/// Visitor that turns each game into a `GameRecord`. Variations are skipped.
struct GameCollector;

impl Visitor for GameCollector {
    type Tags = GameHeaders;
    type Movetext = GameRecord;
    type Output = GameRecord;

    fn begin_tags(&mut self) -> ControlFlow<GameRecord, GameHeaders> {
        ControlFlow::Continue(GameHeaders::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameHeaders,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<GameRecord> {
        match name {
            b"White" => tags.white = value.decode_utf8_lossy().into_owned(),
            b"Black" => tags.black = value.decode_utf8_lossy().into_owned(),
            b"WhiteElo" => tags.white_elo = value.decode_utf8_lossy().trim().parse().ok(),
            b"BlackElo" => tags.black_elo = value.decode_utf8_lossy().trim().parse().ok(),
            b"Result" => tags.result = GameResult::from_tag(&value.decode_utf8_lossy()),
            b"FEN" => tags.fen = Some(value.decode_utf8_lossy().into_owned()),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameHeaders) -> ControlFlow<GameRecord, GameRecord> {
        ControlFlow::Continue(GameRecord {
            headers: tags,
            moves: Vec::new(),
        })
    }

    fn san(&mut self, game: &mut GameRecord, san_plus: SanPlus) -> ControlFlow<GameRecord> {
        game.moves.push(san_plus);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, game: GameRecord) -> GameRecord {
        game
    }
}

/// Iterator over the games of a PGN stream.
pub struct GameSource<R: Read> {
    reader: Reader<R>,
    collector: GameCollector,
}

impl<R: Read> GameSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: Reader::new(inner),
            collector: GameCollector,
        }
    }
}

impl GameSource<BufReader<File>> {
    /// Open a PGN file.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Iterator for GameSource<R> {
    type Item = io::Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_game(&mut self.collector).transpose()
    }
}
