use shakmaty::san::SanPlus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    /// Parse a PGN `Result` tag value.
    pub fn from_tag(value: &str) -> Self {
        match value.trim() {
            "1-0" => GameResult::WhiteWins,
            "0-1" => GameResult::BlackWins,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameHeaders {
    pub white: String,
    pub black: String,
    pub white_elo: Option<u32>, // None when missing or unparsable
    pub black_elo: Option<u32>,
    pub result: GameResult,
    pub fen: Option<String>, // custom starting position
}

#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    pub headers: GameHeaders,
    pub moves: Vec<SanPlus>,
}
