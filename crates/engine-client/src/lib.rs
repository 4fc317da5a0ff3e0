pub mod config;
pub mod error;
pub mod stockfish;

pub use config::EngineConfig;
pub use error::EngineError;
pub use stockfish::{best_move, EngineState, StockfishEngine, StrengthSettings};
