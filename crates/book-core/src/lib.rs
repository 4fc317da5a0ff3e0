//! Opening book building and lookup.

pub mod builder;
pub mod encoding;
pub mod error;
pub mod game_data;
pub mod pgn;
pub mod profile;
pub mod reader;
pub mod rules;
pub mod selector;

pub use builder::{build_book, write_book, write_profile, BookBuilder, BuildOptions, BuiltBook, RecordingPolicy};
pub use encoding::{BookEntry, EncodedMove, Promotion, NULL_MOVE_UCI};
pub use error::{BookError, BuildError, RulesError};
pub use game_data::{GameRecord, GameResult};
pub use pgn::GameSource;
pub use profile::Profile;
pub use reader::OpeningBook;
pub use selector::{select_entry, SelectionPolicy};
