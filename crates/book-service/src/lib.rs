pub mod config;
pub mod error;
pub mod query;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use query::{find_opening_move, get_bot_move, load_strength_settings, BotMove, MoveSource};

/// Install the tracing subscriber used by the binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
