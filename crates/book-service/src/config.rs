use std::env;

use book_core::SelectionPolicy;
use engine_client::EngineConfig;

#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    pub engine: EngineConfig,
    pub selection: SelectionPolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            engine: EngineConfig::from_env(),
            selection: env::var("BOOK_SELECTION")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(policy) => Some(policy),
                    Err(e) => {
                        tracing::warn!("Ignoring BOOK_SELECTION: {e}");
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }
}
