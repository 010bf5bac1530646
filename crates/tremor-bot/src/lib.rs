//! Tremor bot: chat command surface and weekly scheduler for the tremor pattern engine.

pub mod commands;
pub mod config;
pub mod protocol;
pub mod repl;
pub mod report;
pub mod scheduler;
pub mod transport;
pub mod types;

use std::sync::Arc;

use tokio::sync::Mutex;
use tremor_engine::PatternAnalyzer;

use crate::types::{BotError, BotResult};

pub use config::{resolve_registry_path, BotConfig};
pub use protocol::ChatHandler;
pub use scheduler::{SchedulerConfig, TremorScheduler};
pub use transport::StdioTransport;

/// The single engine instance shared by the chat handler and the scheduler.
pub type SharedEngine = Arc<Mutex<dyn PatternAnalyzer + Send>>;

/// Wrap an engine for sharing.
pub fn share<E: PatternAnalyzer + Send + 'static>(engine: E) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Run `f` against the engine on the blocking pool.
///
/// Engine calls touch the filesystem, so they stay off the async workers. The lock is
/// taken inside the blocking task and released when `f` returns.
pub async fn run_blocking<T, F>(engine: &SharedEngine, f: F) -> BotResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn PatternAnalyzer) -> BotResult<T> + Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || {
        let mut guard = engine.blocking_lock();
        f(&mut *guard)
    })
    .await
    .map_err(|e| BotError::Engine(format!("Engine task failed: {e}")))?
}
