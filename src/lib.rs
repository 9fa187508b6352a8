pub mod autoscan;
pub mod db;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod prune;
pub mod settings;
mod utils;

pub use db::Database;
pub use settings::SettingsStore;

/// Initialize logging for embedding shells (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
