//! Application settings, read from `settings.toml`.
//!
//! A minimal configuration looks like:
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! database = { sqlite = "./bowser.db" }
//! port = 3000
//! ```

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// In-memory database, lost on shutdown. Useful for trying things out.
    Memory,
    /// SQLite database at the given path, created if absent.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter applied to all workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
