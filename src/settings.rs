use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "STORIES";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub stories_dir: PathBuf,
    pub archive_base: String,
    pub site_base: String,
    pub request_delay_ms: u64,
    pub user_agent: String,
}

/// Defaults overlaid with `STORIES_*` environment variables.
pub fn load() -> Result<Settings> {
    from_env(Environment::with_prefix(ENV_PREFIX))
}

fn from_env(env: Environment) -> Result<Settings> {
    Config::builder()
        .set_default("stories_dir", "stories")?
        .set_default("archive_base", "https://web.archive.org/web")?
        .set_default("site_base", "http://www.davejenkins.com")?
        .set_default("request_delay_ms", 1000)?
        .set_default(
            "user_agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )?
        .add_source(env.try_parsing(true))
        .build()
        .context("Failed to build settings")?
        .try_deserialize()
        .context("Invalid STORIES_* settings")
}
