//! Command line and configuration loading for the server binary.

use anyhow::Result;
use clap::Parser;
use foodhub_common::AppConfig;

/// FoodHub API server
#[derive(Parser, Debug, Default)]
#[command(name = "foodhub-api")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding default.toml and {APP_ENV}.toml
    #[arg(short, long, env = "FOODHUB_CONFIG_DIR", default_value = "config")]
    pub config_dir: String,

    /// Interface to bind, overriding server.host
    #[arg(long, env = "FOODHUB_HOST")]
    pub host: Option<String>,

    /// Port to bind, overriding server.port
    #[arg(short, long, env = "FOODHUB_PORT")]
    pub port: Option<u16>,

    /// Emit JSON logs, overriding telemetry.json_logging
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Load the layered configuration and apply the command line overrides
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_from(&self.config_dir)?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.json_logs {
            config.telemetry.json_logging = true;
        }
    }
}
