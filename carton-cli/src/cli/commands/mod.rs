pub mod dashboard;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::Config;

/// Sink and config flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SinkArgs {
    /// Config file (defaults to <config dir>/carton/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sink endpoint URL
    #[arg(long)]
    pub sink_url: Option<String>,

    /// Destination sheet id
    #[arg(long)]
    pub target_id: Option<String>,

    /// Sink request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl SinkArgs {
    /// Load the config file, then layer environment and flags on top
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env()?;
        if let Some(url) = &self.sink_url {
            config.sink.url = Some(url.clone());
        }
        if let Some(target_id) = &self.target_id {
            config.sink.target_id = Some(target_id.clone());
        }
        if let Some(timeout) = self.timeout_secs {
            config.sink.timeout_secs = timeout;
        }
        Ok(config)
    }
}
