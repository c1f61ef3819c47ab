//! Runtime configuration: TOML file, then environment, then CLI flags
//!
//! ```toml
//! [sink]
//! url = "https://script.example/exec"
//! secret = "..."
//! target_id = "sheet-id"
//! timeout_secs = 60
//!
//! [pipeline]
//! scale_factor = 0.35
//!
//! [columns.tracking]
//! key = "A"
//! user = "C"
//! sum = "F"
//! date = "B"
//! head = "D"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::reconcile::ColumnRefs;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SCALE_FACTOR: f64 = 0.35;

pub const ENV_SINK_URL: &str = "CARTON_SINK_URL";
pub const ENV_SECRET: &str = "CARTON_SECRET";
pub const ENV_TARGET_ID: &str = "CARTON_TARGET_ID";
pub const ENV_TIMEOUT_SECS: &str = "CARTON_TIMEOUT_SECS";
pub const ENV_SCALE_FACTOR: &str = "CARTON_SCALE_FACTOR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sink: SinkConfig,
    pub pipeline: PipelineConfig,
    pub columns: ColumnsConfig,
}

/// Where and how results are submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub url: Option<String>,
    pub secret: String,
    /// Opaque identifier of the destination sheet
    pub target_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: None,
            secret: String::new(),
            target_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub scale_factor: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// Column letters for each input source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub tracking: Option<ColumnRefs>,
    pub extraction: Option<ColumnRefs>,
}

impl Config {
    /// `<config_dir>/carton/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("carton").join("config.toml"))
    }

    /// Load from an explicit path, or from the default path when it exists
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    bail!("Config file does not exist: {}", p.display());
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// Apply `CARTON_*` variables from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `CARTON_*` overrides from any key lookup; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_SINK_URL) {
            self.sink.url = Some(url.trim().to_string());
        }
        if let Some(secret) = get(ENV_SECRET) {
            self.sink.secret = secret;
        }
        if let Some(target_id) = get(ENV_TARGET_ID) {
            self.sink.target_id = Some(target_id.trim().to_string());
        }
        if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
            self.sink.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        if let Some(factor) = get(ENV_SCALE_FACTOR) {
            self.pipeline.scale_factor = factor
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number", ENV_SCALE_FACTOR))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sink.timeout_secs)
    }

    pub fn sink_url(&self) -> Result<&str> {
        match self.sink.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => bail!(
                "No sink URL configured. Set [sink] url, {} or --sink-url",
                ENV_SINK_URL
            ),
        }
    }

    pub fn target_id(&self) -> Result<&str> {
        match self.sink.target_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => bail!(
                "No target sheet id configured. Set [sink] target_id, {} or --target-id",
                ENV_TARGET_ID
            ),
        }
    }

    /// Column references for both sources, both required for a run
    pub fn column_refs(&self) -> Result<(ColumnRefs, ColumnRefs)> {
        let tracking = self
            .columns
            .tracking
            .clone()
            .context("No column letters for the tracking workbook. Set [columns.tracking] or --tracking-columns")?;
        let extraction = self
            .columns
            .extraction
            .clone()
            .context("No column letters for the extraction workbook. Set [columns.extraction] or --extraction-columns")?;
        Ok((tracking, extraction))
    }

    /// Check everything a run needs before any workbook is read
    pub fn validate(&self, require_sink: bool) -> Result<()> {
        if require_sink {
            let url = self.sink_url()?;
            reqwest::Url::parse(url).with_context(|| format!("Invalid sink URL: {}", url))?;
            self.target_id()?;
        }
        if self.sink.timeout_secs == 0 {
            bail!("Sink timeout must be at least one second");
        }
        if !self.pipeline.scale_factor.is_finite() {
            bail!("Scale factor must be a finite number, got {}", self.pipeline.scale_factor);
        }
        Ok(())
    }
}
