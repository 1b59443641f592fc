use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::har::document::Creator;
use crate::har::SynthOptions;

/// Global configuration loaded from `~/.config/harrec/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarrecConfig {
    /// `log.creator.name` in generated archives.
    pub creator_name: String,
    /// `log.creator.version` in generated archives.
    pub creator_version: String,
    #[serde(default)]
    pub creator_comment: Option<String>,
    /// Pretty-print archives (indented JSON). Compact output is smaller.
    pub pretty: bool,
    /// Fill page `startedDateTime` and `pageTimings` from the recorded page
    /// events instead of placeholders.
    #[serde(default)]
    pub derive_page_timings: bool,
    /// Directory archives are written to; defaults to the working directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for HarrecConfig {
    fn default() -> Self {
        let synth = SynthOptions::default();
        Self {
            creator_name: synth.creator.name,
            creator_version: synth.creator.version,
            creator_comment: synth.creator.comment,
            pretty: true,
            derive_page_timings: synth.derive_page_timings,
            output_dir: None,
        }
    }
}

impl HarrecConfig {
    pub fn synth_options(&self) -> SynthOptions {
        SynthOptions {
            creator: Creator {
                name: self.creator_name.clone(),
                version: self.creator_version.clone(),
                comment: self.creator_comment.clone(),
            },
            derive_page_timings: self.derive_page_timings,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("harrec")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HarrecConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<HarrecConfig> {
    if !path.exists() {
        let default_cfg = HarrecConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HarrecConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
