//! RON configuration: selectors, settle delays, output location.
//!
//! Everything has a production default mirroring the host UI's current
//! structure, so the file is optional and may be partial.

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use harvester_engine::{ExportOptions, HarvestSettings, SelectorConfig, WaitPolicy};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "harvester.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub webdriver_url: String,
    pub output_dir: PathBuf,
    pub output_filename: String,
    pub selectors: Selectors,
    pub waits: WaitMillis,
    pub scroll_step: f64,
    pub scroll_tolerance: f64,
    pub exhaustion_limit: u32,
    pub read_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = HarvestSettings::default();
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            output_dir: PathBuf::from("output"),
            output_filename: ExportOptions::default().output_filename,
            selectors: Selectors::default(),
            waits: WaitMillis::default(),
            scroll_step: settings.scroll_step,
            scroll_tolerance: settings.scroll_tolerance,
            exhaustion_limit: settings.exhaustion_limit,
            read_attempts: settings.read_attempts,
        }
    }
}

/// Serializable mirror of the engine's [`SelectorConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub list_container: String,
    pub row: String,
    pub row_title: String,
    pub headers: Vec<String>,
    pub header_title: String,
    pub panels: Vec<String>,
    pub directional_fragment: String,
    pub close_button: String,
}

impl Default for Selectors {
    fn default() -> Self {
        let defaults = SelectorConfig::default();
        Self {
            list_container: defaults.list_container,
            row: defaults.row,
            row_title: defaults.row_title,
            headers: defaults.headers,
            header_title: defaults.header_title,
            panels: defaults.panels,
            directional_fragment: defaults.directional_fragment,
            close_button: defaults.close_button,
        }
    }
}

/// Settle delays in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitMillis {
    pub pre_open: u64,
    pub post_open: u64,
    pub read_base: u64,
    pub read_step: u64,
    pub post_save: u64,
    pub post_scroll: u64,
}

impl Default for WaitMillis {
    fn default() -> Self {
        let waits = WaitPolicy::default();
        Self {
            pre_open: waits.pre_open.as_millis() as u64,
            post_open: waits.post_open.as_millis() as u64,
            read_base: waits.read_base.as_millis() as u64,
            read_step: waits.read_step.as_millis() as u64,
            post_save: waits.post_save.as_millis() as u64,
            post_scroll: waits.post_scroll.as_millis() as u64,
        }
    }
}

impl AppConfig {
    pub fn harvest_settings(&self) -> HarvestSettings {
        HarvestSettings {
            waits: WaitPolicy {
                pre_open: Duration::from_millis(self.waits.pre_open),
                post_open: Duration::from_millis(self.waits.post_open),
                read_base: Duration::from_millis(self.waits.read_base),
                read_step: Duration::from_millis(self.waits.read_step),
                post_save: Duration::from_millis(self.waits.post_save),
                post_scroll: Duration::from_millis(self.waits.post_scroll),
            },
            scroll_step: self.scroll_step,
            scroll_tolerance: self.scroll_tolerance,
            exhaustion_limit: self.exhaustion_limit,
            read_attempts: self.read_attempts,
        }
    }

    pub fn selector_config(&self) -> SelectorConfig {
        let selectors = self.selectors.clone();
        SelectorConfig {
            list_container: selectors.list_container,
            row: selectors.row,
            row_title: selectors.row_title,
            headers: selectors.headers,
            header_title: selectors.header_title,
            panels: selectors.panels,
            directional_fragment: selectors.directional_fragment,
            close_button: selectors.close_button,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            output_filename: self.output_filename.clone(),
        }
    }
}

/// Load the config file. A missing file means defaults; a broken file is
/// reported and replaced by defaults.
pub fn load(path: &Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("no config at {}; using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            engine_warn!("failed to read config {}: {}", path.display(), err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            engine_warn!("failed to parse config {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}
