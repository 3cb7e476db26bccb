use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional settings file, read from the working directory.
pub const CONFIG_FILE: &str = "sp-buy.json";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model artifact loaded once at startup.
    pub model_path: PathBuf,
    /// Rows per page in the bulk result viewer.
    pub rows_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("FinalModel_DT.json"),
            rows_per_page: 20,
        }
    }
}

impl AppConfig {
    /// Settings file (if any) plus environment overrides. A broken settings
    /// file is reported and replaced by the defaults.
    pub fn load() -> Self {
        let config = match Self::load_from_path(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring {CONFIG_FILE}: {e:#}");
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read settings from a JSON file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Apply `SPBUY_MODEL_PATH` / `SPBUY_ROWS_PER_PAGE`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("SPBUY_MODEL_PATH").filter(|p| !p.trim().is_empty()) {
            self.model_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup("SPBUY_ROWS_PER_PAGE") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.rows_per_page = n,
                _ => log::warn!("Ignoring SPBUY_ROWS_PER_PAGE={raw:?}"),
            }
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.rows_per_page == 0 {
            log::warn!("rows_per_page must be positive; using 20");
            self.rows_per_page = Self::default().rows_per_page;
        }
        self
    }
}
