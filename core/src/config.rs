use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

/// Construction-time settings for a [`crate::SearchIndex`]. Immutable once the index exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Multiplier applied to matches in a given field. Unlisted fields boost at 1.0.
    pub field_boosts: HashMap<String, f32>,
    /// Directory holding the persisted snapshot. `None` keeps the index memory-only.
    pub data_dir: Option<PathBuf>,
    pub default_limit: usize,
    pub suggest_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let field_boosts = [("title".to_string(), 3.0), ("content".to_string(), 1.0)].into_iter().collect();
        Self {
            field_boosts,
            data_dir: None,
            default_limit: DEFAULT_SEARCH_LIMIT,
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }
}

impl IndexConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: IndexConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_boost(mut self, field: impl Into<String>, boost: f32) -> Self {
        self.field_boosts.insert(field.into(), boost);
        self
    }

    pub fn boost_for(&self, field: &str) -> f32 {
        self.field_boosts.get(field).copied().unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, boost) in &self.field_boosts {
            if !boost.is_finite() || *boost <= 0.0 {
                return Err(IndexError::InvalidConfig(format!(
                    "boost for field '{field}' must be a positive number, got {boost}"
                )));
            }
        }
        if self.default_limit == 0 {
            return Err(IndexError::InvalidConfig("default_limit must be at least 1".into()));
        }
        if self.suggest_limit == 0 {
            return Err(IndexError::InvalidConfig("suggest_limit must be at least 1".into()));
        }
        Ok(())
    }
}

/// Parse a `field=weight` pair as given on the command line.
pub fn parse_boost(raw: &str) -> Result<(String, f32)> {
    let (field, weight) = raw
        .split_once('=')
        .ok_or_else(|| IndexError::InvalidConfig(format!("expected field=weight, got '{raw}'")))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(IndexError::InvalidConfig(format!("missing field name in '{raw}'")));
    }
    let weight: f32 = weight
        .trim()
        .parse()
        .map_err(|_| IndexError::InvalidConfig(format!("invalid boost weight in '{raw}'")))?;
    Ok((field.to_string(), weight))
}
