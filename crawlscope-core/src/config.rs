use crate::error::{AuditError, Result};
use crawlscope_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Per-page thresholds for the content, link and meta description audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageThresholds {
    pub min_word_count: u32,
    /// Percent of visible text over markup
    pub min_text_ratio: f64,
    pub min_meta_description_length: u32,
    pub max_meta_description_length: u32,
    pub min_title_length: u32,
    pub max_title_length: u32,
    pub max_outlinks: u32,
    pub min_inlinks: u32,
    pub max_crawl_depth: u32,
}

impl Default for PageThresholds {
    fn default() -> Self {
        Self {
            min_word_count: 300,
            min_text_ratio: 5.0,
            min_meta_description_length: 120,
            max_meta_description_length: 160,
            min_title_length: 30,
            max_title_length: 60,
            max_outlinks: 100,
            min_inlinks: 3,
            max_crawl_depth: 3,
        }
    }
}

/// Settings for one audit run, loadable from a JSON file. Sections and
/// fields left out of the file keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub pages: PageThresholds,
    pub redirects: ResolverConfig,
}

impl AuditConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!("Loaded audit configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: AuditConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.redirects.validate()?;

        let pages = &self.pages;
        if pages.min_meta_description_length > pages.max_meta_description_length {
            return Err(AuditError::InvalidConfig(format!(
                "min_meta_description_length ({}) exceeds max_meta_description_length ({})",
                pages.min_meta_description_length, pages.max_meta_description_length
            )));
        }
        if pages.min_title_length > pages.max_title_length {
            return Err(AuditError::InvalidConfig(format!(
                "min_title_length ({}) exceeds max_title_length ({})",
                pages.min_title_length, pages.max_title_length
            )));
        }
        Ok(())
    }
}
