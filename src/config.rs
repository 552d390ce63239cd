//! Intake Configuration - Limits, Catalog, Handoff Key
//!
//! Defaults reproduce the product behavior. A JSON file may override any field.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::entry::DEFAULT_STYLE;

pub const DEFAULT_HANDOFF_KEY: &str = "roomIntakePayload";

pub const STYLE_OPTIONS: [&str; 11] = [
    "Modern",
    "Contemporary",
    "Traditional",
    "Farmhouse",
    "Industrial",
    "Scandinavian",
    "Japandi",
    "Bohemian",
    "Mid-century modern",
    "Coastal",
    "Minimalist",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// What happens when a photo batch would push the set past `maxPhotos`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Append in order until full, drop the remainder.
    #[default]
    Truncate,
    /// Leave the set untouched and surface the "no more than N" message.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLimits {
    #[serde(default = "default_max_styles")]
    pub max_styles: usize,
    #[serde(default = "default_min_photos")]
    pub min_photos: usize,
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,
}

fn default_max_styles() -> usize { 3 }
fn default_min_photos() -> usize { 3 }
fn default_max_photos() -> usize { 8 }

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_styles: default_max_styles(),
            min_photos: default_min_photos(),
            max_photos: default_max_photos(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeConfig {
    #[serde(flatten)]
    pub limits: SelectionLimits,
    #[serde(default = "default_handoff_key")]
    pub handoff_key: String,
    #[serde(default = "default_style_catalog")]
    pub style_catalog: Vec<String>,
    #[serde(default)]
    pub photo_overflow: OverflowPolicy,
}

fn default_handoff_key() -> String { DEFAULT_HANDOFF_KEY.to_string() }

fn default_style_catalog() -> Vec<String> {
    STYLE_OPTIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            limits: SelectionLimits::default(),
            handoff_key: default_handoff_key(),
            style_catalog: default_style_catalog(),
            photo_overflow: OverflowPolicy::default(),
        }
    }
}

impl IntakeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: IntakeConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_styles == 0 {
            return Err(ConfigError::Invalid("maxStyles must be at least 1".into()));
        }
        if self.limits.max_photos == 0 {
            return Err(ConfigError::Invalid("maxPhotos must be at least 1".into()));
        }
        if self.limits.min_photos > self.limits.max_photos {
            return Err(ConfigError::Invalid(format!(
                "minPhotos ({}) exceeds maxPhotos ({})",
                self.limits.min_photos, self.limits.max_photos
            )));
        }
        if self.handoff_key.trim().is_empty() {
            return Err(ConfigError::Invalid("handoffKey cannot be empty".into()));
        }
        let mut seen = HashSet::new();
        for style in &self.style_catalog {
            if !seen.insert(style.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate style in catalog: {}", style)));
            }
        }
        if !self.offers_style(DEFAULT_STYLE) {
            return Err(ConfigError::Invalid(format!(
                "styleCatalog must include the pre-selected style {}",
                DEFAULT_STYLE
            )));
        }
        Ok(())
    }

    pub fn offers_style(&self, style: &str) -> bool {
        self.style_catalog.iter().any(|s| s == style)
    }
}
