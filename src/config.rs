// ⚙️ Dashboard Configuration - read-only constants for the sheet pipeline
//
// Loaded once (defaults, optional JSON file, optional env overrides) and then
// handed to SheetPipeline::new. Nothing mutates it afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Drive file shown when the config sheet has no usable avatar
pub const DEFAULT_AVATAR_ID: &str = "1hQx7nV2pLrT9sWcB4kYdE3mZ8aF6gJ0u";

/// Savings goal used when the config sheet has no "Target Aset" row (Rp 100 juta)
pub const DEFAULT_TARGET: f64 = 100_000_000.0;

/// Env var overriding [`DashboardConfig::default_avatar_id`]
pub const ENV_DEFAULT_AVATAR_ID: &str = "DASHBOARD_DEFAULT_AVATAR_ID";

/// Env var overriding [`DashboardConfig::default_target`]
pub const ENV_DEFAULT_TARGET: &str = "DASHBOARD_DEFAULT_TARGET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Fallback Drive identifier for the profile picture
    #[serde(default = "default_avatar_id")]
    pub default_avatar_id: String,

    /// Fallback savings target
    #[serde(default = "default_target")]
    pub default_target: f64,

    /// Drive thumbnail size parameter (`sz=`)
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: String,

    /// Placeholder avatar background colour (hex, no '#')
    #[serde(default = "default_placeholder_background")]
    pub placeholder_background: String,

    /// Placeholder avatar text colour (hex, no '#')
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,

    /// Placeholder avatar size in pixels
    #[serde(default = "default_placeholder_size")]
    pub placeholder_size: u32,
}

// Helper functions for serde defaults
fn default_avatar_id() -> String {
    DEFAULT_AVATAR_ID.to_string()
}

fn default_target() -> f64 {
    DEFAULT_TARGET
}

fn default_thumbnail_size() -> String {
    "w500".to_string()
}

fn default_placeholder_background() -> String {
    "667eea".to_string()
}

fn default_placeholder_color() -> String {
    "fff".to_string()
}

fn default_placeholder_size() -> u32 {
    150
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            default_avatar_id: default_avatar_id(),
            default_target: default_target(),
            thumbnail_size: default_thumbnail_size(),
            placeholder_background: default_placeholder_background(),
            placeholder_color: default_placeholder_color(),
            placeholder_size: default_placeholder_size(),
        }
    }
}

impl DashboardConfig {
    /// Load config from a JSON file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;

        let config: DashboardConfig =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        tracing::debug!(path = ?path.as_ref(), "loaded dashboard settings");
        Ok(config)
    }

    /// Apply `DASHBOARD_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (env vars in production, a map in tests)
    ///
    /// Blank values are ignored; an unparseable target is ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(ENV_DEFAULT_AVATAR_ID).filter(|v| !v.trim().is_empty()) {
            self.default_avatar_id = id.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_DEFAULT_TARGET).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<f64>() {
                Ok(target) if target.is_finite() => self.default_target = target,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_DEFAULT_TARGET),
            }
        }

        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
