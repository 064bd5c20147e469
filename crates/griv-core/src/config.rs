//! Configuration for griv
//!
//! Stored in .griv/config.toml

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default first tracking sequence base (codes start at base + 1)
pub const DEFAULT_SERIES_BASE: u64 = 2_024_000;

/// Municipal wards shipped as the default open list
pub const DEFAULT_WARDS: [&str; 15] = [
    "Naupada",
    "Kopri",
    "Wagle Estate",
    "Majiwada",
    "Manpada",
    "Hiranandani",
    "Ghodbunder",
    "Kalwa",
    "Mumbra",
    "Diva",
    "Bhiwandi",
    "Ulhasnagar",
    "Thane West",
    "Thane East",
    "Vartak Nagar",
];

/// griv configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracking code series base; the first issued code is base + 1
    pub series_base: u64,

    /// Default priority for new grievances (low, medium, high, critical)
    pub default_priority: String,

    /// Municipal ward list; submissions must name one of these
    pub wards: Vec<String>,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            series_base: DEFAULT_SERIES_BASE,
            default_priority: "medium".to_string(),
            wards: DEFAULT_WARDS.iter().map(|w| (*w).to_string()).collect(),
            display: DisplayConfig::default(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Date format for display
    pub date_format: String,

    /// Show grievance count in list header
    pub show_count: bool,

    /// Maximum description length before truncation
    pub max_description_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            date_format: "%Y-%m-%d %H:%M".to_string(),
            show_count: true,
            max_description_length: 60,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Other(format!("Invalid config: {}", e)))?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Other(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check whether a ward is on the configured list, exact match
    pub fn has_ward(&self, ward: &str) -> bool {
        self.wards.iter().any(|w| w == ward)
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        let mut out = String::from(
            r#"# griv configuration

# Tracking code series base; the first issued code is base + 1
# (TMC2024001 for the default base)
series_base = 2024000

# Default priority for new grievances (low, medium, high, critical)
default_priority = "medium"

# Municipal ward list; submissions must name one of these
wards = [
"#,
        );
        for ward in DEFAULT_WARDS {
            out.push_str(&format!("  \"{}\",\n", ward));
        }
        out.push_str(
            r#"]

[display]
# Use colors in output
colors = true

# Date format for display (strftime format)
date_format = "%Y-%m-%d %H:%M"

# Show grievance count in list header
show_count = true

# Maximum description length before truncation
max_description_length = 60
"#,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_from_template() {
        let config: Config = toml::from_str(&Config::default_with_comments()).unwrap();
        assert_eq!(config.series_base, DEFAULT_SERIES_BASE);
        assert_eq!(config.wards.len(), 15);
        assert!(config.has_ward("Kalwa"));
        assert!(!config.has_ward("kalwa")); // exact match only
    }
}
