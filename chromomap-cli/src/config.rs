//! Configuration handling for the chromomap CLI
//!
//! Supports loading a chromomap.toml file with `[layout]` parameters
//! and `[lengths]` overrides of the built-in reference table.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use chromomap_core::{ChromosomeKey, ChromosomeLengths, GenomicPos, LayoutParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSection,

    /// Chromosome length overrides, keyed by chromosome token
    /// ("1".."22", "X", "Y"), value in base pairs.
    #[serde(default)]
    pub lengths: HashMap<String, GenomicPos>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Height of one chromosome slot
    #[serde(default = "default_slot_unit")]
    pub slot_unit: f64,

    /// Vertical gap between slots
    #[serde(default = "default_slot_gap")]
    pub slot_gap: f64,

    /// X-axis margin multiplier on the longest chromosome
    #[serde(default = "default_axis_margin")]
    pub axis_margin: f64,
}

fn default_slot_unit() -> f64 {
    LayoutParams::default().slot_unit
}

fn default_slot_gap() -> f64 {
    LayoutParams::default().slot_gap
}

fn default_axis_margin() -> f64 {
    LayoutParams::default().axis_margin
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            slot_unit: default_slot_unit(),
            slot_gap: default_slot_gap(),
            axis_margin: default_axis_margin(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            slot_unit: self.layout.slot_unit,
            slot_gap: self.layout.slot_gap,
            axis_margin: self.layout.axis_margin,
        }
    }

    /// Reference table with the configured overrides applied. Unknown
    /// chromosome tokens and zero lengths are configuration errors.
    pub fn chromosome_lengths(&self) -> Result<ChromosomeLengths> {
        let mut lengths = ChromosomeLengths::default();
        for (token, &length) in &self.lengths {
            let key: ChromosomeKey = match token.parse() {
                Ok(key) => key,
                Err(_) => bail!("config [lengths]: invalid chromosome {:?}", token),
            };
            if length == 0 {
                bail!("config [lengths]: chromosome {} has zero length", key);
            }
            lengths.set(key, length);
        }
        Ok(lengths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_layout_params() {
        let config: Config = toml::from_str("").unwrap();
        let params = config.layout_params();
        assert_eq!(params.slot_unit, 1.0);
        assert_eq!(params.slot_gap, 0.5);
        assert_eq!(params.axis_margin, 1.05);
        assert!(config.chromosome_lengths().is_ok());
    }

    #[test]
    fn partial_layout_section_fills_defaults() {
        let config: Config = toml::from_str("[layout]\nslot_gap = 0.25\n").unwrap();
        let params = config.layout_params();
        assert_eq!(params.slot_unit, 1.0);
        assert_eq!(params.slot_gap, 0.25);
    }

    #[test]
    fn length_overrides_apply() {
        let config: Config =
            toml::from_str("[lengths]\n\"1\" = 1000\nX = 2000\n").unwrap();
        let lengths = config.chromosome_lengths().unwrap();
        assert_eq!(lengths.get(ChromosomeKey::Autosome(1)), Some(1000));
        assert_eq!(lengths.get(ChromosomeKey::X), Some(2000));
        // Untouched entries keep the reference value.
        assert_eq!(lengths.get(ChromosomeKey::Y), Some(57_227_415));
    }

    #[test]
    fn zero_or_unknown_override_is_rejected() {
        let config: Config = toml::from_str("[lengths]\n\"1\" = 0\n").unwrap();
        assert!(config.chromosome_lengths().is_err());

        let config: Config = toml::from_str("[lengths]\nMT = 16569\n").unwrap();
        assert!(config.chromosome_lengths().is_err());
    }
}
