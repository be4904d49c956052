//! The `eurochart.yaml` manifest.

use crate::dashboard::ChartKind;
use anyhow::{bail, Context, Result};
use eurochart_series::{ExtractOptions, NameCorrections, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "eurochart.yaml";

/// Dashboard settings. Every field has a default, so an empty manifest (or
/// none at all) renders the stock dashboard from `public/assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory or `http(s)://` base URL holding the assets.
    pub assets: String,
    /// Heading of the generated page.
    pub title: String,
    /// Year columns accepted by every chart without its own range.
    pub years: YearRange,
    /// Entity labels dropped from every extraction.
    pub exclude: Vec<String>,
    /// Corrections applied on top of the built-in table.
    pub corrections: BTreeMap<String, String>,
    pub width: f64,
    pub height: f64,
    pub charts: BTreeMap<ChartKind, ChartConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets: "public/assets".to_string(),
            title: "Digital Europe".to_string(),
            years: YearRange::EUROSTAT,
            exclude: Vec::new(),
            corrections: BTreeMap::new(),
            width: 960.0,
            height: 600.0,
            charts: BTreeMap::new(),
        }
    }
}

/// Per-chart overrides. Empty fields fall back to the chart's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Asset names, in the order the chart reads them.
    pub files: Vec<String>,
    pub years: Option<YearRange>,
    /// Year shown first.
    pub year: Option<i32>,
    /// Entity shown first.
    pub entity: Option<String>,
}

impl Config {
    /// Read the manifest at `path`, or `eurochart.yaml` when present.
    ///
    /// An explicit path must exist; a missing default manifest means the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes as null
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            bail!("width and height must be positive");
        }
        let ranges = std::iter::once(("years", Some(self.years)))
            .chain(self.charts.iter().map(|(kind, chart)| (kind.name(), chart.years)));
        for (name, range) in ranges {
            if let Some(range) = range {
                YearRange::new(range.first, range.last)
                    .with_context(|| format!("Invalid year range for {name}"))?;
            }
        }
        Ok(())
    }

    /// Settings for one chart with its defaults filled in.
    #[must_use]
    pub fn chart(&self, kind: ChartKind) -> ChartConfig {
        let mut chart = self.charts.get(&kind).cloned().unwrap_or_default();
        if chart.files.is_empty() {
            chart.files = kind.default_files().iter().map(ToString::to_string).collect();
        }
        chart.years = chart.years.or(kind.default_years()).or(Some(self.years));
        if chart.entity.is_none() {
            chart.entity = kind.default_entity().map(ToString::to_string);
        }
        chart
    }

    /// The built-in corrections plus the manifest's own.
    pub fn corrections(&self) -> Result<NameCorrections> {
        let mut corrections = NameCorrections::eurostat();
        for (alias, canonical) in &self.corrections {
            corrections
                .insert(alias.as_str(), canonical.as_str())
                .with_context(|| format!("Invalid correction: {alias} -> {canonical}"))?;
        }
        Ok(corrections)
    }

    /// Extraction settings shared by every chart, with the chart's range.
    pub fn extract_options(&self, kind: ChartKind) -> Result<ExtractOptions> {
        let years = self.chart(kind).years.unwrap_or(self.years);
        Ok(ExtractOptions::new()
            .with_years(years)
            .exclude_all(&self.exclude)
            .with_corrections(self.corrections()?))
    }
}
