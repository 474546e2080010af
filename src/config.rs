//! Configuration for the volcano plot.
//!
//! [`PlotSettings`] is the persisted part (YAML under `~/.volcano/`);
//! [`VolcanoConfig`] wraps it together with launcher-only options such as
//! the window title and programmatic controllers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controllers::SelectionController;
use crate::data::hotkeys::Hotkeys;
use crate::data::mapper::{PlotLayout, ZoomLimits};
use crate::data::regulation::StatsForm;
use crate::enrichment::EnrichrBackground;
use crate::error::{Result, VolcanoError};
use crate::events::EventController;

// ─────────────────────────────────────────────────────────────────────────────
// Persisted settings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub layout: PlotLayout,
    pub zoom_limits: ZoomLimits,
    /// Padding added around the data extent, `[x, y]` in domain units.
    pub domain_padding: [f64; 2],
    /// Seconds a tooltip lingers after the pointer leaves its point.
    pub tooltip_delay_secs: f64,
    /// Select up/down regulated genes right after each dataset load.
    pub select_by_stats_on_load: bool,
    pub stats: StatsForm,
    pub enrichment_background: EnrichrBackground,
    pub hotkeys: Hotkeys,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            layout: PlotLayout::default(),
            zoom_limits: ZoomLimits::default(),
            domain_padding: [0.5, 0.5],
            tooltip_delay_secs: 0.25,
            select_by_stats_on_load: true,
            stats: StatsForm::default(),
            enrichment_background: EnrichrBackground::default(),
            hotkeys: Hotkeys::default(),
        }
    }
}

impl PlotSettings {
    /// `$HOME/.volcano/settings.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|e| VolcanoError::Config(format!("HOME env var not set: {}", e)))?;
        Ok(PathBuf::from(home).join(".volcano").join("settings.yaml"))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        log::debug!("saved settings to {:?}", path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let settings: PlotSettings = serde_yaml::from_str(&s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to_default_path(&self) -> Result<()> {
        self.save_to_path(&Self::default_path()?)
    }

    pub fn load_from_default_path() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Err(VolcanoError::Config(format!("settings file {:?} does not exist", path)));
        }
        Self::load_from_path(&path)
    }

    pub fn validate(&self) -> Result<()> {
        let z = &self.zoom_limits;
        if !(z.min > 0.0 && z.min <= z.max) {
            return Err(VolcanoError::Config(format!("invalid zoom limits {}..{}", z.min, z.max)));
        }
        if self.layout.width <= 0.0 || self.layout.height <= 0.0 {
            return Err(VolcanoError::Config("plot area must have positive size".into()));
        }
        if self.domain_padding.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(VolcanoError::Config("domain padding must be finite and non-negative".into()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual UI features on or off. All default to enabled.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    /// Left side panel with the stats form and term list.
    pub sidebar: bool,
    /// Gene table below the plot.
    pub gene_table: bool,
    pub stats_form: bool,
    pub tooltips: bool,
    /// Mode switch, reset view and selection-type buttons.
    pub plot_controls: bool,
    /// Draw gene labels for labelled points.
    pub labels: bool,
    pub threshold_lines: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            sidebar: true,
            gene_table: true,
            stats_form: true,
            tooltips: true,
            plot_controls: true,
            labels: true,
            threshold_lines: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controllers sub-config
// ─────────────────────────────────────────────────────────────────────────────

/// Optional programmatic controllers attached to the plot.
#[derive(Clone, Default)]
pub struct Controllers {
    pub selection: Option<SelectionController>,
    pub event: Option<EventController>,
}

// ─────────────────────────────────────────────────────────────────────────────
// VolcanoConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the volcano plot window.
#[derive(Clone)]
pub struct VolcanoConfig {
    /// Native window title.
    pub title: String,
    /// Optional headline rendered above the plot.
    pub headline: Option<String>,
    pub settings: PlotSettings,
    pub features: FeatureFlags,
    pub controllers: Controllers,
    /// Optional eframe native-window options.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for VolcanoConfig {
    fn default() -> Self {
        Self {
            title: "Volcano Plot".to_string(),
            headline: None,
            settings: PlotSettings::default(),
            features: FeatureFlags::default(),
            controllers: Controllers::default(),
            native_options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = PlotSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.layout.margins.left, 30.0);
        assert_eq!(s.zoom_limits.max, 5.0);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let s: PlotSettings = serde_yaml::from_str("tooltip_delay_secs: 1.5\n").unwrap();
        assert_eq!(s.tooltip_delay_secs, 1.5);
        assert_eq!(s.domain_padding, [0.5, 0.5]);
        assert!(s.select_by_stats_on_load);
    }
}
