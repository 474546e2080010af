//! Regulation classification and the select-by-stats form.

use std::fmt;

use egui::Color32;
use serde::{Deserialize, Serialize};

use super::points::Point;
use crate::error::{Result, VolcanoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regulation {
    Up,
    Down,
    Unregulated,
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Regulation::Up => "up",
            Regulation::Down => "down",
            Regulation::Unregulated => "none",
        })
    }
}

/// Cut-offs in domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub log2_fold_change: f64,
    pub nlogpadj: f64,
}

/// Strict comparisons: a point exactly on a cut-off is unregulated.
pub fn classify(point: &Point, t: &Thresholds) -> Regulation {
    if point.y > t.nlogpadj {
        if point.x > t.log2_fold_change {
            return Regulation::Up;
        }
        if point.x < -t.log2_fold_change {
            return Regulation::Down;
        }
    }
    Regulation::Unregulated
}

/// Field names accepted by [`StatsForm::update_field`].
pub const STATS_FIELDS: [&str; 4] = ["padj", "nlogpadj", "fc", "log2FoldChange"];

/// The select-by-stats form: thresholds in both raw and log units plus the
/// regulation colours.
///
/// The raw and log forms are kept consistent whichever one is edited last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsForm {
    pub padj: f64,
    pub nlogpadj: f64,
    pub fc: f64,
    pub log2_fold_change: f64,
    pub upregulated_color: [u8; 3],
    pub downregulated_color: [u8; 3],
}

impl Default for StatsForm {
    fn default() -> Self {
        Self::from_raw(0.05, 1.5)
    }
}

impl StatsForm {
    /// Build from a raw adjusted p-value and raw fold change.
    pub fn from_raw(padj: f64, fc: f64) -> Self {
        Self {
            padj,
            nlogpadj: -padj.log10(),
            fc,
            log2_fold_change: fc.log2(),
            upregulated_color: [0, 128, 0],
            downregulated_color: [255, 0, 0],
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            log2_fold_change: self.log2_fold_change,
            nlogpadj: self.nlogpadj,
        }
    }

    pub fn classify(&self, point: &Point) -> Regulation {
        classify(point, &self.thresholds())
    }

    /// Set one field by name and derive its counterpart.
    ///
    /// Unknown names and values whose counterpart would not be finite are
    /// rejected without touching the form.
    pub fn update_field(&mut self, field: &str, value: f64) -> Result<()> {
        let invalid = || VolcanoError::InvalidStatsValue {
            field: field.to_string(),
            value,
        };
        if !value.is_finite() {
            return Err(invalid());
        }
        match field {
            "padj" => {
                if value <= 0.0 {
                    return Err(invalid());
                }
                self.padj = value;
                self.nlogpadj = -value.log10();
            }
            "nlogpadj" => {
                self.nlogpadj = value;
                self.padj = 10f64.powf(-value);
            }
            "fc" => {
                if value <= 0.0 {
                    return Err(invalid());
                }
                self.fc = value;
                self.log2_fold_change = value.log2();
            }
            "log2FoldChange" | "log2_fold_change" => {
                self.log2_fold_change = value;
                self.fc = 2f64.powf(value);
            }
            other => return Err(VolcanoError::UnknownStatsField(other.to_string())),
        }
        Ok(())
    }

    pub fn color(&self, regulation: Regulation) -> Option<Color32> {
        let [r, g, b] = match regulation {
            Regulation::Up => self.upregulated_color,
            Regulation::Down => self.downregulated_color,
            Regulation::Unregulated => return None,
        };
        Some(Color32::from_rgb(r, g, b))
    }

    /// Change the colour of one regulation class. `Unregulated` has no
    /// colour of its own and is ignored.
    pub fn set_color(&mut self, regulation: Regulation, color: Color32) {
        let rgb = [color.r(), color.g(), color.b()];
        match regulation {
            Regulation::Up => self.upregulated_color = rgb,
            Regulation::Down => self.downregulated_color = rgb,
            Regulation::Unregulated => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point {
            gene: "G".into(),
            x,
            y,
        }
    }

    #[test]
    fn classify_uses_strict_comparisons() {
        let t = Thresholds {
            log2_fold_change: 1.0,
            nlogpadj: 2.0,
        };
        assert_eq!(classify(&pt(1.5, 3.0), &t), Regulation::Up);
        assert_eq!(classify(&pt(-1.5, 3.0), &t), Regulation::Down);
        assert_eq!(classify(&pt(1.0, 3.0), &t), Regulation::Unregulated);
        assert_eq!(classify(&pt(1.5, 2.0), &t), Regulation::Unregulated);
    }

    #[test]
    fn editing_one_form_updates_the_other() {
        let mut form = StatsForm::default();
        assert!((form.nlogpadj - 1.30103).abs() < 1e-5);
        form.update_field("nlogpadj", 3.0).unwrap();
        assert!((form.padj - 0.001).abs() < 1e-12);
        form.update_field("fc", 4.0).unwrap();
        assert!((form.log2_fold_change - 2.0).abs() < 1e-12);
        form.update_field("log2FoldChange", 1.0).unwrap();
        assert!((form.fc - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejected_updates_leave_form_untouched() {
        let mut form = StatsForm::default();
        let before = form.clone();
        assert!(matches!(form.update_field("pvalue", 1.0), Err(VolcanoError::UnknownStatsField(_))));
        assert!(form.update_field("padj", 0.0).is_err());
        assert!(form.update_field("fc", f64::NAN).is_err());
        assert_eq!(form, before);
    }
}
