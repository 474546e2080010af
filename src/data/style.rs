//! Per-point style as a pure function of selection state.
//!
//! Nothing here draws; the UI adapter paints whatever [`point_style`] returns.

use egui::Color32;

use super::points::Point;
use super::regulation::{Regulation, StatsForm};
use super::selection::{PointFlags, SelectionConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointClasses {
    pub selected: bool,
    pub upregulated: bool,
    pub downregulated: bool,
    pub overlap: bool,
    pub hovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub fill: Color32,
    pub opacity: f32,
    pub classes: PointClasses,
}

impl PointStyle {
    /// Fill with the opacity folded into the alpha channel.
    pub fn color(&self) -> Color32 {
        self.fill.gamma_multiply(self.opacity)
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Everything the style of one point depends on.
#[derive(Debug, Clone, Copy)]
pub struct StyleInputs<'a> {
    pub point: &'a Point,
    pub flags: PointFlags,
    pub config: &'a SelectionConfig,
    /// Config of the type named by `defer_interactive_coloring_to`, if any.
    pub deferred: Option<&'a SelectionConfig>,
    pub form: &'a StatsForm,
    pub fill_override: Option<Color32>,
    pub in_view: bool,
    pub hovered: bool,
}

fn selected_fill(config: &SelectionConfig, regulation: Regulation, form: &StatsForm) -> Color32 {
    if config.use_select_by_stat_color_logic {
        if let Some(c) = form.color(regulation) {
            return c;
        }
    }
    config.color_selected
}

pub fn point_style(input: &StyleInputs<'_>) -> PointStyle {
    let regulation = input.form.classify(input.point);
    let classes = PointClasses {
        selected: input.flags.selected,
        upregulated: regulation == Regulation::Up,
        downregulated: regulation == Regulation::Down,
        overlap: input.flags.part_of_selection_overlap,
        hovered: input.hovered,
    };
    let cfg = input.config;

    if !input.in_view {
        return PointStyle {
            fill: cfg.color_unselected,
            opacity: 0.0,
            classes,
        };
    }

    if input.flags.selected {
        return PointStyle {
            fill: input
                .fill_override
                .unwrap_or_else(|| selected_fill(cfg, regulation, input.form)),
            opacity: cfg.opacity_selected,
            classes,
        };
    }

    let fill = match (input.hovered, input.deferred) {
        (true, Some(d)) => selected_fill(d, regulation, input.form),
        _ => cfg.color_unselected,
    };
    PointStyle {
        fill,
        opacity: if input.hovered { cfg.opacity_hover } else { cfg.opacity },
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(p: &'a Point, cfg: &'a SelectionConfig, form: &'a StatsForm) -> StyleInputs<'a> {
        StyleInputs {
            point: p,
            flags: PointFlags::default(),
            config: cfg,
            deferred: None,
            form,
            fill_override: None,
            in_view: true,
            hovered: false,
        }
    }

    #[test]
    fn out_of_view_is_invisible() {
        let p = Point {
            gene: "A".into(),
            x: 3.0,
            y: 5.0,
        };
        let cfg = SelectionConfig::standard();
        let form = StatsForm::default();
        let mut i = inputs(&p, &cfg, &form);
        i.flags.selected = true;
        i.in_view = false;
        let s = point_style(&i);
        assert_eq!(s.opacity, 0.0);
        assert!(s.classes.selected);
        assert!(s.classes.upregulated);
    }

    #[test]
    fn selected_uses_regulation_color_when_enabled() {
        let p = Point {
            gene: "A".into(),
            x: -3.0,
            y: 5.0,
        };
        let std_cfg = SelectionConfig::standard();
        let go_cfg = SelectionConfig::go_term();
        let form = StatsForm::default();
        let mut i = inputs(&p, &std_cfg, &form);
        i.flags.selected = true;
        assert_eq!(point_style(&i).fill, Color32::from_rgb(255, 0, 0));
        i.config = &go_cfg;
        assert_eq!(point_style(&i).fill, Color32::BLUE);
    }

    #[test]
    fn hover_defers_to_other_type() {
        let p = Point {
            gene: "A".into(),
            x: 3.0,
            y: 5.0,
        };
        let std_cfg = SelectionConfig::standard();
        let go_cfg = SelectionConfig::go_term();
        let form = StatsForm::default();
        let mut i = inputs(&p, &go_cfg, &form);
        i.hovered = true;
        i.deferred = Some(&std_cfg);
        let s = point_style(&i);
        assert_eq!(s.fill, Color32::from_rgb(0, 128, 0));
        assert_eq!(s.opacity, go_cfg.opacity_hover);
    }
}
