//! Pointer interaction state machine.
//!
//! [`InteractionController`] turns pointer events into mutations of the
//! active [`Selection`] and returns the visual consequences as [`Effect`]s.
//! It owns no selection; the engine lends it the active one per event.
//!
//! States are `Idle` and `Dragging`. The [`InteractionMode`] is orthogonal:
//! in `PanZoom` every pointer handler here is inert and the gesture belongs
//! to the zoom behaviour.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::mapper::{CoordinateMapper, DomainRect, DrawPos, EventCoords};
use crate::data::selection::{Selection, SelectionTrigger};
use crate::error::VolcanoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Select,
    PanZoom,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InteractionMode::Select => "select",
            InteractionMode::PanZoom => "panZoom",
        })
    }
}

impl FromStr for InteractionMode {
    type Err = VolcanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "select" | "Select" => Ok(InteractionMode::Select),
            "panZoom" | "PanZoom" | "pan_zoom" | "panzoom" => Ok(InteractionMode::PanZoom),
            other => Err(VolcanoError::UnknownMode(other.to_string())),
        }
    }
}

/// Modifier keys relevant to selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Add to selection.
    pub shift: bool,
    /// Subtract from selection.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        alt: true,
    };

    pub fn any(self) -> bool {
        self.shift || self.alt
    }

    /// Shift and alt together cancel each other out.
    pub fn conflicting(self) -> bool {
        self.shift && self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Visual consequence of a transition, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Restyle the given arena slots.
    Restyle(Vec<usize>),
    RestyleAll,
    /// The selection finished changing; observers should be notified.
    SelectionChanged,
    ShowTooltip(String),
    HideTooltip(String),
    HideAllTooltips,
    /// Drag rectangle and hint changed.
    DragOverlay,
    ClearDragOverlay,
}

pub type Effects = Vec<Effect>;

/// What the renderer needs to draw the rubber band.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverlay {
    pub start: DrawPos,
    pub current: DrawPos,
    pub hint: String,
    /// Alt is held: the rectangle removes from the selection.
    pub subtracting: bool,
}

#[derive(Debug, Clone)]
struct DragSession {
    start: EventCoords,
    current: EventCoords,
    modifiers: Modifiers,
    new_this_drag: HashSet<usize>,
    deleted_this_drag: HashSet<usize>,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(Box<DragSession>),
}

/// Format like JavaScript's `Number.toPrecision`: fixed notation unless the
/// rounded exponent is below -6 or at least `digits`.
pub(crate) fn to_precision(v: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !v.is_finite() {
        return v.to_string();
    }
    let sci = format!("{:.*e}", digits - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    if exp < -6 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{}", mantissa, sign, exp.abs())
    } else {
        format!("{:.*}", (digits as i32 - 1 - exp) as usize, v)
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    drag: DragState,
    hovered: Option<String>,
    /// Latest point selected by a click; its tooltip outlives the first
    /// pointer-out.
    most_recent_selected: Option<String>,
    visible_tooltips: HashSet<String>,
    /// Tooltips the pointer is currently inside.
    active_tooltips: HashSet<String>,
    /// Gene -> time at which its tooltip should go away.
    pending_removals: HashMap<String, f64>,
    tooltip_delay: f64,
    /// Latched shift, for touch devices without a keyboard.
    sticky_shift: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl InteractionController {
    pub fn new(tooltip_delay: f64) -> Self {
        Self {
            mode: InteractionMode::Select,
            drag: DragState::Idle,
            hovered: None,
            most_recent_selected: None,
            visible_tooltips: HashSet::new(),
            active_tooltips: HashSet::new(),
            pending_removals: HashMap::new(),
            tooltip_delay,
            sticky_shift: false,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch mode. Entering `PanZoom` abandons a drag in progress.
    pub fn set_mode(&mut self, mode: InteractionMode) -> Effects {
        if self.mode == mode {
            return Vec::new();
        }
        log::debug!("interaction mode {} -> {}", self.mode, mode);
        self.mode = mode;
        let mut fx = self.cancel_drag();
        if mode == InteractionMode::PanZoom {
            self.hovered = None;
            fx.extend(self.hide_all_tooltips());
        }
        fx
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn sticky_shift(&self) -> bool {
        self.sticky_shift
    }

    pub fn set_sticky_shift(&mut self, on: bool) {
        self.sticky_shift = on;
    }

    pub fn visible_tooltips(&self) -> impl Iterator<Item = &str> {
        self.visible_tooltips.iter().map(String::as_str)
    }

    pub fn is_tooltip_visible(&self, gene: &str) -> bool {
        self.visible_tooltips.contains(gene)
    }

    fn effective(&self, mods: Modifiers) -> Modifiers {
        Modifiers {
            shift: mods.shift || self.sticky_shift,
            alt: mods.alt,
        }
    }

    /// Force `Dragging -> Idle`, dropping the tracking sets. Selection flags
    /// already applied during the drag are kept.
    pub fn cancel_drag(&mut self) -> Effects {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging(_) => {
                log::debug!("drag cancelled");
                vec![Effect::ClearDragOverlay]
            }
            DragState::Idle => Vec::new(),
        }
    }

    /// Forget everything tied to the previous dataset.
    pub fn reset(&mut self) -> Effects {
        let mut fx = self.cancel_drag();
        self.hovered = None;
        self.most_recent_selected = None;
        self.pending_removals.clear();
        self.active_tooltips.clear();
        if !self.visible_tooltips.is_empty() {
            self.visible_tooltips.clear();
            fx.push(Effect::HideAllTooltips);
        }
        fx
    }

    pub fn hide_all_tooltips(&mut self) -> Effects {
        self.most_recent_selected = None;
        self.visible_tooltips.clear();
        self.active_tooltips.clear();
        self.pending_removals.clear();
        vec![Effect::HideAllTooltips]
    }

    fn clear_for_fresh_start(&mut self, sel: &mut Selection) -> Effects {
        sel.deselect_all();
        sel.unlabel_all();
        let mut fx = vec![Effect::RestyleAll];
        fx.extend(self.hide_all_tooltips());
        fx
    }

    fn show_tooltip(&mut self, sel: &Selection, gene: &str, fx: &mut Effects) {
        if sel.config().disable_tooltip {
            return;
        }
        self.pending_removals.remove(gene);
        if self.visible_tooltips.insert(gene.to_string()) {
            fx.push(Effect::ShowTooltip(gene.to_string()));
        }
    }

    fn hide_tooltip(&mut self, gene: &str, fx: &mut Effects) {
        self.pending_removals.remove(gene);
        if self.visible_tooltips.remove(gene) {
            fx.push(Effect::HideTooltip(gene.to_string()));
        }
    }

    pub fn pointer_down(
        &mut self,
        sel: &mut Selection,
        mapper: &CoordinateMapper,
        px: f64,
        py: f64,
        button: PointerButton,
        mods: Modifiers,
    ) -> Effects {
        let mods = self.effective(mods);
        if self.mode != InteractionMode::Select
            || button != PointerButton::Primary
            || sel.config().disable_mouse_selection
            || mods.conflicting()
            || self.hovered.is_some()
        {
            return Vec::new();
        }

        let mut fx = if mods.any() {
            Vec::new()
        } else {
            self.clear_for_fresh_start(sel)
        };

        let mut start = mapper.from_event(px, py);
        start.domain = mapper.clamp_to_domain(start.domain);
        self.drag = DragState::Dragging(Box::new(DragSession {
            start,
            current: start,
            modifiers: mods,
            new_this_drag: HashSet::new(),
            deleted_this_drag: HashSet::new(),
        }));
        log::debug!("drag start at ({:.3}, {:.3})", start.domain.x, start.domain.y);
        fx.push(Effect::DragOverlay);
        fx
    }

    pub fn pointer_move(
        &mut self,
        sel: &mut Selection,
        mapper: &CoordinateMapper,
        px: f64,
        py: f64,
        mods: Modifiers,
    ) -> Effects {
        let mods = self.effective(mods);
        if self.mode != InteractionMode::Select || mods.conflicting() {
            return Vec::new();
        }
        let DragState::Dragging(session) = &mut self.drag else {
            return Vec::new();
        };

        let mut current = mapper.from_event(px, py);
        current.domain = mapper.clamp_to_domain(current.domain);
        session.current = current;
        session.modifiers = mods;
        let rect = DomainRect::from_corners(session.start.domain, current.domain);

        let store = Arc::clone(sel.store());
        let mut changed = Vec::new();
        for (slot, point) in store.points().iter().enumerate() {
            let in_rect = mapper.is_in_view(point) && rect.contains(point.x, point.y);
            let was_selected = sel.is_slot_selected(slot);
            let new_this_drag = session.new_this_drag.contains(&slot);
            let deleted_this_drag = session.deleted_this_drag.contains(&slot);

            if !in_rect && was_selected {
                if !mods.any() || (mods.shift && new_this_drag) {
                    sel.set_slot_selected(slot, false);
                    changed.push(slot);
                    continue;
                }
                if mods.shift {
                    continue;
                }
            }

            if !in_rect && deleted_this_drag && mods.alt {
                sel.set_slot_selected(slot, true);
                session.deleted_this_drag.remove(&slot);
                changed.push(slot);
                continue;
            }

            if in_rect {
                if was_selected && mods.alt {
                    sel.set_slot_selected(slot, false);
                    session.deleted_this_drag.insert(slot);
                    changed.push(slot);
                } else if !was_selected && !mods.alt {
                    sel.set_slot_selected(slot, true);
                    session.new_this_drag.insert(slot);
                    changed.push(slot);
                }
            }
        }

        #[cfg(feature = "drag_debug")]
        log::trace!(
            "drag move: {} changed, {} new, {} deleted",
            changed.len(),
            session.new_this_drag.len(),
            session.deleted_this_drag.len()
        );

        let mut fx = Vec::new();
        if !changed.is_empty() {
            sel.trigger = SelectionTrigger::Drag;
            fx.push(Effect::Restyle(changed));
        }
        fx.push(Effect::DragOverlay);
        fx
    }

    /// End a drag. Only a drag in progress produces a notification.
    pub fn pointer_up(&mut self, sel: &mut Selection) -> Effects {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging(session) => {
                log::debug!(
                    "drag end: {} added, {} removed",
                    session.new_this_drag.len(),
                    session.deleted_this_drag.len()
                );
                sel.trigger = SelectionTrigger::Drag;
                vec![Effect::ClearDragOverlay, Effect::SelectionChanged]
            }
            DragState::Idle => Vec::new(),
        }
    }

    pub fn point_click(&mut self, sel: &mut Selection, gene: &str, mods: Modifiers) -> Effects {
        let mods = self.effective(mods);
        if self.mode != InteractionMode::Select || sel.config().disable_mouse_selection {
            return Vec::new();
        }
        let Some(slot) = sel.store().slot_of(gene) else {
            return Vec::new();
        };
        let already = sel.is_slot_selected(slot);
        let something = sel.has_selection();
        let mut fx = Vec::new();

        if something {
            if mods.alt {
                if !already {
                    return fx;
                }
                sel.set_slot_selected(slot, false);
                self.hovered = None;
                self.most_recent_selected = None;
                self.hide_tooltip(gene, &mut fx);
                fx.push(Effect::Restyle(vec![slot]));
            } else if mods.shift {
                if already {
                    sel.set_slot_selected(slot, false);
                    self.hovered = None;
                    self.most_recent_selected = None;
                    self.hide_tooltip(gene, &mut fx);
                } else {
                    fx.extend(self.hide_all_tooltips());
                    sel.set_slot_selected(slot, true);
                    self.most_recent_selected = Some(gene.to_string());
                }
                fx.push(Effect::Restyle(vec![slot]));
            } else {
                fx.extend(self.clear_for_fresh_start(sel));
                sel.set_slot_selected(slot, true);
                self.most_recent_selected = Some(gene.to_string());
                self.show_tooltip(sel, gene, &mut fx);
            }
        } else {
            sel.set_slot_selected(slot, true);
            self.most_recent_selected = Some(gene.to_string());
            self.show_tooltip(sel, gene, &mut fx);
            fx.push(Effect::Restyle(vec![slot]));
        }

        sel.trigger = SelectionTrigger::Click;
        fx.push(Effect::SelectionChanged);
        fx
    }

    pub fn point_over(&mut self, sel: &Selection, gene: &str) -> Effects {
        if self.mode != InteractionMode::Select || self.hovered.as_deref() == Some(gene) {
            return Vec::new();
        }
        self.hovered = Some(gene.to_string());
        let mut fx = Vec::new();
        if self.is_dragging() {
            return fx;
        }
        self.show_tooltip(sel, gene, &mut fx);
        if let Some(slot) = sel.store().slot_of(gene) {
            fx.push(Effect::Restyle(vec![slot]));
        }
        fx
    }

    /// Pointer left a point at time `now` (seconds).
    pub fn point_out(&mut self, sel: &Selection, gene: &str, now: f64) -> Effects {
        if self.mode != InteractionMode::Select {
            return Vec::new();
        }
        if self.hovered.as_deref() == Some(gene) {
            self.hovered = None;
        }
        let mut fx = Vec::new();
        if let Some(slot) = sel.store().slot_of(gene) {
            fx.push(Effect::Restyle(vec![slot]));
        }
        if self.most_recent_selected.as_deref() == Some(gene) {
            self.most_recent_selected = None;
            return fx;
        }
        if self.visible_tooltips.contains(gene) {
            self.pending_removals.insert(gene.to_string(), now + self.tooltip_delay);
        }
        fx
    }

    pub fn tooltip_over(&mut self, gene: &str) {
        self.active_tooltips.insert(gene.to_string());
    }

    pub fn tooltip_out(&mut self, sel: &Selection, gene: &str, now: f64) -> Effects {
        self.active_tooltips.remove(gene);
        self.point_out(sel, gene, now)
    }

    /// Remove tooltips whose delay has elapsed, unless the pointer is back
    /// on the point or inside the tooltip.
    pub fn poll_tooltips(&mut self, now: f64) -> Effects {
        let due: Vec<String> = self
            .pending_removals
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(g, _)| g.clone())
            .collect();
        let mut fx = Vec::new();
        for gene in due {
            self.pending_removals.remove(&gene);
            if self.active_tooltips.contains(&gene) || self.hovered.as_deref() == Some(gene.as_str()) {
                continue;
            }
            self.hide_tooltip(&gene, &mut fx);
        }
        fx
    }

    /// Earliest pending tooltip removal, for scheduling a repaint.
    pub fn next_tooltip_deadline(&self) -> Option<f64> {
        self.pending_removals.values().copied().reduce(f64::min)
    }

    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        let DragState::Dragging(s) = &self.drag else {
            return None;
        };
        let mut hint = if s.modifiers.shift {
            String::from("Add subset of genes to selection")
        } else if s.modifiers.alt {
            String::from("Deselect subset of genes")
        } else {
            String::from("Select subset of genes")
        };
        if s.start.draw != s.current.draw {
            hint.push_str(&format!(
                " from ({}, {}) to ({}, {})",
                to_precision(s.start.domain.x, 3),
                to_precision(s.start.domain.y, 3),
                to_precision(s.current.domain.x, 3),
                to_precision(s.current.domain.y, 3)
            ));
        }
        Some(DragOverlay {
            start: s.start.draw,
            current: s.current.draw,
            hint,
            subtracting: s.modifiers.alt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_from_ui_strings() {
        assert_eq!("select".parse::<InteractionMode>().unwrap(), InteractionMode::Select);
        assert_eq!("panZoom".parse::<InteractionMode>().unwrap(), InteractionMode::PanZoom);
        assert!("lasso".parse::<InteractionMode>().is_err());
    }

    #[test]
    fn to_precision_matches_three_significant_digits() {
        assert_eq!(to_precision(1.23456, 3), "1.23");
        assert_eq!(to_precision(-0.012345, 3), "-0.0123");
        assert_eq!(to_precision(12.345, 3), "12.3");
        assert_eq!(to_precision(0.0, 3), "0.00");
        assert_eq!(to_precision(1234.0, 3), "1.23e+3");
        assert_eq!(to_precision(9.996, 3), "10.0");
        assert_eq!(to_precision(0.0000001, 3), "1.00e-7");
        assert_eq!(to_precision(-99.96, 3), "-100");
    }
}
