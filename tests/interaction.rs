use volcano::config::PlotSettings;
use volcano::data::points::RawSeries;
use volcano::data::selection::{SelectionTrigger, SelectionType};
use volcano::engine::VolcanoEngine;
use volcano::events::{EventFilter, EventKind};
use volcano::interaction::*;

fn engine() -> VolcanoEngine {
    let mut raw = RawSeries::new();
    raw.insert("A", Some(1.0), Some(0.1));
    raw.insert("B", Some(2.0), Some(0.01));
    raw.insert("C", Some(-2.0), Some(0.001));
    raw.insert("D", Some(0.5), Some(0.6));
    let mut e = VolcanoEngine::new(PlotSettings {
        select_by_stats_on_load: false,
        ..PlotSettings::default()
    });
    e.load_data(&raw);
    e
}

/// Event position of a domain coordinate (origin is at 0,0).
fn at(e: &VolcanoEngine, x: f64, y: f64) -> (f64, f64) {
    let d = e.mapper().to_draw_xy(x, y);
    (d.x, d.y)
}

fn drag(e: &mut VolcanoEngine, from: (f64, f64), to: &[(f64, f64)], mods: Modifiers) {
    let (px, py) = at(e, from.0, from.1);
    e.on_pointer_down(px, py, PointerButton::Primary, mods);
    for &(x, y) in to {
        let (px, py) = at(e, x, y);
        e.on_pointer_move(px, py, mods);
    }
}

fn selected(e: &VolcanoEngine) -> Vec<String> {
    let mut g: Vec<String> = e.selected_points().iter().map(|p| p.gene.clone()).collect();
    g.sort();
    g
}

#[test]
fn plain_drag_selects_rect_and_drops_points_that_leave_it() {
    let mut e = engine();
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], Modifiers::NONE);
    assert_eq!(selected(&e), vec!["A", "B"]);
    assert!(e.drag_overlay().is_some());

    let (px, py) = at(&e, 1.5, 1.5);
    e.on_pointer_move(px, py, Modifiers::NONE);
    assert_eq!(selected(&e), vec!["A"]);

    let fx = e.on_pointer_up();
    assert!(fx.contains(&Effect::SelectionChanged));
    assert!(fx.contains(&Effect::ClearDragOverlay));
    assert!(e.drag_overlay().is_none());
    assert_eq!(e.selection(SelectionType::Standard).trigger, SelectionTrigger::Drag);
    assert_eq!(e.emitted_genes(), &["A"]);
}

#[test]
fn plain_drag_starts_from_empty_selection() {
    let mut e = engine();
    e.on_point_click("C", Modifiers::NONE);
    drag(&mut e, (0.8, 0.8), &[(1.2, 1.2)], Modifiers::NONE);
    assert_eq!(selected(&e), vec!["A"]);
}

#[test]
fn shift_drag_adds_and_only_removes_what_it_added() {
    let mut e = engine();
    e.on_point_click("C", Modifiers::NONE);
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], Modifiers::SHIFT);
    assert_eq!(selected(&e), vec!["A", "B", "C"]);

    let (px, py) = at(&e, 1.5, 1.5);
    e.on_pointer_move(px, py, Modifiers::SHIFT);
    assert_eq!(selected(&e), vec!["A", "C"]);
    e.on_pointer_up();
    assert_eq!(selected(&e), vec!["A", "C"]);
}

#[test]
fn alt_drag_removes_and_restores_points_that_leave_the_rect() {
    let mut e = engine();
    e.select_all();
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], Modifiers::ALT);
    assert_eq!(selected(&e), vec!["C", "D"]);

    let (px, py) = at(&e, 1.5, 1.5);
    e.on_pointer_move(px, py, Modifiers::ALT);
    assert_eq!(selected(&e), vec!["B", "C", "D"]);
}

#[test]
fn shift_and_alt_together_do_nothing() {
    let mut e = engine();
    let both = Modifiers { shift: true, alt: true };
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], both);
    assert!(!e.controller().is_dragging());
    assert!(selected(&e).is_empty());
}

#[test]
fn drag_hint_reports_domain_corners() {
    let mut e = engine();
    drag(&mut e, (0.5, 1.5), &[(1.25, 2.5)], Modifiers::SHIFT);
    let overlay = e.drag_overlay().unwrap();
    assert_eq!(overlay.hint, "Add subset of genes to selection from (0.500, 1.50) to (1.25, 2.50)");
    assert!(!overlay.subtracting);
}

#[test]
fn click_semantics() {
    let mut e = engine();
    e.on_point_click("A", Modifiers::NONE);
    assert_eq!(selected(&e), vec!["A"]);
    assert!(e.controller().is_tooltip_visible("A"));

    // No modifier replaces.
    e.on_point_click("B", Modifiers::NONE);
    assert_eq!(selected(&e), vec!["B"]);
    assert!(!e.controller().is_tooltip_visible("A"));

    // Shift toggles.
    e.on_point_click("C", Modifiers::SHIFT);
    assert_eq!(selected(&e), vec!["B", "C"]);
    e.on_point_click("C", Modifiers::SHIFT);
    assert_eq!(selected(&e), vec!["B"]);

    // Alt only removes.
    let fx = e.on_point_click("A", Modifiers::ALT);
    assert!(fx.is_empty());
    e.on_point_click("B", Modifiers::ALT);
    assert!(selected(&e).is_empty());

    // Alt with nothing selected still selects.
    e.on_point_click("D", Modifiers::ALT);
    assert_eq!(selected(&e), vec!["D"]);
    assert_eq!(e.selection(SelectionType::Standard).trigger, SelectionTrigger::Click);
}

#[test]
fn sticky_shift_behaves_like_held_shift() {
    let mut e = engine();
    e.set_sticky_shift(true);
    e.on_point_click("A", Modifiers::NONE);
    e.on_point_click("B", Modifiers::NONE);
    assert_eq!(selected(&e), vec!["A", "B"]);
}

#[test]
fn pan_zoom_mode_ignores_selection_input() {
    let mut e = engine();
    e.set_mode(InteractionMode::PanZoom);
    e.on_point_click("A", Modifiers::NONE);
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], Modifiers::NONE);
    assert!(selected(&e).is_empty());
    assert!(!e.controller().is_dragging());
}

#[test]
fn switching_mode_mid_drag_ends_it() {
    let mut e = engine();
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2)], Modifiers::NONE);
    let fx = e.set_mode(InteractionMode::PanZoom);
    assert!(fx.contains(&Effect::ClearDragOverlay));
    assert!(!e.controller().is_dragging());
    assert_eq!(selected(&e), vec!["A", "B"]);
}

#[test]
fn tooltip_lingers_then_hides() {
    let mut e = engine();
    let fx = e.on_point_over("A");
    assert!(fx.contains(&Effect::ShowTooltip("A".into())));
    e.on_point_out("A", 10.0);
    assert!(e.poll_tooltips(10.1).is_empty());
    assert!(e.controller().is_tooltip_visible("A"));
    let fx = e.poll_tooltips(10.3);
    assert!(fx.contains(&Effect::HideTooltip("A".into())));
    assert!(!e.controller().is_tooltip_visible("A"));
}

#[test]
fn tooltip_stays_while_pointer_is_inside_it() {
    let mut e = engine();
    e.on_point_over("A");
    e.on_point_out("A", 0.0);
    e.on_tooltip_over("A");
    e.poll_tooltips(5.0);
    assert!(e.controller().is_tooltip_visible("A"));
    e.on_tooltip_out("A", 5.0);
    e.poll_tooltips(6.0);
    assert!(!e.controller().is_tooltip_visible("A"));
}

#[test]
fn clicked_point_tooltip_survives_first_pointer_out() {
    let mut e = engine();
    e.on_point_over("A");
    e.on_point_click("A", Modifiers::NONE);
    e.on_point_out("A", 0.0);
    e.poll_tooltips(100.0);
    assert!(e.controller().is_tooltip_visible("A"));

    e.on_point_over("A");
    e.on_point_out("A", 100.0);
    e.poll_tooltips(200.0);
    assert!(!e.controller().is_tooltip_visible("A"));
}

#[test]
fn mode_names_parse() {
    assert_eq!("panZoom".parse::<InteractionMode>().unwrap(), InteractionMode::PanZoom);
    assert_eq!(InteractionMode::Select.to_string(), "select");
    assert!("zoom".parse::<InteractionMode>().is_err());
}

#[test]
fn hover_is_ignored_in_pan_zoom_mode() {
    let mut e = engine();
    let rx = e.events().subscribe(EventFilter::only(EventKind::HOVER));
    e.on_point_over("A");
    assert!(e.controller().is_tooltip_visible("A"));

    let fx = e.set_mode(InteractionMode::PanZoom);
    assert!(fx.contains(&Effect::HideAllTooltips));
    assert!(e.controller().hovered().is_none());
    assert!(!e.controller().is_tooltip_visible("A"));
    assert_eq!(rx.try_iter().count(), 1);

    assert!(e.on_point_over("B").is_empty());
    assert!(e.on_point_out("B", 1.0).is_empty());
    assert!(e.controller().hovered().is_none());
    assert!(!e.controller().is_tooltip_visible("B"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn drag_out_and_back_to_start_selects_nothing() {
    let mut e = engine();
    drag(&mut e, (0.8, 0.8), &[(2.2, 2.2), (0.8, 0.8)], Modifiers::NONE);
    assert!(selected(&e).is_empty());
    e.on_pointer_up();
    assert!(selected(&e).is_empty());
}

#[test]
fn alt_drag_never_selects_previously_unselected_points() {
    let mut e = engine();
    e.on_point_click("A", Modifiers::NONE);
    e.on_point_click("C", Modifiers::SHIFT);
    let (px, py) = at(&e, 0.5, 0.5);
    e.on_pointer_down(px, py, PointerButton::Primary, Modifiers::ALT);
    for &(x, y) in &[(2.2, 2.2), (0.9, 0.9), (2.2, 2.2), (0.9, 0.9)] {
        let (px, py) = at(&e, x, y);
        e.on_pointer_move(px, py, Modifiers::ALT);
        assert!(!e.selection(SelectionType::Standard).is_point_selected("B"));
    }
    assert_eq!(selected(&e), vec!["A", "C"]);

    let (px, py) = at(&e, 2.2, 2.2);
    e.on_pointer_move(px, py, Modifiers::ALT);
    e.on_pointer_up();
    assert_eq!(selected(&e), vec!["C"]);
}

#[test]
fn drag_skips_points_zoomed_out_of_view() {
    let mut e = engine();
    e.set_mode(InteractionMode::PanZoom);
    let (px, py) = at(&e, 1.0, 1.0);
    assert!(e.on_wheel_zoom(4.0, px, py));
    e.set_mode(InteractionMode::Select);

    // Far outside the widget: both corners clamp to the full domain.
    e.on_pointer_down(-1.0e6, 1.0e6, PointerButton::Primary, Modifiers::NONE);
    e.on_pointer_move(1.0e6, -1.0e6, Modifiers::NONE);
    e.on_pointer_up();
    assert_eq!(selected(&e), vec!["A"]);
}
