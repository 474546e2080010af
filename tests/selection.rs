use std::sync::Arc;

use egui::Color32;
use volcano::data::points::{PointStore, RawSeries};
use volcano::data::selection::*;

fn store() -> Arc<PointStore> {
    let mut raw = RawSeries::new();
    raw.insert("A", Some(1.0), Some(0.1));
    raw.insert("B", Some(-3.0), Some(0.01));
    raw.insert("C", Some(0.5), Some(0.5));
    Arc::new(PointStore::load(&raw))
}

#[test]
fn bulk_select_is_clear_then_set() {
    let mut sel = Selection::new(SelectionType::Standard, store());
    sel.select_all();
    let n = sel.select_points_by_gene_name(&["B", "missing"]);
    assert_eq!(n, 1);
    assert!(sel.is_point_selected("B"));
    assert!(!sel.is_point_selected("A"));
    assert_eq!(sel.selected_count(), 1);
}

#[test]
fn fill_override_lives_until_deselect() {
    let mut sel = Selection::new(SelectionType::Standard, store());
    let red = Color32::from_rgb(200, 0, 0);
    sel.select_points_with_fill(&["A"], red);
    let slot = sel.store().slot_of("A").unwrap();
    assert_eq!(sel.fill_override(slot), Some(red));
    sel.deselect_single_point("A");
    assert_eq!(sel.fill_override(slot), None);
}

#[test]
fn label_on_selection_labels_selected_points() {
    let mut cfg = SelectionConfig::standard();
    cfg.label_on_selection = true;
    let mut sel = Selection::with_config(SelectionType::Standard, cfg, store());
    sel.select_single_point("C");
    assert!(sel.is_point_labelled("C"));
    sel.deselect_single_point("C");
    assert!(sel.is_point_labelled("C"));
    sel.unlabel_all();
    assert!(sel.labelled_points().is_empty());
}

#[test]
fn labels_replace_previous_labels() {
    let mut sel = Selection::new(SelectionType::Standard, store());
    sel.label_points_by_gene_name(&["A", "B"]);
    sel.label_points_by_gene_name(&["C"]);
    let genes: Vec<&str> = sel.labelled_points().iter().map(|p| p.gene.as_str()).collect();
    assert_eq!(genes, vec!["C"]);
}

#[test]
fn intersection_and_overlap_marks() {
    let s = store();
    let mut std_sel = Selection::new(SelectionType::Standard, Arc::clone(&s));
    let mut go = Selection::new(SelectionType::GoTerm, s);
    std_sel.select_points_by_gene_name(&["A", "B"]);
    go.select_points_by_gene_name(&["B", "C"]);
    let both: Vec<String> = go.intersection(&std_sel).iter().map(|p| p.gene.clone()).collect();
    assert_eq!(both, vec!["B"]);
    go.mark_points_as_overlapping(&both);
    let slot_b = go.store().slot_of("B").unwrap();
    let slot_c = go.store().slot_of("C").unwrap();
    assert!(go.flags(slot_b).part_of_selection_overlap);
    assert!(!go.flags(slot_c).part_of_selection_overlap);
    go.mark_points_as_overlapping::<&str>(&[]);
    assert!(!go.flags(slot_b).part_of_selection_overlap);
}

#[test]
fn sort_changes_display_order_only() {
    let mut sel = Selection::new(SelectionType::Standard, store());
    sel.sort_selection(|a, b| b.x.abs().total_cmp(&a.x.abs()));
    let order: Vec<&str> = sel.points().map(|(_, p, _)| p.gene.as_str()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);
    assert_eq!(sel.store().slot_of("A"), Some(0));
}

#[test]
fn go_term_config_disables_mouse_selection() {
    let cfg = SelectionConfig::for_type(SelectionType::GoTerm);
    assert!(cfg.disable_mouse_selection);
    assert_eq!(cfg.defer_interactive_coloring_to, Some(SelectionType::Standard));
    assert!(SelectionConfig::standard().use_select_by_stat_color_logic);
}

#[test]
fn selection_type_names() {
    assert_eq!("GOTerm".parse::<SelectionType>().unwrap(), SelectionType::GoTerm);
    assert_eq!("standard".parse::<SelectionType>().unwrap(), SelectionType::Standard);
    assert_eq!(SelectionType::GoTerm.to_string(), "GOTerm");
    assert!("Lasso".parse::<SelectionType>().is_err());
}
