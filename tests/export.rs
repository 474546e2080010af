use volcano::config::PlotSettings;
use volcano::data::export::*;
use volcano::data::hotkeys::{Hotkey, HotkeyName, Hotkeys, Modifier};
use volcano::data::points::RawSeries;
use volcano::engine::VolcanoEngine;

#[test]
fn exported_file_lists_selected_genes() {
    let mut raw = RawSeries::new();
    raw.insert("UP", Some(2.0), Some(1e-4));
    raw.insert("DOWN", Some(-2.0), Some(1e-3));
    raw.insert("FLAT", Some(0.0), Some(0.5));
    let mut e = VolcanoEngine::new(PlotSettings::default());
    e.load_data(&raw);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(default_file_name("selection"));
    save_genes_csv(&path, &e.selected_points(), e.stats()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("UP,2,"));
    assert!(lines[1].ends_with(",up"));
    assert!(lines[2].ends_with(",down"));
}

#[test]
fn rebinding_a_hotkey_moves_the_action() {
    let mut hk = Hotkeys::default();
    hk.reset_view = Some("shift+r".parse().unwrap());
    assert!(hk.actions_for(Hotkey::new(Modifier::None, 'R')).is_empty());
    assert_eq!(hk.actions_for(Hotkey::new(Modifier::Shift, 'R')), vec![HotkeyName::ResetView]);
    assert_eq!(Hotkeys::ORDER.len(), 9);
}
