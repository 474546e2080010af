use volcano::config::*;
use volcano::enrichment::EnrichrBackground;

#[test]
fn settings_round_trip_through_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.yaml");

    let mut s = PlotSettings::default();
    s.tooltip_delay_secs = 0.75;
    s.select_by_stats_on_load = false;
    s.enrichment_background = EnrichrBackground::Reactome2022;
    s.stats.update_field("padj", 0.01).unwrap();
    s.layout.point_radius = 5.0;
    s.save_to_path(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Reactome_2022"));

    let loaded = PlotSettings::load_from_path(&path).unwrap();
    assert_eq!(loaded, s);
}

#[test]
fn invalid_settings_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, "zoom_limits:\n  min: 3.0\n  max: 1.0\n").unwrap();
    assert!(PlotSettings::load_from_path(&path).is_err());

    std::fs::write(&path, "domain_padding: [-1.0, 0.5]\n").unwrap();
    assert!(PlotSettings::load_from_path(&path).is_err());

    std::fs::write(&path, "layout: [not, a, map]\n").unwrap();
    assert!(PlotSettings::load_from_path(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PlotSettings::load_from_path(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn config_defaults() {
    let cfg = VolcanoConfig::default();
    assert_eq!(cfg.title, "Volcano Plot");
    assert!(cfg.headline.is_none());
    assert!(cfg.features.gene_table);
    assert!(cfg.controllers.selection.is_none());
}
