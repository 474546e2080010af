//! egui front end for the volcano engine.
//!
//! | Sub-module  | Responsibility |
//! | ----------- | -------------- |
//! | [`plot`]    | Painting points, axes, labels, tooltips and the drag rectangle; pointer input |
//! | [`sidebar`] | Toolbar, stats form, enrichment terms and hotkey list |
//! | [`table`]   | Filterable gene table |
//! | [`run`]     | [`run_volcano()`] entry point |
//!
//! The engine is the single source of truth. The UI only translates egui
//! input into engine calls and paints what the engine reports each frame.

mod plot;
mod run;
mod sidebar;
mod table;

pub use run::run_volcano;

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use eframe::egui;

use crate::config::{FeatureFlags, VolcanoConfig};
use crate::controllers::SelectionController;
use crate::data::export;
use crate::data::hotkeys::{self as hotkey_helpers, HotkeyName};
use crate::data::points::RawSeries;
use crate::data::selection::SelectionType;
use crate::engine::VolcanoEngine;
use crate::enrichment::{EnrichmentService, EnrichmentTerm, TermOutcome};
use crate::events::{EventKind, VolcanoEvent};
use crate::interaction::{Effect, Effects, InteractionMode};
use crate::jobs::StepResponse;

use table::GeneTable;

/// Standalone volcano plot window implementing [`eframe::App`].
/// Ranks enrichment terms for the emitted standard selection genes.
pub type TermRanker = Box<dyn Fn(&[String]) -> Vec<EnrichmentTerm> + Send>;

pub struct VolcanoApp {
    pub engine: VolcanoEngine,
    pub headline: Option<String>,
    pub features: FeatureFlags,

    selection_ctrl: Option<SelectionController>,
    events_rx: Receiver<VolcanoEvent>,
    job_rx: Option<Receiver<StepResponse>>,

    enrichment: Option<Arc<dyn EnrichmentService>>,
    ranked_terms: Vec<EnrichmentTerm>,
    term_ranker: Option<TermRanker>,
    term_tx: Sender<TermOutcome>,
    term_rx: Receiver<TermOutcome>,
    term_input: String,

    table: GeneTable,
    /// Gene under the pointer last frame.
    hovered_gene: Option<String>,
    /// Tooltip under the pointer last frame.
    hovered_tooltip: Option<String>,
    status: String,
}

impl VolcanoApp {
    pub fn new(cfg: VolcanoConfig) -> Self {
        let mut engine = VolcanoEngine::new(cfg.settings);
        if let Some(ev) = cfg.controllers.event {
            engine = engine.with_events(ev);
        }
        let events_rx = engine.events().subscribe_all();
        let (term_tx, term_rx) = std::sync::mpsc::channel();
        Self {
            engine,
            headline: cfg.headline,
            features: cfg.features,
            selection_ctrl: cfg.controllers.selection,
            events_rx,
            job_rx: None,
            enrichment: None,
            ranked_terms: Vec::new(),
            term_ranker: None,
            term_tx,
            term_rx,
            term_input: String::new(),
            table: GeneTable::default(),
            hovered_gene: None,
            hovered_tooltip: None,
            status: String::new(),
        }
    }

    /// Load `volcanoData` step results arriving on `rx`.
    pub fn with_job_results(mut self, rx: Receiver<StepResponse>) -> Self {
        self.job_rx = Some(rx);
        self
    }

    pub fn with_enrichment(mut self, service: Arc<dyn EnrichmentService>) -> Self {
        self.enrichment = Some(service);
        self
    }

    /// Re-rank the enrichment list whenever the standard selection changes.
    /// The current selection is ranked right away.
    pub fn with_term_ranker(mut self, ranker: TermRanker) -> Self {
        let genes: Vec<String> = self
            .engine
            .selection(SelectionType::Standard)
            .selected_points()
            .iter()
            .map(|p| p.gene.clone())
            .collect();
        self.ranked_terms = ranker(&genes);
        self.term_ranker = Some(ranker);
        self
    }

    /// Rows shown in the enrichment list.
    pub fn set_ranked_terms(&mut self, terms: Vec<EnrichmentTerm>) {
        self.ranked_terms = terms;
    }

    pub fn load_data(&mut self, raw: &RawSeries) {
        let fx = self.engine.load_data(raw);
        self.hovered_gene = None;
        self.hovered_tooltip = None;
        self.handle_effects(fx);
    }

    fn handle_effects(&mut self, fx: Effects) {
        let touches_rows = fx
            .iter()
            .any(|e| matches!(e, Effect::SelectionChanged | Effect::RestyleAll | Effect::Restyle(_)));
        if touches_rows {
            self.table.invalidate();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Per-frame polling
    // ─────────────────────────────────────────────────────────────────────

    fn poll_events(&mut self) {
        while let Ok(ev) = self.events_rx.try_recv() {
            if ev.kinds.intersects(EventKind::SELECTION_CHANGED | EventKind::DATA_LOADED) {
                self.table.invalidate();
            }
            if let Some(term) = &ev.term {
                self.status = format!(
                    "{}: {} genes in plot, {} also in standard selection",
                    term.term, term.genes, term.overlap
                );
            } else if let (true, Some(sel)) = (ev.kinds.contains(EventKind::SELECTION_CHANGED), &ev.selection) {
                if let (SelectionType::Standard, Some(rank)) = (sel.selection, &self.term_ranker) {
                    self.ranked_terms = rank(&sel.genes);
                }
                self.status = format!("{} selection: {} genes ({:?})", sel.selection, sel.genes.len(), sel.trigger);
            } else if let Some(data) = &ev.data {
                self.status = format!("loaded {} genes, {} dropped", data.points, data.dropped);
            }
        }
    }

    fn poll_jobs(&mut self) {
        let Some(rx) = &self.job_rx else { return };
        let responses: Vec<StepResponse> = rx.try_iter().collect();
        for resp in responses {
            match self.engine.apply_step_response(resp) {
                Ok(fx) => self.handle_effects(fx),
                Err(e) => self.status = e.to_string(),
            }
        }
    }

    fn poll_terms(&mut self) {
        let outcomes: Vec<TermOutcome> = self.term_rx.try_iter().collect();
        for outcome in outcomes {
            match self.engine.apply_term_outcome(outcome) {
                Ok(true) => self.table.invalidate(),
                Ok(false) => {}
                Err(e) => self.status = e.to_string(),
            }
        }
    }

    fn apply_controllers(&mut self) {
        if let Some(ctrl) = self.selection_ctrl.clone() {
            let fx = self.engine.apply_controller(&ctrl);
            self.handle_effects(fx);
        }
    }

    /// Run the lookup for `term` on a worker thread. A lookup already in
    /// flight is aborted.
    pub(crate) fn start_term_lookup(&mut self, ctx: &egui::Context, term: &str) {
        let Some(service) = self.enrichment.clone() else {
            self.status = "no enrichment service configured".into();
            return;
        };
        let request = self.engine.begin_term_lookup(term);
        let tx = self.term_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = futures::executor::block_on(request.run(service.as_ref()));
            if tx.send(outcome).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Actions shared by toolbar buttons and hotkeys
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn toggle_selection_type(&mut self) {
        let next = match self.engine.active_type() {
            SelectionType::Standard => SelectionType::GoTerm,
            SelectionType::GoTerm => SelectionType::Standard,
        };
        let fx = self.engine.set_active_selection_type(next);
        self.handle_effects(fx);
    }

    pub(crate) fn export_selection(&mut self) {
        let points = self.engine.selected_points();
        if points.is_empty() {
            self.status = "nothing selected to export".into();
            return;
        }
        let name = export::default_file_name("volcano_selection");
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&name)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match export::save_genes_csv(&path, &points, self.engine.stats()) {
            Ok(()) => self.status = format!("exported {} genes to {}", points.len(), path.display()),
            Err(e) => {
                log::error!("export failed: {}", e);
                self.status = format!("export failed: {}", e);
            }
        }
    }

    pub(crate) fn save_settings(&mut self) {
        match self.engine.settings().save_to_default_path() {
            Ok(()) => self.status = "settings saved".into(),
            Err(e) => {
                log::error!("saving settings failed: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        let actions = hotkey_helpers::detect_hotkey_actions(&self.engine.settings().hotkeys, ctx);
        for action in actions {
            match action {
                HotkeyName::SelectMode => {
                    let fx = self.engine.set_mode(InteractionMode::Select);
                    self.handle_effects(fx);
                }
                HotkeyName::PanZoomMode => {
                    let fx = self.engine.set_mode(InteractionMode::PanZoom);
                    self.handle_effects(fx);
                }
                HotkeyName::ResetView => self.engine.reset_view(),
                HotkeyName::SelectAll => self.engine.select_all(),
                HotkeyName::ClearSelection => {
                    let fx = self.engine.clear_selection();
                    self.handle_effects(fx);
                }
                HotkeyName::SelectByStats => {
                    self.engine.select_by_stats();
                }
                HotkeyName::ToggleSelectionType => self.toggle_selection_type(),
                HotkeyName::StickyShift => {
                    let on = !self.engine.controller().sticky_shift();
                    self.engine.set_sticky_shift(on);
                }
                HotkeyName::ExportSelection => self.export_selection(),
            }
        }
    }
}

impl eframe::App for VolcanoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_controllers();
        self.poll_jobs();
        self.poll_terms();
        self.handle_hotkeys(ctx);

        let now = ctx.input(|i| i.time);
        let fx = self.engine.poll_tooltips(now);
        self.handle_effects(fx);

        self.toolbar(ctx);
        egui::TopBottomPanel::bottom("volcano_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("mode: {}", self.engine.mode()));
                });
            });
        });
        if self.features.sidebar {
            egui::SidePanel::left("volcano_sidebar")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| self.sidebar(ui));
        }
        if self.features.gene_table {
            egui::TopBottomPanel::bottom("volcano_genes")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| self.gene_table(ui));
        }
        egui::CentralPanel::default().show(ctx, |ui| self.plot_ui(ui));

        // Events emitted during this frame's input handling.
        self.poll_events();

        if let Some(deadline) = self.engine.controller().next_tooltip_deadline() {
            let wait = (deadline - now).max(0.0);
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(wait));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotSettings;
    use crate::engine::SelectOptions;
    use crate::enrichment::StaticEnrichment;

    fn app() -> VolcanoApp {
        let cfg = VolcanoConfig {
            settings: PlotSettings {
                select_by_stats_on_load: false,
                ..PlotSettings::default()
            },
            ..VolcanoConfig::default()
        };
        let mut app = VolcanoApp::new(cfg);
        let mut raw = RawSeries::new();
        raw.insert("TP53", Some(2.0), Some(0.001));
        raw.insert("MDM2", Some(1.0), Some(0.01));
        raw.insert("GAPDH", Some(0.1), Some(0.9));
        app.load_data(&raw);
        app
    }

    fn ranker() -> TermRanker {
        let mut svc = StaticEnrichment::new();
        svc.insert("p53 signalling", ["TP53", "MDM2"]);
        svc.insert("glycolysis", ["GAPDH"]);
        Box::new(move |genes| svc.rank(genes))
    }

    fn terms(app: &VolcanoApp) -> Vec<&str> {
        app.ranked_terms.iter().map(|t| t.term.as_str()).collect()
    }

    #[test]
    fn ranked_terms_follow_standard_selection() {
        let mut app = app().with_term_ranker(ranker());
        assert!(app.ranked_terms.is_empty());

        app.engine.select_genes_by_name(&["GAPDH"], SelectOptions::default());
        app.poll_events();
        assert_eq!(terms(&app), vec!["glycolysis"]);

        app.engine.set_active_selection_type(SelectionType::GoTerm);
        app.engine.select_genes_by_name(&["TP53"], SelectOptions::default());
        app.poll_events();
        assert_eq!(terms(&app), vec!["glycolysis"]);

        app.engine.set_active_selection_type(SelectionType::Standard);
        app.engine.select_genes_by_name(&["TP53", "MDM2"], SelectOptions::default());
        app.poll_events();
        assert_eq!(terms(&app), vec!["p53 signalling"]);
    }
}
