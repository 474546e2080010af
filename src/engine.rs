//! The volcano engine: one point store, two selections, the coordinate
//! mapper and the interaction controller, plus notification batching.
//!
//! All mutation goes through [`VolcanoEngine`]. Selection-changed
//! notifications are emitted after flags are fully updated, and collapse to
//! one event per selection type while a batch is open.

use std::sync::Arc;

use egui::Color32;

use crate::config::PlotSettings;
use crate::controllers::{SelectionController, SelectionInfo, SelectionRequest};
use crate::data::mapper::{CoordinateMapper, DrawLine, ZoomTransform};
use crate::data::points::{Point, PointStore, RawSeries};
use crate::data::regulation::{Regulation, StatsForm};
use crate::data::selection::{Selection, SelectionTrigger, SelectionType};
use crate::data::style::{point_style, PointStyle, StyleInputs};
use crate::enrichment::{EnrichmentError, EnrichmentTerm, EnrichrBackground, TermLookup, TermOutcome, TermRequest};
use crate::error::{Result, VolcanoError};
use crate::events::{DataMeta, EventController, EventKind, SelectionMeta, TermMeta, ViewMeta, VolcanoEvent};
use crate::interaction::{DragOverlay, Effect, Effects, InteractionController, InteractionMode, Modifiers, PointerButton};
use crate::jobs::{StepResponse, StepResult, StepResultType};

/// Options for [`VolcanoEngine::select_genes_by_name`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectOptions {
    /// Also label exactly these genes.
    pub label: bool,
    /// Paint the selected genes with this colour until they are deselected.
    pub fill: Option<Color32>,
    pub trigger: SelectionTrigger,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            label: false,
            fill: None,
            trigger: SelectionTrigger::Programmatic,
        }
    }
}

/// Gene names sorted by descending `|x|`.
fn genes_by_abs_fold_change(points: &[&Point]) -> Vec<String> {
    let mut sorted: Vec<&&Point> = points.iter().collect();
    sorted.sort_by(|a, b| b.x.abs().total_cmp(&a.x.abs()));
    sorted.into_iter().map(|p| p.gene.clone()).collect()
}

pub struct VolcanoEngine {
    settings: PlotSettings,
    store: Arc<PointStore>,
    selections: [Selection; 2],
    active: SelectionType,
    mapper: CoordinateMapper,
    controller: InteractionController,
    events: EventController,
    batch_depth: usize,
    /// Event kinds owed per selection type once the batch closes.
    pending: [EventKind; 2],
    pending_term: Option<TermMeta>,
    emitted: [Vec<String>; 2],
    lookup: TermLookup,
}

impl VolcanoEngine {
    pub fn new(settings: PlotSettings) -> Self {
        let store = Arc::new(PointStore::default());
        let mapper = CoordinateMapper::new(settings.layout, settings.zoom_limits);
        let controller = InteractionController::new(settings.tooltip_delay_secs);
        Self {
            selections: [
                Selection::new(SelectionType::Standard, Arc::clone(&store)),
                Selection::new(SelectionType::GoTerm, Arc::clone(&store)),
            ],
            store,
            active: SelectionType::Standard,
            mapper,
            controller,
            events: EventController::new(),
            batch_depth: 0,
            pending: [EventKind(0); 2],
            pending_term: None,
            emitted: [Vec::new(), Vec::new()],
            lookup: TermLookup::default(),
            settings,
        }
    }

    /// Share an existing event bus instead of a private one.
    pub fn with_events(mut self, events: EventController) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventController {
        &self.events
    }

    pub fn settings(&self) -> &PlotSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<PointStore> {
        &self.store
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Place the plot on screen: widget origin in event coordinates and plot
    /// area size in pixels.
    pub fn set_viewport(&mut self, origin: (f64, f64), plot_size: (f64, f64)) {
        self.mapper.set_origin(origin.0, origin.1);
        self.mapper.set_plot_size(plot_size.0, plot_size.1);
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    // ─────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the dataset. Both selections keep flags for genes that are
    /// still present; the domain is refitted and the zoom reset.
    pub fn load_data(&mut self, raw: &RawSeries) -> Effects {
        let store = Arc::new(PointStore::load(raw));
        log::info!("loaded {} genes ({} dropped)", store.len(), store.dropped());
        for sel in &mut self.selections {
            sel.reset_data(Arc::clone(&store));
        }
        self.store = store;
        let [px, py] = self.settings.domain_padding;
        self.mapper.fit_domain(self.store.extent(), (px, py));
        self.lookup.cancel();

        let mut fx = self.controller.reset();
        fx.push(Effect::RestyleAll);

        let mut ev = VolcanoEvent::new(EventKind::DATA_LOADED);
        ev.data = Some(DataMeta {
            points: self.store.len(),
            dropped: self.store.dropped(),
        });
        ev.view = Some(self.view_meta());
        self.events.emit(ev);

        self.batch(|e| {
            for kind in SelectionType::ALL {
                e.mark_pending(kind, EventKind::SELECTION_CHANGED);
            }
            if e.settings.select_by_stats_on_load {
                e.select_by_stats();
            }
        });
        fx
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────

    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch; the outermost close flushes deferred notifications.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            log::warn!("end_batch without matching begin_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.flush();
        }
    }

    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_batch();
        let r = f(self);
        self.end_batch();
        r
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    fn mark_pending(&mut self, kind: SelectionType, what: EventKind) {
        self.pending[kind.index()] |= what;
        if self.batch_depth == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if SelectionType::ALL
            .iter()
            .any(|t| self.pending[t.index()].contains(EventKind::SELECTION_CHANGED))
        {
            self.refresh_overlap();
        }
        for kind in SelectionType::ALL {
            let what = std::mem::replace(&mut self.pending[kind.index()], EventKind(0));
            if what.is_empty() {
                continue;
            }
            let sel = &self.selections[kind.index()];
            let genes = genes_by_abs_fold_change(&sel.selected_points());
            let labelled = sel.labelled_points().iter().map(|p| p.gene.clone()).collect();
            let meta = SelectionMeta {
                selection: kind,
                trigger: sel.trigger,
                genes,
                labelled,
            };
            if what.contains(EventKind::SELECTION_CHANGED) {
                self.emitted[kind.index()] = meta.genes.clone();
            }
            let mut ev = VolcanoEvent::new(what);
            ev.selection = Some(meta);
            if what.contains(EventKind::TERM_APPLIED) {
                ev.term = self.pending_term.take();
            }
            self.events.emit(ev);
        }
    }

    /// Genes of the most recent selection-changed notification for the
    /// active type, by descending `|log2FC|`.
    pub fn emitted_genes(&self) -> &[String] {
        &self.emitted[self.active.index()]
    }

    fn dispatch(&mut self, fx: Effects) -> Effects {
        if fx.contains(&Effect::SelectionChanged) {
            self.mark_pending(self.active, EventKind::SELECTION_CHANGED);
        }
        fx
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selections
    // ─────────────────────────────────────────────────────────────────────

    pub fn active_type(&self) -> SelectionType {
        self.active
    }

    pub fn active_selection(&self) -> &Selection {
        &self.selections[self.active.index()]
    }

    pub fn selection(&self, kind: SelectionType) -> &Selection {
        &self.selections[kind.index()]
    }

    /// Make `kind` receive interaction. A drag in progress is abandoned;
    /// flags are untouched.
    pub fn set_active_selection_type(&mut self, kind: SelectionType) -> Effects {
        if kind == self.active {
            return Vec::new();
        }
        let was_dragging = self.controller.is_dragging();
        let mut fx = self.controller.cancel_drag();
        if was_dragging {
            self.mark_pending(self.active, EventKind::SELECTION_CHANGED);
        }
        log::debug!("active selection {} -> {}", self.active, kind);
        self.active = kind;
        let mut ev = VolcanoEvent::new(EventKind::ACTIVE_SELECTION_CHANGED);
        ev.active = Some(kind);
        self.events.emit(ev);
        fx.push(Effect::RestyleAll);
        fx
    }

    /// String form for UI bindings. Unknown names are logged and rejected
    /// without changing anything.
    pub fn set_active_selection_type_named(&mut self, name: &str) -> Result<Effects> {
        match name.parse::<SelectionType>() {
            Ok(kind) => Ok(self.set_active_selection_type(kind)),
            Err(e) => {
                log::error!("{}", e);
                Err(e)
            }
        }
    }

    /// Replace the active selection with the named genes (clear-then-set).
    /// Unknown genes are skipped. Returns the number selected.
    pub fn select_genes_by_name<S: AsRef<str>>(&mut self, genes: &[S], opts: SelectOptions) -> usize {
        let kind = self.active;
        self.batch(|e| {
            let sel = &mut e.selections[kind.index()];
            let n = match opts.fill {
                Some(c) => sel.select_points_with_fill(genes, c),
                None => sel.select_points_by_gene_name(genes),
            };
            sel.trigger = opts.trigger;
            let mut what = EventKind::SELECTION_CHANGED;
            if opts.label {
                sel.label_points_by_gene_name(genes);
                what |= EventKind::LABELS_CHANGED;
            }
            e.mark_pending(kind, what);
            log::info!("selected {} of {} requested genes", n, genes.len());
            n
        })
    }

    /// Replace the labelled set of the active selection.
    pub fn label_genes_by_name<S: AsRef<str>>(&mut self, genes: &[S]) {
        let kind = self.active;
        self.selections[kind.index()].label_points_by_gene_name(genes);
        self.mark_pending(kind, EventKind::LABELS_CHANGED);
    }

    /// Select every up- or down-regulated gene in the standard selection.
    pub fn select_by_stats(&mut self) -> usize {
        let form = &self.settings.stats;
        let genes: Vec<&str> = self
            .store
            .points()
            .iter()
            .filter(|p| form.classify(p) != Regulation::Unregulated)
            .map(|p| p.gene.as_str())
            .collect();
        let kind = SelectionType::Standard;
        let sel = &mut self.selections[kind.index()];
        let n = sel.select_points_by_gene_name(&genes);
        sel.trigger = SelectionTrigger::SelectByStats;
        log::info!("selected {} regulated genes", n);
        self.mark_pending(kind, EventKind::SELECTION_CHANGED);
        n
    }

    pub fn select_all(&mut self) {
        let kind = self.active;
        let sel = &mut self.selections[kind.index()];
        sel.select_all();
        sel.trigger = SelectionTrigger::Programmatic;
        self.mark_pending(kind, EventKind::SELECTION_CHANGED);
    }

    /// Deselect and unlabel everything in the active selection.
    pub fn clear_selection(&mut self) -> Effects {
        let kind = self.active;
        let sel = &mut self.selections[kind.index()];
        sel.deselect_all();
        sel.unlabel_all();
        sel.trigger = SelectionTrigger::Programmatic;
        let mut fx = self.controller.hide_all_tooltips();
        fx.push(Effect::RestyleAll);
        self.mark_pending(kind, EventKind::SELECTION_CHANGED | EventKind::LABELS_CHANGED);
        fx
    }

    fn refresh_overlap(&mut self) {
        let [std_sel, go_sel] = &mut self.selections;
        let overlap: Vec<String> = go_sel.intersection(std_sel).iter().map(|p| p.gene.clone()).collect();
        go_sel.mark_points_as_overlapping(&overlap);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer input
    // ─────────────────────────────────────────────────────────────────────

    pub fn on_pointer_down(&mut self, px: f64, py: f64, button: PointerButton, mods: Modifiers) -> Effects {
        let sel = &mut self.selections[self.active.index()];
        let fx = self.controller.pointer_down(sel, &self.mapper, px, py, button, mods);
        self.dispatch(fx)
    }

    pub fn on_pointer_move(&mut self, px: f64, py: f64, mods: Modifiers) -> Effects {
        let sel = &mut self.selections[self.active.index()];
        let fx = self.controller.pointer_move(sel, &self.mapper, px, py, mods);
        self.dispatch(fx)
    }

    pub fn on_pointer_up(&mut self) -> Effects {
        let sel = &mut self.selections[self.active.index()];
        let fx = self.controller.pointer_up(sel);
        self.dispatch(fx)
    }

    pub fn on_point_click(&mut self, gene: &str, mods: Modifiers) -> Effects {
        let sel = &mut self.selections[self.active.index()];
        let fx = self.controller.point_click(sel, gene, mods);
        self.dispatch(fx)
    }

    pub fn on_point_over(&mut self, gene: &str) -> Effects {
        let fx = self.controller.point_over(&self.selections[self.active.index()], gene);
        if self.controller.hovered() == Some(gene) && !fx.is_empty() {
            let mut ev = VolcanoEvent::new(EventKind::HOVER);
            ev.hovered = Some(gene.to_string());
            self.events.emit(ev);
        }
        fx
    }

    /// `now` is a monotonic time in seconds, used for tooltip delays.
    pub fn on_point_out(&mut self, gene: &str, now: f64) -> Effects {
        self.controller.point_out(&self.selections[self.active.index()], gene, now)
    }

    pub fn on_tooltip_over(&mut self, gene: &str) {
        self.controller.tooltip_over(gene);
    }

    pub fn on_tooltip_out(&mut self, gene: &str, now: f64) -> Effects {
        self.controller.tooltip_out(&self.selections[self.active.index()], gene, now)
    }

    pub fn poll_tooltips(&mut self, now: f64) -> Effects {
        self.controller.poll_tooltips(now)
    }

    pub fn set_sticky_shift(&mut self, on: bool) {
        self.controller.set_sticky_shift(on);
    }

    /// In-view point under an event position, if any.
    pub fn point_at(&self, px: f64, py: f64) -> Option<&Point> {
        let draw = self.mapper.from_event(px, py).draw;
        let radius = self.settings.layout.point_radius + 1.0;
        self.mapper
            .hit_test(self.store.points(), draw, radius)
            .and_then(|i| self.store.get(i))
    }

    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        self.controller.drag_overlay()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mode and view
    // ─────────────────────────────────────────────────────────────────────

    pub fn mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn set_mode(&mut self, mode: InteractionMode) -> Effects {
        if mode == self.controller.mode() {
            return Vec::new();
        }
        let was_dragging = self.controller.is_dragging();
        let fx = self.controller.set_mode(mode);
        if was_dragging {
            self.mark_pending(self.active, EventKind::SELECTION_CHANGED);
        }
        let mut ev = VolcanoEvent::new(EventKind::MODE_CHANGED);
        ev.mode = Some(mode);
        self.events.emit(ev);
        fx
    }

    pub fn set_mode_named(&mut self, name: &str) -> Result<Effects> {
        match name.parse::<InteractionMode>() {
            Ok(mode) => Ok(self.set_mode(mode)),
            Err(e) => {
                log::error!("{}", e);
                Err(e)
            }
        }
    }

    fn view_meta(&self) -> ViewMeta {
        let t = self.mapper.transform();
        let v = self.mapper.visible_domain();
        ViewMeta {
            k: t.k,
            tx: t.x,
            ty: t.y,
            x_range: (v.min.x, v.max.x),
            y_range: (v.min.y, v.max.y),
        }
    }

    fn emit_view(&self, kind: EventKind) {
        let mut ev = VolcanoEvent::new(kind);
        ev.view = Some(self.view_meta());
        self.events.emit(ev);
    }

    /// Install a zoom transform directly (clamped to the zoom limits).
    pub fn apply_zoom(&mut self, transform: ZoomTransform) -> ZoomTransform {
        if !transform.is_finite() {
            log::warn!("ignoring non-finite zoom transform {:?}", transform);
            return self.mapper.transform();
        }
        let applied = self.mapper.apply_zoom(transform);
        self.emit_view(EventKind::ZOOM);
        applied
    }

    /// Wheel zoom around an event position. Only acts in pan/zoom mode.
    pub fn on_wheel_zoom(&mut self, factor: f64, px: f64, py: f64) -> bool {
        if self.mode() != InteractionMode::PanZoom || !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let draw = self.mapper.from_event(px, py).draw;
        self.mapper.zoom_at(factor, draw);
        self.emit_view(EventKind::ZOOM);
        true
    }

    /// Drag-to-pan by a pixel delta. Only acts in pan/zoom mode.
    pub fn on_pan(&mut self, dx: f64, dy: f64) -> bool {
        if self.mode() != InteractionMode::PanZoom {
            return false;
        }
        self.mapper.pan_by(dx, dy);
        self.emit_view(EventKind::PAN);
        true
    }

    pub fn reset_view(&mut self) {
        self.mapper.reset_zoom();
        self.emit_view(EventKind::VIEW_RESET);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Stats form and styling
    // ─────────────────────────────────────────────────────────────────────

    pub fn stats(&self) -> &StatsForm {
        &self.settings.stats
    }

    fn emit_thresholds(&self) {
        let mut ev = VolcanoEvent::new(EventKind::THRESHOLDS_CHANGED);
        ev.thresholds = Some(self.settings.stats.clone());
        self.events.emit(ev);
    }

    /// Edit one stats form field by name, then re-run select-by-stats.
    /// Unknown fields and invalid values are logged and change nothing.
    pub fn update_stats_field(&mut self, field: &str, value: f64) -> Result<()> {
        if let Err(e) = self.settings.stats.update_field(field, value) {
            log::error!("{}", e);
            return Err(e);
        }
        self.emit_thresholds();
        self.select_by_stats();
        Ok(())
    }

    pub fn update_regulation_color(&mut self, color: Color32, regulation: Regulation) {
        self.settings.stats.set_color(regulation, color);
        self.emit_thresholds();
    }

    pub fn classify(&self, point: &Point) -> Regulation {
        self.settings.stats.classify(point)
    }

    /// Guide lines at `±log2FC` and `-log10 padj`, in draw space.
    pub fn threshold_lines(&self) -> [DrawLine; 3] {
        let t = self.settings.stats.thresholds();
        self.mapper.threshold_lines(t.log2_fold_change, t.nlogpadj)
    }

    /// Style of the point in `slot` as seen through the active selection.
    pub fn point_style(&self, slot: usize) -> Option<PointStyle> {
        let point = self.store.get(slot)?;
        let sel = self.active_selection();
        let config = sel.config();
        let deferred = config
            .defer_interactive_coloring_to
            .map(|k| self.selections[k.index()].config());
        Some(point_style(&StyleInputs {
            point,
            flags: sel.flags(slot),
            config,
            deferred,
            form: &self.settings.stats,
            fill_override: sel.fill_override(slot),
            in_view: self.mapper.is_in_view(point),
            hovered: self.controller.hovered() == Some(point.gene.as_str()),
        }))
    }

    /// Styles for every slot, in store order.
    pub fn styles(&self) -> Vec<PointStyle> {
        (0..self.store.len()).filter_map(|i| self.point_style(i)).collect()
    }

    pub fn selected_points(&self) -> Vec<&Point> {
        self.active_selection().selected_points()
    }

    pub fn labelled_points(&self) -> Vec<&Point> {
        self.active_selection().labelled_points()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Enrichment
    // ─────────────────────────────────────────────────────────────────────

    pub fn enrichment_background(&self) -> EnrichrBackground {
        self.settings.enrichment_background
    }

    pub fn set_enrichment_background(&mut self, background: EnrichrBackground) {
        self.settings.enrichment_background = background;
    }

    /// Start looking up the genes of `term`. Any lookup still in flight is
    /// aborted and its result will be ignored.
    pub fn begin_term_lookup(&mut self, term: &str) -> TermRequest {
        let (ticket, registration) = self.lookup.begin();
        log::debug!("term lookup '{}' started", term);
        TermRequest::new(ticket, self.settings.enrichment_background, term.to_string(), registration)
    }

    pub fn cancel_term_lookup(&mut self) {
        self.lookup.cancel();
    }

    /// Apply a finished lookup. Returns `Ok(false)` when the outcome belongs
    /// to a superseded lookup; service errors leave the selection untouched.
    pub fn apply_term_outcome(&mut self, outcome: TermOutcome) -> Result<bool> {
        if !self.lookup.finish(outcome.ticket) {
            match outcome.result {
                Err(EnrichmentError::Cancelled) => log::debug!("term lookup '{}' cancelled", outcome.term),
                _ => log::warn!("discarding stale result for term '{}'", outcome.term),
            }
            return Ok(false);
        }
        match outcome.result {
            Ok(genes) => {
                self.apply_term_genes(&outcome.term, &genes, SelectionTrigger::GoTermTab);
                Ok(true)
            }
            Err(e) => {
                log::error!("term lookup '{}' failed: {}", outcome.term, e);
                Err(VolcanoError::Enrichment(e))
            }
        }
    }

    /// Apply a ranked enrichment row directly (its genes are already known).
    pub fn select_enrichment_term(&mut self, term: &EnrichmentTerm) {
        self.lookup.cancel();
        self.apply_term_genes(&term.term, &term.overlapping_genes, SelectionTrigger::EnrichmentAnalysisTab);
    }

    fn apply_term_genes(&mut self, term: &str, genes: &[String], trigger: SelectionTrigger) {
        self.batch(|e| {
            let kind = SelectionType::GoTerm;
            let sel = &mut e.selections[kind.index()];
            let n = sel.select_points_by_gene_name(genes);
            sel.trigger = trigger;
            e.refresh_overlap();
            let overlap = e.selections[kind.index()]
                .points()
                .filter(|(_, _, f)| f.part_of_selection_overlap)
                .count();
            log::info!("term '{}': {} genes in plot, {} overlap", term, n, overlap);
            e.pending_term = Some(TermMeta {
                term: term.to_string(),
                genes: n,
                overlap,
            });
            e.mark_pending(kind, EventKind::SELECTION_CHANGED | EventKind::TERM_APPLIED);
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Jobs and controllers
    // ─────────────────────────────────────────────────────────────────────

    /// Load a `volcanoData` step result. Other successful result types are
    /// ignored; failures are returned as errors.
    pub fn apply_step_response(&mut self, response: StepResponse) -> Result<Effects> {
        match response {
            StepResponse::Success(StepResult {
                kind: StepResultType::VolcanoData,
                data,
            }) => {
                let raw = RawSeries::from_volcano_data(&data)?;
                Ok(self.load_data(&raw))
            }
            StepResponse::Success(r) => {
                log::debug!("ignoring {:?} step result", r.kind);
                Ok(Vec::new())
            }
            StepResponse::Failure { error } => {
                log::error!("job failed: {}", error);
                Err(VolcanoError::Job(error))
            }
        }
    }

    pub fn selection_info(&self) -> SelectionInfo {
        let sel = self.active_selection();
        SelectionInfo {
            active: self.active,
            mode: self.mode(),
            selected_genes: genes_by_abs_fold_change(&sel.selected_points()),
            labelled_genes: sel.labelled_points().iter().map(|p| p.gene.clone()).collect(),
        }
    }

    /// Apply queued requests in order inside one batch, then publish a
    /// snapshot to the controller's listeners.
    pub fn apply_controller(&mut self, ctrl: &SelectionController) -> Effects {
        let requests = ctrl.take_requests();
        if requests.is_empty() {
            return Vec::new();
        }
        let mut fx = Vec::new();
        self.begin_batch();
        for req in requests {
            match req {
                SelectionRequest::SelectGenes { genes, label } => {
                    self.select_genes_by_name(&genes, SelectOptions { label, ..SelectOptions::default() });
                    fx.push(Effect::RestyleAll);
                }
                SelectionRequest::LabelGenes(genes) => self.label_genes_by_name(&genes),
                SelectionRequest::Clear => fx.extend(self.clear_selection()),
                SelectionRequest::SelectAll => {
                    self.select_all();
                    fx.push(Effect::RestyleAll);
                }
                SelectionRequest::SelectByStats => {
                    self.select_by_stats();
                    fx.push(Effect::RestyleAll);
                }
                SelectionRequest::SetActiveType(kind) => fx.extend(self.set_active_selection_type(kind)),
                SelectionRequest::SetActiveTypeNamed(name) => {
                    if let Ok(f) = self.set_active_selection_type_named(&name) {
                        fx.extend(f);
                    }
                }
                SelectionRequest::SetMode(mode) => fx.extend(self.set_mode(mode)),
                SelectionRequest::ResetView => {
                    self.reset_view();
                    fx.push(Effect::RestyleAll);
                }
                SelectionRequest::UpdateStatsField { field, value } => {
                    if self.update_stats_field(&field, value).is_ok() {
                        fx.push(Effect::RestyleAll);
                    }
                }
            }
        }
        self.end_batch();
        ctrl.publish(self.selection_info());
        fx
    }
}

impl Default for VolcanoEngine {
    fn default() -> Self {
        Self::new(PlotSettings::default())
    }
}
