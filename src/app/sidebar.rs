//! Toolbar and left side panel.

use eframe::egui;
use egui_phosphor::regular as icons;

use crate::data::hotkeys::Hotkeys;
use crate::data::regulation::Regulation;
use crate::data::selection::SelectionType;
use crate::enrichment::EnrichrBackground;
use crate::interaction::InteractionMode;

use super::VolcanoApp;

impl VolcanoApp {
    pub(super) fn toolbar(&mut self, ctx: &egui::Context) {
        if !self.features.plot_controls {
            return;
        }
        egui::TopBottomPanel::top("volcano_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut mode = self.engine.mode();
                ui.selectable_value(&mut mode, InteractionMode::Select, format!("{} Select", icons::CURSOR))
                    .on_hover_text("Click and drag to select genes");
                ui.selectable_value(
                    &mut mode,
                    InteractionMode::PanZoom,
                    format!("{} Pan/Zoom", icons::ARROWS_OUT_CARDINAL),
                )
                .on_hover_text("Drag to pan, scroll to zoom");
                if mode != self.engine.mode() {
                    let fx = self.engine.set_mode(mode);
                    self.handle_effects(fx);
                }
                if ui
                    .button(format!("{} Reset view", icons::ARROW_COUNTER_CLOCKWISE))
                    .clicked()
                {
                    self.engine.reset_view();
                }

                ui.separator();
                let mut active = self.engine.active_type();
                egui::ComboBox::from_id_salt("active_selection_type")
                    .selected_text(active.label())
                    .show_ui(ui, |ui| {
                        for kind in SelectionType::ALL {
                            ui.selectable_value(&mut active, kind, kind.label());
                        }
                    });
                if active != self.engine.active_type() {
                    let fx = self.engine.set_active_selection_type(active);
                    self.handle_effects(fx);
                }

                ui.separator();
                if ui
                    .button(format!("{} By stats", icons::FUNNEL))
                    .on_hover_text("Select up- and downregulated genes")
                    .clicked()
                {
                    self.engine.select_by_stats();
                }
                if ui.button(format!("{} All", icons::CHECK_SQUARE)).clicked() {
                    self.engine.select_all();
                }
                if ui.button(format!("{} Clear", icons::BROOM)).clicked() {
                    let fx = self.engine.clear_selection();
                    self.handle_effects(fx);
                }
                let mut sticky = self.engine.controller().sticky_shift();
                if ui
                    .toggle_value(&mut sticky, "Shift")
                    .on_hover_text("Behave as if Shift were held")
                    .changed()
                {
                    self.engine.set_sticky_shift(sticky);
                }

                ui.separator();
                if ui.button(format!("{} Export", icons::EXPORT)).clicked() {
                    self.export_selection();
                }
                if ui
                    .button(icons::FLOPPY_DISK)
                    .on_hover_text("Save settings")
                    .clicked()
                {
                    self.save_settings();
                }
            });
        });
    }

    pub(super) fn sidebar(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.features.stats_form {
                egui::CollapsingHeader::new("Select by stats")
                    .default_open(true)
                    .show(ui, |ui| self.stats_form(ui));
            }
            egui::CollapsingHeader::new("Enrichment")
                .default_open(true)
                .show(ui, |ui| self.enrichment_ui(ui));
            egui::CollapsingHeader::new("Hotkeys")
                .default_open(false)
                .show(ui, |ui| hotkey_list(ui, &self.engine.settings().hotkeys));
        });
    }

    fn stats_form(&mut self, ui: &mut egui::Ui) {
        let form = self.engine.stats().clone();
        let mut edits: Vec<(&str, f64)> = Vec::new();
        egui::Grid::new("stats_form").num_columns(2).show(ui, |ui| {
            let mut field = |ui: &mut egui::Ui, label: &str, name: &'static str, mut v: f64, speed: f64| {
                ui.label(label);
                if ui.add(egui::DragValue::new(&mut v).speed(speed).max_decimals(4)).changed() {
                    edits.push((name, v));
                }
                ui.end_row();
            };
            field(ui, "padj", "padj", form.padj, 0.001);
            field(ui, "-log10 padj", "nlogpadj", form.nlogpadj, 0.05);
            field(ui, "fold change", "fc", form.fc, 0.05);
            field(ui, "log2 fold change", "log2FoldChange", form.log2_fold_change, 0.05);
        });
        for (name, v) in edits {
            if let Err(e) = self.engine.update_stats_field(name, v) {
                self.status = e.to_string();
            }
        }

        ui.horizontal(|ui| {
            for reg in [Regulation::Up, Regulation::Down] {
                let Some(mut c) = form.color(reg) else { continue };
                ui.label(reg.to_string());
                if egui::color_picker::color_edit_button_srgba(ui, &mut c, egui::color_picker::Alpha::Opaque)
                    .changed()
                {
                    self.engine.update_regulation_color(c, reg);
                }
            }
        });
    }

    fn enrichment_ui(&mut self, ui: &mut egui::Ui) {
        let mut bg = self.engine.enrichment_background();
        egui::ComboBox::from_id_salt("enrichr_background")
            .selected_text(bg.label())
            .show_ui(ui, |ui| {
                for b in EnrichrBackground::ALL {
                    ui.selectable_value(&mut bg, b, b.label());
                }
            });
        if bg != self.engine.enrichment_background() {
            self.engine.set_enrichment_background(bg);
        }

        ui.horizontal(|ui| {
            let edit = ui.text_edit_singleline(&mut self.term_input);
            let submit = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button(icons::MAGNIFYING_GLASS).clicked() || submit) && !self.term_input.trim().is_empty() {
                let term = self.term_input.trim().to_string();
                self.start_term_lookup(ui.ctx(), &term);
            }
        });

        let mut picked = None;
        for t in &self.ranked_terms {
            let text = format!("{} ({} genes, p={:.2e})", t.term, t.overlapping_genes.len(), t.adj_p_value);
            if ui.selectable_label(false, text).clicked() {
                picked = Some(t.clone());
            }
        }
        if let Some(t) = picked {
            self.engine.select_enrichment_term(&t);
            self.table.invalidate();
        }
    }
}

fn hotkey_list(ui: &mut egui::Ui, hotkeys: &Hotkeys) {
    egui::Grid::new("hotkey_list").num_columns(2).striped(true).show(ui, |ui| {
        for name in Hotkeys::ORDER {
            ui.label(name.label());
            match hotkeys.get(name) {
                Some(hk) => ui.monospace(hk.to_string()),
                None => ui.weak("unbound"),
            };
            ui.end_row();
        }
    });
}
