//! Gene table below the plot.

use eframe::egui;
use egui_table::{HeaderRow, Table, TableDelegate};

use crate::data::points::Point;
use crate::data::regulation::{Regulation, StatsForm};
use crate::data::selection::Selection;
use crate::engine::VolcanoEngine;
use crate::interaction::Modifiers;

use super::VolcanoApp;

/// Which rows the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RowFilter {
    #[default]
    All,
    Selected,
    Regulated(Regulation),
}

impl RowFilter {
    fn label(self) -> &'static str {
        match self {
            RowFilter::All => "All genes",
            RowFilter::Selected => "Selected",
            RowFilter::Regulated(Regulation::Up) => "Upregulated",
            RowFilter::Regulated(Regulation::Down) => "Downregulated",
            RowFilter::Regulated(Regulation::Unregulated) => "Unregulated",
        }
    }

    const ALL: [RowFilter; 5] = [
        RowFilter::All,
        RowFilter::Selected,
        RowFilter::Regulated(Regulation::Up),
        RowFilter::Regulated(Regulation::Down),
        RowFilter::Regulated(Regulation::Unregulated),
    ];
}

#[derive(Debug, Default)]
pub(crate) struct GeneTable {
    pub search: String,
    pub filter: RowFilter,
    /// Store slots in display order; `None` means stale.
    rows: Option<Vec<usize>>,
}

impl GeneTable {
    pub fn invalidate(&mut self) {
        self.rows = None;
    }

    /// Matching slots, sorted by descending `|log2FC|`.
    pub fn filtered_rows(&self, engine: &VolcanoEngine) -> Vec<usize> {
        let needle = self.search.trim().to_lowercase();
        let sel = engine.active_selection();
        let mut rows: Vec<usize> = engine
            .store()
            .points()
            .iter()
            .enumerate()
            .filter(|(slot, p)| {
                let keep = match self.filter {
                    RowFilter::All => true,
                    RowFilter::Selected => sel.is_slot_selected(*slot),
                    RowFilter::Regulated(r) => engine.classify(p) == r,
                };
                keep && (needle.is_empty() || p.gene.to_lowercase().contains(&needle))
            })
            .map(|(slot, _)| slot)
            .collect();
        let points = engine.store().points();
        rows.sort_by(|a, b| points[*b].x.abs().total_cmp(&points[*a].x.abs()));
        rows
    }

    fn rows(&mut self, engine: &VolcanoEngine) -> &[usize] {
        if self.rows.is_none() {
            self.rows = Some(self.filtered_rows(engine));
        }
        self.rows.as_deref().unwrap_or(&[])
    }
}

struct GeneDelegate<'a> {
    rows: &'a [usize],
    points: &'a [Point],
    selection: &'a Selection,
    form: &'a StatsForm,
    toggled: &'a mut Option<String>,
}

impl TableDelegate for GeneDelegate<'_> {
    fn header_cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::HeaderCellInfo) {
        let text = match cell.col_range.start {
            0 => "",
            1 => "Gene",
            2 => "log2FC",
            3 => "padj",
            4 => "Regulation",
            _ => "",
        };
        ui.add_space(4.0);
        ui.strong(text);
    }

    fn cell_ui(&mut self, ui: &mut egui::Ui, cell: &egui_table::CellInfo) {
        let Some(p) = self.rows.get(cell.row_nr as usize).and_then(|s| self.points.get(*s)) else {
            return;
        };
        ui.add_space(4.0);
        match cell.col_nr {
            0 => {
                let mut checked = self.selection.is_point_selected(&p.gene);
                if ui.checkbox(&mut checked, "").changed() {
                    *self.toggled = Some(p.gene.clone());
                }
            }
            1 => {
                ui.add(egui::Label::new(&p.gene).truncate().show_tooltip_when_elided(true));
            }
            2 => {
                ui.label(format!("{:.3}", p.x));
            }
            3 => {
                ui.label(format!("{:.3e}", 10f64.powf(-p.y)));
            }
            4 => {
                let reg = self.form.classify(p);
                let text = egui::RichText::new(reg.to_string());
                match self.form.color(reg) {
                    Some(c) => ui.label(text.color(c)),
                    None => ui.label(text),
                };
            }
            _ => {}
        }
    }
}

impl VolcanoApp {
    pub(super) fn gene_table(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui_phosphor::regular::MAGNIFYING_GLASS);
            if ui.text_edit_singleline(&mut self.table.search).changed() {
                self.table.invalidate();
            }
            let before = self.table.filter;
            egui::ComboBox::from_id_salt("gene_table_filter")
                .selected_text(self.table.filter.label())
                .show_ui(ui, |ui| {
                    for f in RowFilter::ALL {
                        ui.selectable_value(&mut self.table.filter, f, f.label());
                    }
                });
            if self.table.filter != before {
                self.table.invalidate();
            }
        });
        ui.separator();

        let rows = self.table.rows(&self.engine).to_vec();
        ui.label(format!("{} genes", rows.len()));
        let mut toggled = None;
        let mut delegate = GeneDelegate {
            rows: &rows,
            points: self.engine.store().points(),
            selection: self.engine.active_selection(),
            form: self.engine.stats(),
            toggled: &mut toggled,
        };
        let cols = vec![
            egui_table::Column::new(28.0),
            egui_table::Column::new(160.0),
            egui_table::Column::new(90.0),
            egui_table::Column::new(100.0),
            egui_table::Column::new(100.0),
        ];
        let avail = ui.available_size();
        let (rect, _) = ui.allocate_exact_size(avail, egui::Sense::hover());
        let mut table_ui = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(rect)
                .layout(egui::Layout::left_to_right(egui::Align::Min)),
        );
        Table::new()
            .id_salt("volcano_gene_table")
            .num_rows(rows.len() as u64)
            .columns(cols)
            .headers(vec![HeaderRow::new(24.0)])
            .show(&mut table_ui, &mut delegate);

        // Shift toggles a single gene without touching the rest.
        if let Some(gene) = toggled {
            let fx = self.engine.on_point_click(&gene, Modifiers::SHIFT);
            self.handle_effects(fx);
        }
    }
}
