//! Selections over a shared [`PointStore`].
//!
//! Two selection types exist side by side: `Standard` (the user's working
//! selection) and `GOTerm` (genes of an enrichment term). Both reference the
//! same store; each keeps its own per-slot flags, so selecting in one never
//! touches the other.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use egui::Color32;
use serde::{Deserialize, Serialize};

use super::points::{Point, PointStore};
use crate::error::VolcanoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionType {
    Standard,
    #[serde(rename = "GOTerm")]
    GoTerm,
}

impl SelectionType {
    pub const ALL: [SelectionType; 2] = [SelectionType::Standard, SelectionType::GoTerm];

    /// Position in per-type arrays.
    pub fn index(self) -> usize {
        match self {
            SelectionType::Standard => 0,
            SelectionType::GoTerm => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionType::Standard => "Standard",
            SelectionType::GoTerm => "GO term",
        }
    }
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionType::Standard => write!(f, "Standard"),
            SelectionType::GoTerm => write!(f, "GOTerm"),
        }
    }
}

impl FromStr for SelectionType {
    type Err = VolcanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Standard" | "standard" => Ok(SelectionType::Standard),
            "GOTerm" | "GoTerm" | "goterm" | "go_term" => Ok(SelectionType::GoTerm),
            other => Err(VolcanoError::UnknownSelectionType(other.to_string())),
        }
    }
}

/// What caused the most recent change of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionTrigger {
    #[default]
    Init,
    Click,
    Drag,
    SelectByStats,
    #[serde(rename = "GOTermTab")]
    GoTermTab,
    EnrichmentAnalysisTab,
    /// Bulk calls made through the engine API or a controller.
    Programmatic,
}

/// Per-type visual and behavioural configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub opacity: f32,
    pub opacity_hover: f32,
    pub opacity_selected: f32,
    pub color_selected: Color32,
    pub color_unselected: Color32,
    /// Colour selected points by regulation instead of `color_selected`.
    pub use_select_by_stat_color_logic: bool,
    pub disable_mouse_selection: bool,
    pub disable_tooltip: bool,
    /// Selecting a point also labels it.
    pub label_on_selection: bool,
    /// Hover colouring borrows another type's selected colour.
    pub defer_interactive_coloring_to: Option<SelectionType>,
}

impl SelectionConfig {
    pub fn standard() -> Self {
        Self {
            opacity: 0.2,
            opacity_hover: 0.5,
            opacity_selected: 1.0,
            color_selected: Color32::BLACK,
            color_unselected: Color32::from_rgb(0x45, 0x44, 0x44),
            use_select_by_stat_color_logic: true,
            disable_mouse_selection: false,
            disable_tooltip: false,
            label_on_selection: false,
            defer_interactive_coloring_to: None,
        }
    }

    pub fn go_term() -> Self {
        Self {
            color_selected: Color32::BLUE,
            use_select_by_stat_color_logic: false,
            disable_mouse_selection: true,
            defer_interactive_coloring_to: Some(SelectionType::Standard),
            ..Self::standard()
        }
    }

    pub fn for_type(kind: SelectionType) -> Self {
        match kind {
            SelectionType::Standard => Self::standard(),
            SelectionType::GoTerm => Self::go_term(),
        }
    }
}

/// Flags a selection keeps for one arena slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointFlags {
    pub selected: bool,
    pub labelled: bool,
    pub part_of_selection_overlap: bool,
}

pub struct Selection {
    kind: SelectionType,
    pub trigger: SelectionTrigger,
    config: SelectionConfig,
    store: Arc<PointStore>,
    flags: Vec<PointFlags>,
    /// Display order of slots; `sort_selection` permutes it.
    order: Vec<usize>,
    fill_overrides: HashMap<usize, Color32>,
}

impl Selection {
    pub fn new(kind: SelectionType, store: Arc<PointStore>) -> Self {
        Self::with_config(kind, SelectionConfig::for_type(kind), store)
    }

    pub fn with_config(kind: SelectionType, config: SelectionConfig, store: Arc<PointStore>) -> Self {
        let n = store.len();
        Self {
            kind,
            trigger: SelectionTrigger::Init,
            config,
            store,
            flags: vec![PointFlags::default(); n],
            order: (0..n).collect(),
            fill_overrides: HashMap::new(),
        }
    }

    pub fn kind(&self) -> SelectionType {
        self.kind
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SelectionConfig {
        &mut self.config
    }

    pub fn store(&self) -> &Arc<PointStore> {
        &self.store
    }

    /// Point to a new store. Flags of genes present in both stores survive;
    /// everything else starts unflagged.
    pub fn reset_data(&mut self, store: Arc<PointStore>) {
        let mut flags = vec![PointFlags::default(); store.len()];
        let mut fills = HashMap::new();
        for (old_slot, f) in self.flags.iter().enumerate() {
            let Some(p) = self.store.get(old_slot) else { continue };
            if let Some(new_slot) = store.slot_of(&p.gene) {
                flags[new_slot] = *f;
                if let Some(c) = self.fill_overrides.get(&old_slot) {
                    fills.insert(new_slot, *c);
                }
            }
        }
        self.order = (0..store.len()).collect();
        self.flags = flags;
        self.fill_overrides = fills;
        self.store = store;
    }

    pub fn flags(&self, slot: usize) -> PointFlags {
        self.flags.get(slot).copied().unwrap_or_default()
    }

    pub fn fill_override(&self, slot: usize) -> Option<Color32> {
        self.fill_overrides.get(&slot).copied()
    }

    pub fn is_slot_selected(&self, slot: usize) -> bool {
        self.flags(slot).selected
    }

    pub fn is_point_selected(&self, gene: &str) -> bool {
        self.store.slot_of(gene).is_some_and(|s| self.flags[s].selected)
    }

    pub fn is_point_labelled(&self, gene: &str) -> bool {
        self.store.slot_of(gene).is_some_and(|s| self.flags[s].labelled)
    }

    /// Set the selected flag of one slot. Returns whether it changed.
    pub(crate) fn set_slot_selected(&mut self, slot: usize, selected: bool) -> bool {
        let label = self.config.label_on_selection;
        match self.flags.get_mut(slot) {
            Some(f) if f.selected != selected => {
                f.selected = selected;
                if selected && label {
                    f.labelled = true;
                }
                if !selected {
                    self.fill_overrides.remove(&slot);
                }
                true
            }
            _ => false,
        }
    }

    /// Select one gene. Unknown genes are ignored.
    pub fn select_single_point(&mut self, gene: &str) -> bool {
        match self.store.slot_of(gene) {
            Some(slot) => self.set_slot_selected(slot, true),
            None => false,
        }
    }

    pub fn deselect_single_point(&mut self, gene: &str) -> bool {
        match self.store.slot_of(gene) {
            Some(slot) => self.set_slot_selected(slot, false),
            None => false,
        }
    }

    /// Replace the selection with exactly `points`.
    pub fn select_points<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let genes: Vec<String> = points.into_iter().map(|p| p.gene.clone()).collect();
        self.select_points_by_gene_name(&genes);
    }

    /// Replace the selection with exactly the named genes that exist in the
    /// store. Returns the number of selected points.
    pub fn select_points_by_gene_name<S: AsRef<str>>(&mut self, genes: &[S]) -> usize {
        self.deselect_all();
        let mut count = 0;
        for g in genes {
            if let Some(slot) = self.store.slot_of(g.as_ref()) {
                if self.set_slot_selected(slot, true) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Like [`select_points_by_gene_name`](Self::select_points_by_gene_name)
    /// but paints the selected genes with `fill` until they are deselected.
    pub fn select_points_with_fill<S: AsRef<str>>(&mut self, genes: &[S], fill: Color32) -> usize {
        let count = self.select_points_by_gene_name(genes);
        for g in genes {
            if let Some(slot) = self.store.slot_of(g.as_ref()) {
                self.fill_overrides.insert(slot, fill);
            }
        }
        count
    }

    pub fn deselect_all(&mut self) {
        for f in &mut self.flags {
            f.selected = false;
        }
        self.fill_overrides.clear();
    }

    pub fn select_all(&mut self) {
        for slot in 0..self.flags.len() {
            self.set_slot_selected(slot, true);
        }
    }

    pub fn label_single_point(&mut self, gene: &str) -> bool {
        self.set_label(gene, true)
    }

    pub fn unlabel_single_point(&mut self, gene: &str) -> bool {
        self.set_label(gene, false)
    }

    fn set_label(&mut self, gene: &str, labelled: bool) -> bool {
        match self.store.slot_of(gene).and_then(|s| self.flags.get_mut(s)) {
            Some(f) if f.labelled != labelled => {
                f.labelled = labelled;
                true
            }
            _ => false,
        }
    }

    /// Replace the labelled set with exactly `points`.
    pub fn label_points<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let genes: Vec<String> = points.into_iter().map(|p| p.gene.clone()).collect();
        self.label_points_by_gene_name(&genes);
    }

    pub fn label_points_by_gene_name<S: AsRef<str>>(&mut self, genes: &[S]) {
        self.unlabel_all();
        for g in genes {
            self.set_label(g.as_ref(), true);
        }
    }

    pub fn unlabel_all(&mut self) {
        for f in &mut self.flags {
            f.labelled = false;
        }
    }

    /// Flag exactly the named genes as part of the overlap with another
    /// selection. Previous marks are cleared first.
    pub fn mark_points_as_overlapping<S: AsRef<str>>(&mut self, genes: &[S]) {
        for f in &mut self.flags {
            f.part_of_selection_overlap = false;
        }
        for g in genes {
            if let Some(slot) = self.store.slot_of(g.as_ref()) {
                self.flags[slot].part_of_selection_overlap = true;
            }
        }
    }

    /// Genes selected both here and in `other`, in this selection's order.
    pub fn intersection(&self, other: &Selection) -> Vec<&Point> {
        self.selected_points()
            .into_iter()
            .filter(|p| other.is_point_selected(&p.gene))
            .collect()
    }

    /// Reorder the display order of points.
    pub fn sort_selection<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&Point, &Point) -> Ordering,
    {
        let store = &self.store;
        self.order.sort_by(|a, b| match (store.get(*a), store.get(*b)) {
            (Some(pa), Some(pb)) => cmp(pa, pb),
            _ => Ordering::Equal,
        });
    }

    /// All points with their flags, in display order.
    pub fn points(&self) -> impl Iterator<Item = (usize, &Point, PointFlags)> + '_ {
        self.order
            .iter()
            .filter_map(move |&slot| self.store.get(slot).map(|p| (slot, p, self.flags[slot])))
    }

    pub fn selected_points(&self) -> Vec<&Point> {
        self.points().filter(|(_, _, f)| f.selected).map(|(_, p, _)| p).collect()
    }

    pub fn labelled_points(&self) -> Vec<&Point> {
        self.points().filter(|(_, _, f)| f.labelled).map(|(_, p, _)| p).collect()
    }

    pub fn selected_slots(&self) -> HashSet<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| f.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().filter(|f| f.selected).count()
    }

    pub fn has_selection(&self) -> bool {
        self.flags.iter().any(|f| f.selected)
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("kind", &self.kind)
            .field("trigger", &self.trigger)
            .field("points", &self.store.len())
            .field("selected", &self.selected_count())
            .finish()
    }
}
