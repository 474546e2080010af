//! Volcano crate root: re-exports and module wiring.
//!
//! An interactive volcano plot for differential expression results. Each
//! gene is a point at `(log2 fold change, -log10 padj)`. Two independent
//! selections (standard and GO term) share one point store, and a
//! zoomable coordinate mapper translates between data and screen space.
//!
//! - `data`: point store, selections, regulation thresholds, mapper, styles
//! - `interaction`: click, drag, hover and tooltip state machine
//! - `engine`: the composition root that owns all state and batches notifications
//! - `events` / `controllers`: observing and driving the plot from outside
//! - `enrichment` / `jobs`: boundaries to the gene-set service and the job runner
//! - `config`: persisted settings and launcher options
//! - `app`: the egui/eframe front end

pub mod app;
pub mod config;
pub mod controllers;
pub mod data;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod events;
pub mod interaction;
pub mod jobs;

// Public re-exports for a compact external API
pub use app::{run_volcano, VolcanoApp};
pub use config::{FeatureFlags, PlotSettings, VolcanoConfig};
pub use controllers::{SelectionController, SelectionInfo};
pub use data::mapper::{CoordinateMapper, PlotLayout, ZoomTransform};
pub use data::points::{Point, PointStore, RawSeries};
pub use data::regulation::{Regulation, StatsForm};
pub use data::selection::{Selection, SelectionTrigger, SelectionType};
pub use engine::{SelectOptions, VolcanoEngine};
pub use enrichment::{EnrichmentService, EnrichmentTerm, EnrichrBackground, StaticEnrichment};
pub use error::{Result, VolcanoError};
pub use events::{EventController, EventFilter, EventKind, VolcanoEvent};
pub use interaction::{InteractionMode, Modifiers, PointerButton};
pub use jobs::{JobRequest, JobRunner, StepResponse, StepResult, StepResultType};
