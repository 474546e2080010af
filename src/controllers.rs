//! Controllers for driving the plot from external code.
//!
//! A [`SelectionController`] is a cheap, clone-able handle. Requests pushed
//! through it are queued and applied by the engine in FIFO order on the UI
//! thread; listeners receive a [`SelectionInfo`] snapshot afterwards.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::data::selection::SelectionType;
use crate::interaction::InteractionMode;

/// A queued programmatic request.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionRequest {
    SelectGenes { genes: Vec<String>, label: bool },
    LabelGenes(Vec<String>),
    Clear,
    SelectAll,
    SelectByStats,
    SetActiveType(SelectionType),
    /// Parsed when applied; unknown names are logged and skipped.
    SetActiveTypeNamed(String),
    SetMode(InteractionMode),
    ResetView,
    UpdateStatsField { field: String, value: f64 },
}

/// Snapshot published after requests are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub active: SelectionType,
    pub mode: InteractionMode,
    /// Selected genes of the active selection, by descending |log2FC|.
    pub selected_genes: Vec<String>,
    pub labelled_genes: Vec<String>,
}

#[derive(Clone)]
pub struct SelectionController {
    pub(crate) inner: Arc<Mutex<SelectionCtrlInner>>,
}

pub(crate) struct SelectionCtrlInner {
    pub(crate) requests: VecDeque<SelectionRequest>,
    pub(crate) listeners: Vec<Sender<SelectionInfo>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SelectionCtrlInner {
                requests: VecDeque::new(),
                listeners: Vec::new(),
            })),
        }
    }

    fn push(&self, req: SelectionRequest) {
        self.inner.lock().unwrap().requests.push_back(req);
    }

    /// Replace the active selection with `genes`, optionally labelling them.
    pub fn select_genes<S: Into<String>>(&self, genes: impl IntoIterator<Item = S>, label: bool) {
        self.push(SelectionRequest::SelectGenes {
            genes: genes.into_iter().map(Into::into).collect(),
            label,
        });
    }

    pub fn label_genes<S: Into<String>>(&self, genes: impl IntoIterator<Item = S>) {
        self.push(SelectionRequest::LabelGenes(genes.into_iter().map(Into::into).collect()));
    }

    pub fn clear(&self) {
        self.push(SelectionRequest::Clear);
    }

    pub fn select_all(&self) {
        self.push(SelectionRequest::SelectAll);
    }

    pub fn select_by_stats(&self) {
        self.push(SelectionRequest::SelectByStats);
    }

    pub fn set_active_type(&self, kind: SelectionType) {
        self.push(SelectionRequest::SetActiveType(kind));
    }

    pub fn set_active_type_named(&self, name: &str) {
        self.push(SelectionRequest::SetActiveTypeNamed(name.to_string()));
    }

    pub fn set_mode(&self, mode: InteractionMode) {
        self.push(SelectionRequest::SetMode(mode));
    }

    pub fn reset_view(&self) {
        self.push(SelectionRequest::ResetView);
    }

    pub fn update_stats_field(&self, field: &str, value: f64) {
        self.push(SelectionRequest::UpdateStatsField {
            field: field.to_string(),
            value,
        });
    }

    /// Subscribe to snapshots published after each applied batch.
    pub fn subscribe(&self) -> Receiver<SelectionInfo> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.inner.lock().unwrap().listeners.push(tx);
        rx
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    pub(crate) fn take_requests(&self) -> Vec<SelectionRequest> {
        self.inner.lock().unwrap().requests.drain(..).collect()
    }

    pub(crate) fn publish(&self, info: SelectionInfo) {
        let mut inner = self.inner.lock().unwrap();
        inner.listeners.retain(|s| s.send(info.clone()).is_ok());
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}
