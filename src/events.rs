//! Event system for the volcano plot.
//!
//! Callers subscribe via [`EventController`]. Each event carries a set of
//! [`EventKind`] flags so that a single occurrence can match multiple
//! categories (e.g. a term application is *also* a `SELECTION_CHANGED`).
//!
//! Subscribers pass an [`EventFilter`] and get every event that shares at
//! least one kind bit with it.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::data::regulation::StatsForm;
use crate::data::selection::{SelectionTrigger, SelectionType};
use crate::interaction::InteractionMode;

/// Kind bits of an event; one event may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u64);

impl EventKind {
    // selection
    /// The selected set of a selection changed (click, drag, bulk call).
    pub const SELECTION_CHANGED: Self = Self(1 << 0);
    /// The labelled set changed.
    pub const LABELS_CHANGED: Self = Self(1 << 1);
    /// A different selection type became active.
    pub const ACTIVE_SELECTION_CHANGED: Self = Self(1 << 2);

    // interaction
    /// Switched between select and pan/zoom.
    pub const MODE_CHANGED: Self = Self(1 << 3);
    /// The pointer entered a point.
    pub const HOVER: Self = Self(1 << 4);

    // zoom / view
    pub const ZOOM: Self = Self(1 << 5);
    pub const PAN: Self = Self(1 << 6);
    /// Zoom and pan were reset to identity.
    pub const VIEW_RESET: Self = Self(1 << 7);

    // data
    /// A new dataset replaced the point store.
    pub const DATA_LOADED: Self = Self(1 << 8);
    /// The select-by-stats form changed.
    pub const THRESHOLDS_CHANGED: Self = Self(1 << 9);
    /// Genes of an enrichment term were applied to the GO term selection.
    pub const TERM_APPLIED: Self = Self(1 << 10);

    /// Matches every kind.
    pub const ALL: Self = Self(u64::MAX);

    const NAMED: [(Self, &'static str); 11] = [
        (Self::SELECTION_CHANGED, "SELECTION_CHANGED"),
        (Self::LABELS_CHANGED, "LABELS_CHANGED"),
        (Self::ACTIVE_SELECTION_CHANGED, "ACTIVE_SELECTION_CHANGED"),
        (Self::MODE_CHANGED, "MODE_CHANGED"),
        (Self::HOVER, "HOVER"),
        (Self::ZOOM, "ZOOM"),
        (Self::PAN, "PAN"),
        (Self::VIEW_RESET, "VIEW_RESET"),
        (Self::DATA_LOADED, "DATA_LOADED"),
        (Self::THRESHOLDS_CHANGED, "THRESHOLDS_CHANGED"),
        (Self::TERM_APPLIED, "TERM_APPLIED"),
    ];

    /// All bits of `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one bit is shared.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventKind {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        EventKind(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventKind {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAnd for EventKind {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        EventKind(self.0 & rhs.0)
    }
}

/// `A|B` for named bits, unknown bits as a trailing hex mask.
impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            k if k.is_empty() => return f.write_str("EMPTY"),
            EventKind::ALL => return f.write_str("ALL"),
            _ => {}
        }
        let mut rest = self.0;
        let mut parts: Vec<String> = Vec::new();
        for (kind, name) in Self::NAMED.iter().filter(|(k, _)| self.contains(*k)) {
            rest &= !kind.0;
            parts.push((*name).to_owned());
        }
        if rest != 0 {
            parts.push(format!("0x{:x}", rest));
        }
        f.write_str(&parts.join("|"))
    }
}

/// State of one selection after a change.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMeta {
    pub selection: SelectionType,
    pub trigger: SelectionTrigger,
    /// Selected genes sorted by descending `|log2FoldChange|`.
    pub genes: Vec<String>,
    pub labelled: Vec<String>,
}

/// Zoom transform and the visible domain after a view change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMeta {
    pub k: f64,
    pub tx: f64,
    pub ty: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataMeta {
    pub points: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermMeta {
    pub term: String,
    pub genes: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone)]
pub struct VolcanoEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created; set on emit.
    pub timestamp: f64,

    pub selection: Option<SelectionMeta>,
    pub active: Option<SelectionType>,
    pub mode: Option<InteractionMode>,
    pub view: Option<ViewMeta>,
    pub data: Option<DataMeta>,
    pub thresholds: Option<StatsForm>,
    pub term: Option<TermMeta>,
    pub hovered: Option<String>,
}

impl VolcanoEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            selection: None,
            active: None,
            mode: None,
            view: None,
            data: None,
            thresholds: None,
            term: None,
            hovered: None,
        }
    }
}

/// OR mask over [`EventKind`]: an event passes when it shares any bit.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self::only(EventKind::ALL)
    }

    pub const fn only(mask: EventKind) -> Self {
        EventFilter { mask }
    }

    pub fn matches(&self, event: &VolcanoEvent) -> bool {
        self.mask.intersects(event.kinds)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

struct Bus {
    listeners: Vec<(EventFilter, Sender<VolcanoEvent>)>,
    created: Instant,
}

/// Clone-able handle; all clones share one subscriber list.
#[derive(Clone)]
pub struct EventController {
    bus: Arc<Mutex<Bus>>,
}

impl EventController {
    pub fn new() -> Self {
        let bus = Bus {
            listeners: Vec::new(),
            created: Instant::now(),
        };
        EventController {
            bus: Arc::new(Mutex::new(bus)),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<VolcanoEvent> {
        let (tx, rx) = mpsc::channel();
        self.bus.lock().unwrap().listeners.push((filter, tx));
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<VolcanoEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Stamp and deliver `event`. A listener whose receiver is gone is
    /// dropped the first time an event matches it.
    pub fn emit(&self, mut event: VolcanoEvent) {
        let mut bus = self.bus.lock().unwrap();
        event.timestamp = bus.created.elapsed().as_secs_f64();
        bus.listeners
            .retain(|(filter, tx)| !filter.matches(&event) || tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.lock().unwrap().listeners.len()
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}
