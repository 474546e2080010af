//! Enrichment-analysis boundary.
//!
//! The engine never talks to an enrichment backend directly. It hands out a
//! [`TermRequest`] for every lookup; the caller runs it against an
//! [`EnrichmentService`] and feeds the outcome back. Starting a new lookup
//! aborts the previous one, and any result that still arrives for a
//! superseded ticket is discarded by the engine.

use std::collections::HashMap;
use std::fmt;

use futures::future::{AbortHandle, AbortRegistration, Abortable, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("term lookup was cancelled")]
    Cancelled,
    #[error("unknown term '{0}'")]
    UnknownTerm(String),
    #[error("enrichment service error: {0}")]
    Service(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundKind {
    Pathway,
    Ontology,
}

/// Enrichr gene-set libraries offered for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnrichrBackground {
    #[serde(rename = "Reactome_2022")]
    Reactome2022,
    #[serde(rename = "BioCarta_2016")]
    BioCarta2016,
    #[serde(rename = "KEGG_2021_Human")]
    Kegg2021Human,
    #[serde(rename = "MSigDB_Hallmark_2020")]
    MsigdbHallmark2020,
    #[default]
    #[serde(rename = "GO_Biological_Process_2023")]
    GoBiologicalProcess2023,
    #[serde(rename = "GO_Cellular_Component_2023")]
    GoCellularComponent2023,
    #[serde(rename = "GO_Molecular_Function_2023")]
    GoMolecularFunction2023,
}

impl EnrichrBackground {
    pub const ALL: [EnrichrBackground; 7] = [
        EnrichrBackground::Reactome2022,
        EnrichrBackground::BioCarta2016,
        EnrichrBackground::Kegg2021Human,
        EnrichrBackground::MsigdbHallmark2020,
        EnrichrBackground::GoBiologicalProcess2023,
        EnrichrBackground::GoCellularComponent2023,
        EnrichrBackground::GoMolecularFunction2023,
    ];

    /// Library identifier as the Enrichr API expects it.
    pub fn library_name(self) -> &'static str {
        match self {
            EnrichrBackground::Reactome2022 => "Reactome_2022",
            EnrichrBackground::BioCarta2016 => "BioCarta_2016",
            EnrichrBackground::Kegg2021Human => "KEGG_2021_Human",
            EnrichrBackground::MsigdbHallmark2020 => "MSigDB_Hallmark_2020",
            EnrichrBackground::GoBiologicalProcess2023 => "GO_Biological_Process_2023",
            EnrichrBackground::GoCellularComponent2023 => "GO_Cellular_Component_2023",
            EnrichrBackground::GoMolecularFunction2023 => "GO_Molecular_Function_2023",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnrichrBackground::Reactome2022 => "Reactome 2022",
            EnrichrBackground::BioCarta2016 => "BioCarta 2016",
            EnrichrBackground::Kegg2021Human => "KEGG 2021 Human",
            EnrichrBackground::MsigdbHallmark2020 => "MSigDB Hallmark 2020",
            EnrichrBackground::GoBiologicalProcess2023 => "GO Biological Process 2023",
            EnrichrBackground::GoCellularComponent2023 => "GO Cellular Component 2023",
            EnrichrBackground::GoMolecularFunction2023 => "GO Molecular Function 2023",
        }
    }

    pub fn kind(self) -> BackgroundKind {
        match self {
            EnrichrBackground::GoBiologicalProcess2023
            | EnrichrBackground::GoCellularComponent2023
            | EnrichrBackground::GoMolecularFunction2023 => BackgroundKind::Ontology,
            _ => BackgroundKind::Pathway,
        }
    }
}

impl fmt::Display for EnrichrBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.library_name())
    }
}

/// One ranked row of an enrichment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentTerm {
    pub index: usize,
    pub term: String,
    pub p_value: f64,
    pub odds_ratio: f64,
    pub combined_score: f64,
    pub overlapping_genes: Vec<String>,
    pub adj_p_value: f64,
}

/// Source of gene lists for enrichment terms.
pub trait EnrichmentService: Send + Sync {
    fn genes_by_term(
        &self,
        background: EnrichrBackground,
        term: &str,
    ) -> BoxFuture<'static, Result<Vec<String>, EnrichmentError>>;
}

/// Identifies one lookup; only the newest ticket is ever applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupTicket(u64);

/// Tracks the single in-flight term lookup.
#[derive(Debug, Default)]
pub struct TermLookup {
    generation: u64,
    abort: Option<AbortHandle>,
}

impl TermLookup {
    /// Start a lookup, aborting whatever was in flight.
    pub fn begin(&mut self) -> (LookupTicket, AbortRegistration) {
        self.cancel();
        self.generation += 1;
        let (handle, registration) = AbortHandle::new_pair();
        self.abort = Some(handle);
        (LookupTicket(self.generation), registration)
    }

    /// Abort the in-flight lookup, if any, and invalidate its ticket.
    pub fn cancel(&mut self) {
        if let Some(h) = self.abort.take() {
            h.abort();
            self.generation += 1;
        }
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.abort.is_some() && ticket.0 == self.generation
    }

    /// Mark `ticket` as done. Returns false for a stale ticket.
    pub fn finish(&mut self, ticket: LookupTicket) -> bool {
        if self.is_current(ticket) {
            self.abort = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.abort.is_some()
    }
}

/// Result of a term lookup, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct TermOutcome {
    pub ticket: LookupTicket,
    pub term: String,
    pub result: Result<Vec<String>, EnrichmentError>,
}

/// A pending lookup, ready to be run against a service.
#[derive(Debug)]
pub struct TermRequest {
    pub ticket: LookupTicket,
    pub background: EnrichrBackground,
    pub term: String,
    registration: AbortRegistration,
}

impl TermRequest {
    pub(crate) fn new(
        ticket: LookupTicket,
        background: EnrichrBackground,
        term: String,
        registration: AbortRegistration,
    ) -> Self {
        Self {
            ticket,
            background,
            term,
            registration,
        }
    }

    /// Resolve against `service`. The result is `Cancelled` if a newer
    /// lookup started first.
    pub async fn run(self, service: &dyn EnrichmentService) -> TermOutcome {
        let fut = service.genes_by_term(self.background, &self.term);
        let result = match Abortable::new(fut, self.registration).await {
            Ok(r) => r,
            Err(_aborted) => Err(EnrichmentError::Cancelled),
        };
        TermOutcome {
            ticket: self.ticket,
            term: self.term,
            result,
        }
    }
}

/// In-memory service: term name -> genes, for any background.
#[derive(Debug, Clone, Default)]
pub struct StaticEnrichment {
    terms: HashMap<String, Vec<String>>,
}

impl StaticEnrichment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term<I, S>(mut self, term: &str, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(term, genes);
        self
    }

    pub fn insert<I, S>(&mut self, term: &str, genes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms
            .insert(term.to_string(), genes.into_iter().map(Into::into).collect());
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Rank the stored terms against a gene list, most overlapping first.
    pub fn rank(&self, genes: &[String]) -> Vec<EnrichmentTerm> {
        let mut rows: Vec<(&String, Vec<String>, usize)> = self
            .terms
            .iter()
            .map(|(term, members)| {
                let overlap: Vec<String> = members.iter().filter(|g| genes.contains(g)).cloned().collect();
                (term, overlap, members.len())
            })
            .filter(|(_, overlap, _)| !overlap.is_empty())
            .collect();
        rows.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
        rows.into_iter()
            .enumerate()
            .map(|(i, (term, overlap, size))| {
                let ratio = overlap.len() as f64 / size.max(1) as f64;
                let p = (1.0 - ratio).max(f64::MIN_POSITIVE);
                EnrichmentTerm {
                    index: i,
                    term: term.clone(),
                    p_value: p,
                    odds_ratio: ratio / (1.0 - ratio).max(1e-9),
                    combined_score: -p.ln() * ratio,
                    overlapping_genes: overlap,
                    adj_p_value: (p * (i + 1) as f64).min(1.0),
                }
            })
            .collect()
    }
}

impl EnrichmentService for StaticEnrichment {
    fn genes_by_term(
        &self,
        _background: EnrichrBackground,
        term: &str,
    ) -> BoxFuture<'static, Result<Vec<String>, EnrichmentError>> {
        let result = self
            .terms
            .get(term)
            .cloned()
            .ok_or_else(|| EnrichmentError::UnknownTerm(term.to_string()));
        futures::future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lookup_invalidates_previous_ticket() {
        let mut lookup = TermLookup::default();
        let (a, _) = lookup.begin();
        let (b, _) = lookup.begin();
        assert!(!lookup.is_current(a));
        assert!(lookup.is_current(b));
        assert!(lookup.finish(b));
        assert!(!lookup.in_flight());
    }

    #[test]
    fn background_catalogue() {
        assert_eq!(EnrichrBackground::ALL.len(), 7);
        assert_eq!(EnrichrBackground::Kegg2021Human.library_name(), "KEGG_2021_Human");
        assert_eq!(EnrichrBackground::GoMolecularFunction2023.kind(), BackgroundKind::Ontology);
        assert_eq!(EnrichrBackground::BioCarta2016.kind(), BackgroundKind::Pathway);
    }

    #[test]
    fn static_rank_orders_by_overlap() {
        let svc = StaticEnrichment::new()
            .with_term("small", ["A"])
            .with_term("big", ["A", "B", "C"]);
        let genes = vec!["A".to_string(), "B".to_string()];
        let ranked = svc.rank(&genes);
        assert_eq!(ranked[0].term, "big");
        assert_eq!(ranked[0].overlapping_genes, vec!["A", "B"]);
        assert_eq!(ranked[1].index, 1);
    }
}
