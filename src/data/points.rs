//! Point store: the per-dataset list of plotted genes.
//!
//! A [`PointStore`] is built once from a [`RawSeries`] and never mutated
//! afterwards. Per-point flags (selected, labelled, overlap) are owned by the
//! selections, which index into the store by arena slot. Identity is always
//! the gene name; slots are only stable within one store.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Result, VolcanoError};

/// A single plotted gene in domain space.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Gene name, unique within a store.
    pub gene: String,
    /// log2 fold change.
    pub x: f64,
    /// -log10 of the adjusted p-value.
    pub y: f64,
}

/// Raw differential-expression output keyed by gene name.
///
/// Behaves like an insertion-ordered map: re-inserting a gene keeps its
/// original position but overwrites both values (last wins).
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    order: Vec<String>,
    fold_change: HashMap<String, Option<f64>>,
    padj: HashMap<String, Option<f64>>,
}

impl RawSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) the values for `gene`.
    pub fn insert<S: Into<String>>(&mut self, gene: S, log2_fold_change: Option<f64>, padj: Option<f64>) {
        let gene = gene.into();
        if !self.fold_change.contains_key(&gene) {
            self.order.push(gene.clone());
        }
        self.fold_change.insert(gene.clone(), log2_fold_change);
        self.padj.insert(gene, padj);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Gene names in insertion order.
    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|g| g.as_str())
    }

    /// Values for `gene` as `(log2_fold_change, padj)`.
    pub fn get(&self, gene: &str) -> Option<(Option<f64>, Option<f64>)> {
        let fc = self.fold_change.get(gene)?;
        let p = self.padj.get(gene).copied().flatten();
        Some((*fc, p))
    }

    /// Decode the `volcanoData` payload produced by the differential
    /// expression job.
    ///
    /// The payload is a column dictionary (`{column: {row: value}}`). When a
    /// `geneID` column is present rows are joined on the row key and named by
    /// it; otherwise the row keys of `log2FoldChange` are the gene names.
    /// Missing or non-numeric cells decode as `None` and are dropped later by
    /// [`PointStore::load`].
    pub fn from_volcano_data(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| VolcanoError::Dataset("expected a JSON object of columns".into()))?;
        let column = |name: &str| -> Result<&serde_json::Map<String, Value>> {
            obj.get(name)
                .and_then(Value::as_object)
                .ok_or_else(|| VolcanoError::Dataset(format!("missing column '{}'", name)))
        };
        let fc = column("log2FoldChange")?;
        let padj = column("padj")?;
        let gene_ids = obj.get("geneID").and_then(Value::as_object);

        let mut series = RawSeries::new();
        for (row, fc_val) in fc.iter() {
            let gene = match gene_ids {
                Some(ids) => match ids.get(row) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => continue,
                },
                None => row.clone(),
            };
            series.insert(gene, fc_val.as_f64(), padj.get(row).and_then(Value::as_f64));
        }
        Ok(series)
    }
}

/// Domain extent of a store: `(min, max)` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Arena of plotted points with an O(1) gene index.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<Point>,
    index: HashMap<String, usize>,
    dropped: usize,
}

impl PointStore {
    /// Build a store from raw series data.
    ///
    /// `y = -log10(padj)`; genes whose x or y is missing, NaN or infinite are
    /// dropped (padj = 0 is the common case).
    pub fn load(raw: &RawSeries) -> Self {
        let mut points = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());
        let mut dropped = 0usize;
        for gene in raw.genes() {
            let (x, padj) = match raw.get(gene) {
                Some(v) => v,
                None => continue,
            };
            let x = x.filter(|v| v.is_finite());
            let y = padj.map(|p| -p.log10()).filter(|v| v.is_finite());
            match (x, y) {
                (Some(x), Some(y)) => {
                    index.insert(gene.to_string(), points.len());
                    points.push(Point {
                        gene: gene.to_string(),
                        x,
                        y,
                    });
                }
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!("dropped {} of {} genes with non-finite coordinates", dropped, raw.len());
        }
        Self {
            points,
            index,
            dropped,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of input rows discarded during [`load`](Self::load).
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn get(&self, slot: usize) -> Option<&Point> {
        self.points.get(slot)
    }

    pub fn slot_of(&self, gene: &str) -> Option<usize> {
        self.index.get(gene).copied()
    }

    pub fn by_gene(&self, gene: &str) -> Option<&Point> {
        self.slot_of(gene).and_then(|i| self.points.get(i))
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.index.contains_key(gene)
    }

    /// Min/max per axis, or `None` for an empty store.
    pub fn extent(&self) -> Option<Extent> {
        let first = self.points.first()?;
        let mut e = Extent {
            x: (first.x, first.x),
            y: (first.y, first.y),
        };
        for p in &self.points[1..] {
            e.x.0 = e.x.0.min(p.x);
            e.x.1 = e.x.1.max(p.x);
            e.y.0 = e.y.0.min(p.y);
            e.y.1 = e.y.1.max(p.y);
        }
        Some(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_drops_zero_padj_and_missing_values() {
        let mut raw = RawSeries::new();
        raw.insert("A", Some(1.0), Some(0.01));
        raw.insert("ZERO", Some(2.0), Some(0.0));
        raw.insert("NOFC", None, Some(0.5));
        raw.insert("NAN", Some(f64::NAN), Some(0.5));
        raw.insert("NOP", Some(0.3), None);
        let store = PointStore::load(&raw);
        assert_eq!(store.len(), 1);
        assert_eq!(store.dropped(), 4);
        assert!((store.by_gene("A").unwrap().y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_insert_keeps_position_last_value_wins() {
        let mut raw = RawSeries::new();
        raw.insert("A", Some(1.0), Some(0.1));
        raw.insert("B", Some(2.0), Some(0.1));
        raw.insert("A", Some(-1.0), Some(0.01));
        let genes: Vec<&str> = raw.genes().collect();
        assert_eq!(genes, vec!["A", "B"]);
        let store = PointStore::load(&raw);
        assert_eq!(store.points()[0].gene, "A");
        assert_eq!(store.points()[0].x, -1.0);
    }

    #[test]
    fn volcano_data_joins_on_gene_id() {
        let v = serde_json::json!({
            "geneID": {"0": "TP53", "1": "BRCA1"},
            "log2FoldChange": {"0": 2.5, "1": null},
            "padj": {"0": 0.001, "1": 0.2}
        });
        let raw = RawSeries::from_volcano_data(&v).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("TP53"), Some((Some(2.5), Some(0.001))));
        let store = PointStore::load(&raw);
        assert_eq!(store.len(), 1);
        assert!(store.contains("TP53"));
    }

    #[test]
    fn volcano_data_requires_columns() {
        let v = serde_json::json!({"padj": {}});
        assert!(RawSeries::from_volcano_data(&v).is_err());
    }
}
