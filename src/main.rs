use std::sync::Arc;

use volcano::{run_volcano, PlotSettings, RawSeries, StaticEnrichment, VolcanoConfig};

/// Deterministic demo data: mostly unregulated genes with a few strong hits
/// on each side.
fn synthetic_series(n: usize) -> RawSeries {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut raw = RawSeries::new();
    for i in 0..n {
        let u = next();
        let spread = if i % 25 == 0 { 4.0 } else { 1.2 };
        let fc = (u - 0.5) * 2.0 * spread;
        let noise = next();
        let padj = (10f64.powf(-(fc.abs() * 1.8 + noise * 1.5))).clamp(1e-30, 1.0);
        raw.insert(format!("GENE{:04}", i), Some(fc), Some(padj));
    }
    raw
}

fn demo_enrichment(raw: &RawSeries) -> StaticEnrichment {
    let genes: Vec<&str> = raw.genes().collect();
    let mut svc = StaticEnrichment::new();
    for (k, name) in ["cell cycle", "immune response", "lipid metabolism", "apoptosis"].iter().enumerate() {
        svc.insert(name, genes.iter().skip(k).step_by(7 + k * 3).copied());
    }
    svc
}

fn load_series(path: &str) -> volcano::Result<RawSeries> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    RawSeries::from_volcano_data(&value)
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match PlotSettings::load_from_default_path() {
        Ok(s) => s,
        Err(e) => {
            log::debug!("using default settings: {}", e);
            PlotSettings::default()
        }
    };

    let raw = match std::env::args().nth(1) {
        Some(path) => match load_series(&path) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("could not load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => synthetic_series(2000),
    };
    let enrichment = demo_enrichment(&raw);

    let cfg = VolcanoConfig {
        headline: Some("Differential expression".to_string()),
        settings,
        ..VolcanoConfig::default()
    };
    let enrichment = Arc::new(enrichment);
    run_volcano(Some(raw), cfg, move |app| {
        let ranking = Arc::clone(&enrichment);
        app.with_term_ranker(Box::new(move |genes| ranking.rank(genes)))
            .with_enrichment(enrichment)
    })
}
