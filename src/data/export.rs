use std::io::Write;
use std::path::Path;

use super::points::Point;
use super::regulation::StatsForm;

/// Write genes as CSV: `gene,log2FoldChange,padj,nlogpadj,regulation`.
pub fn write_genes_csv<W: Write>(mut w: W, points: &[&Point], form: &StatsForm) -> std::io::Result<()> {
    writeln!(w, "gene,log2FoldChange,padj,nlogpadj,regulation")?;
    for p in points {
        let padj = 10f64.powf(-p.y);
        writeln!(w, "{},{},{:e},{},{}", csv_field(&p.gene), p.x, padj, p.y, form.classify(p))?;
    }
    Ok(())
}

pub fn save_genes_csv<P: AsRef<Path>>(path: P, points: &[&Point], form: &StatsForm) -> std::io::Result<()> {
    let f = std::fs::File::create(path.as_ref())?;
    write_genes_csv(std::io::BufWriter::new(f), points, form)?;
    log::info!("exported {} genes to {:?}", points.len(), path.as_ref());
    Ok(())
}

/// Default export file name, stamped with the local time.
pub fn default_file_name(prefix: &str) -> String {
    format!("{}_{}.csv", prefix, chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
