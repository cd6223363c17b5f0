// Result-file writers.
//
// Every writer flushes after each record. Scoring passes can run for
// hours over large brand sets; partial output must survive a kill and
// support tailing. This is a durability/observability contract, not a
// buffering accident.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Create the parent directory of an output file if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Format a float the way C's `%g` does with the default 6 significant
/// digits: fixed notation in the mid range, scientific outside it,
/// trailing zeros trimmed. Keeps score files byte-compatible across
/// reimplementations of the pipeline.
pub fn format_g(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return format!("{x}");
    }
    let exp = x.abs().log10().floor() as i32;
    if exp < -4 || exp >= 6 {
        let mantissa = x / 10f64.powi(exp);
        let mant = trim_zeros(&format!("{mantissa:.5}"));
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mant}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (5 - exp).max(0) as usize;
        trim_zeros(&format!("{x:.decimals$}"))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Writer for the primary score files: `<handle> <score>` per line.
pub struct ScoreWriter {
    out: BufWriter<File>,
}

impl ScoreWriter {
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent_dir(path)?;
        let file = File::create(path)
            .with_context(|| format!("cannot create score file {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    pub fn write_score(&mut self, handle: &str, score: f64) -> Result<()> {
        writeln!(self.out, "{handle} {}", format_g(score))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Write the top-terms audit file: every nonzero-weighted term, weight
/// descending (ties by vocabulary order). This is the human-readable
/// record of WHY brands scored the way they did.
pub fn write_top_terms(path: &Path, vocabulary: &[String], weights: &[f64]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut file = File::create(path)
        .with_context(|| format!("cannot create top-terms file {}", path.display()))?;

    let mut order: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

    for i in order {
        writeln!(file, "{} {}", vocabulary[i], format_g(weights[i]))?;
    }
    Ok(())
}

/// Writer for the per-exemplar diagnostic report: tab-separated, one row
/// per exemplar, header first, flushed per row.
pub struct ReportWriter {
    out: BufWriter<File>,
}

impl ReportWriter {
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent_dir(path)?;
        let file = File::create(path)
            .with_context(|| format!("cannot create report file {}", path.display()))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "exemplar\tcorr\tn_followers")?;
        out.flush()?;
        Ok(Self { out })
    }

    pub fn write_row(&mut self, exemplar: &str, corr: f64, n_followers: usize) -> Result<()> {
        writeln!(self.out, "{exemplar}\t{}\t{n_followers}", format_g(corr))?;
        self.out.flush()?;
        Ok(())
    }
}
