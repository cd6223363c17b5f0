// Score-file reading, for validation ground truth and previously written
// score files. Format: one `<handle> <score>` pair per line; extra columns
// and blank lines are tolerated.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

/// Read a score file into a handle -> score map. Handles are lowercased.
/// Lines without at least a handle and a parseable number are skipped.
pub fn read_scores(path: &Path) -> Result<HashMap<String, f64>> {
    let file =
        File::open(path).with_context(|| format!("cannot open score file {}", path.display()))?;
    let mut scores = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line?.trim().to_lowercase();
        let mut parts = line.split_whitespace();
        let (Some(handle), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if let Ok(score) = value.parse::<f64>() {
            scores.insert(handle.to_string(), score);
        }
    }
    Ok(scores)
}
