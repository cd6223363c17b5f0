// Pearson correlation for the validation diagnostics.
//
// Undefined inputs (fewer than two points, zero variance on either side)
// are explicit errors rather than silent NaN — a correlation report full
// of NaN rows hides a configuration problem.

use anyhow::{bail, ensure, Result};

/// Pearson correlation coefficient between two equal-length samples.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64> {
    ensure!(
        xs.len() == ys.len(),
        "correlation inputs differ in length: {} vs {}",
        xs.len(),
        ys.len()
    );
    if xs.len() < 2 {
        bail!(
            "correlation undefined for {} point(s); need at least 2",
            xs.len()
        );
    }

    let n = xs.len() as f64;
    let mean_x: f64 = xs.iter().sum::<f64>() / n;
    let mean_y: f64 = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        bail!("correlation undefined: an input has zero variance");
    }

    Ok(cov / (var_x.sqrt() * var_y.sqrt()))
}
