//! Gain computation for each metering strategy.
//!
//! Every function returns a linear gain; the caller converts to EV.

use crate::image_pipeline::metering::types::{
    HIGHLIGHT_CEILING, HIGHLIGHT_TARGET, MeteringSamples, TARGET_GRAY,
};

const LOG_FLOOR: f64 = 1e-10;
const MIN_GEOMETRIC_MEAN: f64 = 1e-4;
const MIN_PERCENTILE: f64 = 1e-6;
const GRID_SIZE: usize = 5;
const CENTER_RADIUS: f64 = 1.5;
const CENTER_BOOST: f64 = 2.0;
const HIGHLIGHT_CELL_WEIGHT: f64 = 0.5;
const SHADOW_CELL_WEIGHT: f64 = 1.2;

/// Value at `floor(p / 100 * (n - 1))` of the sorted samples.
pub(crate) fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

pub(crate) fn average(lumas: &[f64]) -> f64 {
    let sum_log: f64 = lumas.iter().map(|&l| l.max(LOG_FLOOR).ln()).sum();
    let geometric_mean = (sum_log / lumas.len() as f64).exp();

    if geometric_mean < MIN_GEOMETRIC_MEAN {
        return 1.0;
    }
    TARGET_GRAY / geometric_mean
}

pub(crate) fn hybrid(lumas: &[f64]) -> f64 {
    let base_gain = average(lumas);
    let p99 = percentile(lumas, 99.0);

    if p99 * base_gain > HIGHLIGHT_CEILING {
        if p99 < MIN_PERCENTILE {
            return base_gain;
        }
        return HIGHLIGHT_CEILING / p99;
    }
    base_gain
}

pub(crate) fn highlight_safe(lumas: &[f64]) -> f64 {
    let p99 = percentile(lumas, 99.0);
    if p99 < MIN_PERCENTILE {
        return 1.0;
    }
    HIGHLIGHT_TARGET / p99
}

pub(crate) fn center_weighted(samples: &MeteringSamples) -> f64 {
    let center_x = samples.width as f64 / 2.0;
    let center_y = samples.height as f64 / 2.0;
    let sigma = samples.width.min(samples.height) as f64 / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (&luma, &(x, y)) in samples.lumas.iter().zip(&samples.positions) {
        let dx = x as f64 - center_x;
        let dy = y as f64 - center_y;
        let weight = (-(dx * dx + dy * dy) / two_sigma_sq).exp();
        weighted_sum += luma * weight;
        weight_total += weight;
    }

    let weighted_avg = weighted_sum / weight_total;
    if weighted_avg < MIN_PERCENTILE {
        return 1.0;
    }
    TARGET_GRAY / weighted_avg
}

pub(crate) fn matrix(samples: &MeteringSamples) -> f64 {
    let cell_w = samples.width as f64 / GRID_SIZE as f64;
    let cell_h = samples.height as f64 / GRID_SIZE as f64;

    let mut sums = [0.0f64; GRID_SIZE * GRID_SIZE];
    let mut counts = [0usize; GRID_SIZE * GRID_SIZE];
    for (&luma, &(x, y)) in samples.lumas.iter().zip(&samples.positions) {
        let gx = ((x as f64 / cell_w).floor() as usize).min(GRID_SIZE - 1);
        let gy = ((y as f64 / cell_h).floor() as usize).min(GRID_SIZE - 1);
        let idx = gy * GRID_SIZE + gx;
        sums[idx] += luma;
        counts[idx] += 1;
    }

    let cells: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    let mut weights = [1.0f64; GRID_SIZE * GRID_SIZE];
    let center = (GRID_SIZE / 2) as f64;
    for gy in 0..GRID_SIZE {
        for gx in 0..GRID_SIZE {
            let dx = gx as f64 - center;
            let dy = gy as f64 - center;
            if (dx * dx + dy * dy).sqrt() < CENTER_RADIUS {
                weights[gy * GRID_SIZE + gx] *= CENTER_BOOST;
            }
        }
    }

    // Percentiles over the grid cells, not the pixels.
    let mut sorted = cells.clone();
    sorted.sort_by(f64::total_cmp);
    let p90 = sorted[(sorted.len() as f64 * 0.9).floor() as usize];
    let p10 = sorted[(sorted.len() as f64 * 0.1).floor() as usize];

    for (weight, &cell) in weights.iter_mut().zip(&cells) {
        if cell > p90 {
            *weight *= HIGHLIGHT_CELL_WEIGHT;
        }
        if cell < p10 {
            *weight *= SHADOW_CELL_WEIGHT;
        }
    }

    let weighted_sum: f64 = cells.iter().zip(&weights).map(|(c, w)| c * w).sum();
    let weight_total: f64 = weights.iter().sum();
    let mut avg = weighted_sum / weight_total;
    if avg < MIN_PERCENTILE {
        avg = 0.001;
    }

    let mut gain = TARGET_GRAY / avg;

    let p99 = percentile(&samples.lumas, 99.0);
    if p99 * gain > HIGHLIGHT_CEILING && p99 > MIN_PERCENTILE {
        gain = HIGHLIGHT_CEILING / p99;
    }
    gain
}
