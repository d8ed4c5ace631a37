//! Consensus filters: narrow a list of provider values before reduction

use crate::types::Numeric;
use num_traits::{Signed, Zero};
use std::collections::HashMap;

/// Return the values unchanged
pub fn none(values: Vec<Numeric>) -> Vec<Numeric> {
    values
}

/// Keep the values within one mean absolute deviation of the mean
///
/// Integer arithmetic throughout: both the mean and the MAD use truncating
/// division, and the band `[mean - mad, mean + mad]` is closed.
pub fn mad(values: Vec<Numeric>) -> Vec<Numeric> {
    if values.is_empty() {
        return values;
    }

    let count = Numeric::from(values.len());
    let mean = values.iter().fold(Numeric::zero(), |acc, v| acc + v) / &count;

    let deviation_sum = values
        .iter()
        .fold(Numeric::zero(), |acc, v| acc + (v - &mean).abs());
    let mean_absolute_deviation = deviation_sum / &count;

    let lower = &mean - &mean_absolute_deviation;
    let upper = &mean + &mean_absolute_deviation;

    values
        .into_iter()
        .filter(|v| *v >= lower && *v <= upper)
        .collect()
}

/// Keep every distinct value that attains the highest occurrence count
///
/// Ties at the top all survive, so an all-distinct input comes back whole
/// (deduplicated). Output follows first-occurrence order.
pub fn majority(values: Vec<Numeric>) -> Vec<Numeric> {
    let mut counts: HashMap<Numeric, usize> = HashMap::new();
    let mut distinct: Vec<Numeric> = Vec::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            distinct.push(value);
        }
        *count += 1;
    }

    let top = counts.values().copied().max().unwrap_or(0);

    distinct
        .into_iter()
        .filter(|v| counts.get(v).copied() == Some(top))
        .collect()
}
