//! Linearly weighted trailing average.

/// Weighted mean of the last `n` values with weights `1..=n`, oldest first.
///
/// Returns `None` when `n` is zero or fewer than `n` values exist.
pub fn weighted_trailing_average(values: &[f64], n: usize) -> Option<f64> {
    if n == 0 || values.len() < n {
        return None;
    }

    let window = &values[values.len() - n..];
    let weighted: f64 = window
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum();
    let weight_sum = (n * (n + 1) / 2) as f64;

    Some(weighted / weight_sum)
}
