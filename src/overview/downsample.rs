//! Two-stage box-average reduction of a whole session.
//!
//! Frames are first reduced vertically (bins to output rows), then groups of
//! consecutive frames are averaged into output columns.

use std::ops::Range;

/// Source range covered by output lane `index` when `len` source items are
/// spread over lanes `scale` items wide.
///
/// The range is `[floor(index * scale), round((index + 1) * scale))`,
/// widened to at least one item and clamped to `len`.
fn lane_range(index: usize, scale: f64, len: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let start = ((index as f64 * scale).floor() as usize).min(len - 1);
    let end = (((index + 1) as f64 * scale).round() as usize)
        .max(start + 1)
        .min(len);
    start..end
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reduces one frame's bins to `target_height` values, lowest bin first.
///
/// Returns an empty vector for an empty frame or a zero height.
pub fn vertical_reduce(bins: &[f64], target_height: usize) -> Vec<f64> {
    if bins.is_empty() || target_height == 0 {
        return Vec::new();
    }
    let scale = bins.len() as f64 / target_height as f64;
    (0..target_height)
        .map(|row| mean(&bins[lane_range(row, scale, bins.len())]))
        .collect()
}

/// Reduces `frames` (oldest first) to `target_width` columns of
/// `target_height` values each.
///
/// Column 0 holds the oldest frames. Frames without bins contribute
/// nothing; an empty dataset yields no columns.
pub fn downsample<F: AsRef<[f64]>>(
    frames: &[F],
    target_width: usize,
    target_height: usize,
) -> Vec<Vec<f64>> {
    if frames.is_empty() || target_width == 0 || target_height == 0 {
        return Vec::new();
    }

    let scale = frames.len() as f64 / target_width as f64;
    let mut columns = Vec::with_capacity(target_width);

    for column in 0..target_width {
        let slice = &frames[lane_range(column, scale, frames.len())];
        let reduced = match slice {
            [single] => vertical_reduce(single.as_ref(), target_height),
            _ => average_columns(slice, target_height),
        };
        if !reduced.is_empty() {
            columns.push(reduced);
        }
    }

    columns
}

fn average_columns<F: AsRef<[f64]>>(slice: &[F], target_height: usize) -> Vec<f64> {
    let mut sum = vec![0.0; target_height];
    let mut count = 0usize;

    for frame in slice {
        let reduced = vertical_reduce(frame.as_ref(), target_height);
        if reduced.is_empty() {
            continue;
        }
        for (acc, value) in sum.iter_mut().zip(&reduced) {
            *acc += value;
        }
        count += 1;
    }

    if count == 0 {
        return Vec::new();
    }
    sum.iter_mut().for_each(|v| *v /= count as f64);
    sum
}
