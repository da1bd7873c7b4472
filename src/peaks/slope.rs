//! Slope-based peak candidates
//!
//! Peaks come from the lookahead extrema finder. Each peak is bounded by the
//! valley nearest to it and the nearest valley on its other side; where the
//! other side has no valley left, the bound falls back to half the expected
//! peak spacing away from the peak.

use super::extrema::{find_extrema, nearest_index};
use super::{PeakMap, PeakRecord};

/// Find slope-based peak candidates with their bounding bins
///
/// # Arguments
///
/// * `x` - Bin positions
/// * `y` - Smoothed densities
/// * `lookahead` - Extrema confirmation window (samples)
/// * `delta` - Extrema noise floor (the valley threshold)
/// * `avg_interval` - Expected peak spacing in x units, used for edge fallbacks
///
/// # Returns
///
/// Peaks keyed by bin index; every record satisfies
/// `left_bound <= key <= right_bound`.
pub fn slope_peaks(x: &[f32], y: &[f32], lookahead: usize, delta: f32, avg_interval: f32) -> PeakMap {
    let extrema = find_extrema(x, y, lookahead, delta);
    let valleys = &extrema.valleys.positions;
    let half_window = avg_interval / 2.0;

    let mut peaks = PeakMap::new();

    for (peak_pos, amplitude) in extrema.peaks.iter() {
        let Some(key) = nearest_index(x, peak_pos) else {
            continue;
        };
        let bin_of = |pos: f32| nearest_index(x, pos).unwrap_or(key);
        let left_fallback = || bin_of(peak_pos - half_window);
        let right_fallback = || bin_of(peak_pos + half_window);

        let (left, right) = match nearest_index(valleys, peak_pos) {
            None => (left_fallback(), right_fallback()),
            Some(nearest) if valleys[nearest] < peak_pos => {
                let left = bin_of(valleys[nearest]);
                let later = &valleys[nearest + 1..];
                let right = match nearest_index(later, peak_pos) {
                    Some(i) => bin_of(later[i]),
                    None => right_fallback(),
                };
                (left, right)
            }
            Some(nearest) => {
                let right = bin_of(valleys[nearest]);
                let earlier = &valleys[..nearest];
                let left = match nearest_index(earlier, peak_pos) {
                    Some(i) => bin_of(earlier[i]),
                    None => left_fallback(),
                };
                (left, right)
            }
        };

        peaks.insert(
            key,
            PeakRecord {
                amplitude,
                left_bound: left.min(key),
                right_bound: right.max(key),
            },
        );
    }

    log::debug!(
        "Slope strategy: {} peaks from {} valleys",
        peaks.len(),
        valleys.len()
    );

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumps(n: usize, centers: &[f32], sigma: f32) -> (Vec<f32>, Vec<f32>) {
        let x: Vec<f32> = (0..n).map(|i| i as f32 * 10.0).collect();
        let y = x
            .iter()
            .map(|&xi| {
                centers
                    .iter()
                    .map(|&c| (-(xi - c).powi(2) / (2.0 * sigma * sigma)).exp())
                    .sum()
            })
            .collect();
        (x, y)
    }

    #[test]
    fn test_single_bump_bounded_by_edge_valleys() {
        let (x, y) = bumps(120, &[600.0], 50.0);
        let peaks = slope_peaks(&x, &y, 5, 0.01, 100.0);

        assert_eq!(peaks.len(), 1);
        let record = peaks[&60];
        assert!((record.amplitude - 1.0).abs() < 1e-6);
        assert_eq!(record.left_bound, 0);
        assert_eq!(record.right_bound, 119);
    }

    #[test]
    fn test_two_bumps_share_middle_valley() {
        let (x, y) = bumps(120, &[300.0, 800.0], 40.0);
        let peaks = slope_peaks(&x, &y, 5, 0.01, 100.0);

        assert_eq!(peaks.len(), 2);
        let first = peaks[&30];
        let second = peaks[&80];
        assert_eq!(first.right_bound, second.left_bound);
        assert!(first.right_bound > 30 && first.right_bound < 80);
    }

    #[test]
    fn test_bounds_contain_key() {
        let (x, y) = bumps(200, &[250.0, 700.0, 1200.0, 1600.0], 45.0);
        let peaks = slope_peaks(&x, &y, 4, 0.005, 100.0);

        assert!(!peaks.is_empty());
        for (&key, record) in &peaks {
            assert!(record.left_bound <= key && key <= record.right_bound);
        }
    }

    #[test]
    fn test_flat_histogram_has_no_slope_peaks() {
        let x: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let y = vec![0.0f32; 100];
        assert!(slope_peaks(&x, &y, 5, 0.01, 100.0).is_empty());
    }
}
