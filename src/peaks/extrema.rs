//! Lookahead extrema finder and nearest-index lookup
//!
//! The finder walks the signal once, tracking a running maximum and minimum.
//! A maximum is confirmed as a peak once the signal has dropped more than
//! `delta` below it and the next `lookahead` samples stay below it; valleys
//! are confirmed symmetrically. Peaks and valleys therefore alternate.

use super::PositionSeries;

/// Raw peak and valley candidates, in x-axis units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    /// Confirmed local maxima
    pub peaks: PositionSeries,
    /// Confirmed local minima
    pub valleys: PositionSeries,
}

/// Find lookahead-confirmed peaks and valleys in `y`
///
/// # Arguments
///
/// * `x` - Sample positions (same length as `y`)
/// * `y` - Signal
/// * `lookahead` - Samples inspected ahead to confirm an extremum
/// * `delta` - Minimum amplitude change before an extremum counts (noise floor)
///
/// # Returns
///
/// Peaks and valleys ordered by position. The last `lookahead` samples are only
/// used for confirmation, except that a trailing valley after the final peak is
/// reported when the tail falls more than `delta` below that peak.
///
/// # Example
///
/// ```
/// use stratum_tonic::peaks::extrema::find_extrema;
///
/// let x: Vec<f32> = (0..9).map(|i| i as f32).collect();
/// let y = vec![0.0, 0.5, 1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0];
/// let extrema = find_extrema(&x, &y, 2, 0.1);
/// assert_eq!(extrema.peaks.positions, vec![2.0]);
/// ```
pub fn find_extrema(x: &[f32], y: &[f32], lookahead: usize, delta: f32) -> Extrema {
    let mut extrema = Extrema::default();
    let n = x.len().min(y.len());
    if lookahead == 0 || n <= lookahead {
        return extrema;
    }

    let mut mx = f32::NEG_INFINITY;
    let mut mn = f32::INFINITY;
    let mut mx_idx = 0usize;
    let mut mn_idx = 0usize;
    // Bin of the most recent extremum, if it was a peak
    let mut last_peak: Option<usize> = None;

    for i in 0..(n - lookahead) {
        let v = y[i];
        if v > mx {
            mx = v;
            mx_idx = i;
        }
        if v < mn {
            mn = v;
            mn_idx = i;
        }

        if mx != f32::INFINITY && v < mx - delta {
            let ahead_max = y[i..i + lookahead]
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            if ahead_max < mx {
                extrema.peaks.push(x[mx_idx], mx);
                last_peak = Some(mx_idx);
                mx = f32::INFINITY;
                mn = f32::INFINITY;
                continue;
            }
        }

        if mn != f32::NEG_INFINITY && v > mn + delta {
            let ahead_min = y[i..i + lookahead]
                .iter()
                .copied()
                .fold(f32::INFINITY, f32::min);
            if ahead_min > mn {
                extrema.valleys.push(x[mn_idx], mn);
                last_peak = None;
                mn = f32::NEG_INFINITY;
                mx = f32::NEG_INFINITY;
            }
        }
    }

    if let Some(peak_idx) = last_peak {
        if let Some(offset) = argmin(&y[peak_idx + 1..n]) {
            let idx = peak_idx + 1 + offset;
            if y[idx] < y[peak_idx] - delta {
                extrema.valleys.push(x[idx], y[idx]);
            }
        }
    }

    log::trace!(
        "Extrema finder: {} peaks, {} valleys (lookahead={}, delta={})",
        extrema.peaks.len(),
        extrema.valleys.len(),
        lookahead,
        delta
    );

    extrema
}

/// Index of the element of `values` closest to `target`
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
///
/// # Example
///
/// ```
/// use stratum_tonic::peaks::extrema::nearest_index;
///
/// assert_eq!(nearest_index(&[0.0, 100.0, 200.0], 140.0), Some(1));
/// assert_eq!(nearest_index(&[0.0, 100.0], 50.0), Some(0));
/// assert_eq!(nearest_index(&[], 1.0), None);
/// ```
pub fn nearest_index(values: &[f32], target: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        let distance = (v - target).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first maximum of `values`
pub(crate) fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum of `values`
pub(crate) fn argmin(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn test_single_bump() {
        let y: Vec<f32> = (0..40)
            .map(|i| {
                let d = i as f32 - 20.0;
                (-d * d / 18.0).exp()
            })
            .collect();
        let extrema = find_extrema(&axis(40), &y, 3, 0.01);

        assert_eq!(extrema.peaks.positions, vec![20.0]);
        assert!((extrema.peaks.amplitudes[0] - 1.0).abs() < 1e-6);
        // Leading valley at the left edge, trailing valley at the right edge
        assert_eq!(extrema.valleys.positions, vec![0.0, 39.0]);
    }

    #[test]
    fn test_alternating_peaks_and_valleys() {
        let y: Vec<f32> = (0..200).map(|i| (i as f32 * 0.1).sin()).collect();
        let extrema = find_extrema(&axis(200), &y, 5, 0.1);

        assert!(extrema.peaks.len() >= 2);
        assert!(!extrema.valleys.is_empty());
        for (&p, &a) in extrema.peaks.positions.iter().zip(&extrema.peaks.amplitudes) {
            assert!(a > 0.99, "peak at {} has amplitude {}", p, a);
        }
    }

    #[test]
    fn test_flat_signal_has_no_extrema() {
        let y = vec![0.0f32; 50];
        let extrema = find_extrema(&axis(50), &y, 5, 0.01);
        assert!(extrema.peaks.is_empty());
        assert!(extrema.valleys.is_empty());

        let extrema = find_extrema(&axis(50), &y, 5, 0.0);
        assert!(extrema.peaks.is_empty());
        assert!(extrema.valleys.is_empty());
    }

    #[test]
    fn test_lookahead_longer_than_signal() {
        let y = vec![0.0, 1.0, 0.0];
        let extrema = find_extrema(&axis(3), &y, 5, 0.1);
        assert_eq!(extrema, Extrema::default());
    }

    #[test]
    fn test_small_ripple_below_delta_ignored() {
        let y: Vec<f32> = (0..60).map(|i| 0.001 * (i as f32).sin()).collect();
        let extrema = find_extrema(&axis(60), &y, 3, 0.01);
        assert!(extrema.peaks.is_empty());
    }

    #[test]
    fn test_nearest_index_ties_pick_first() {
        assert_eq!(nearest_index(&[10.0, 20.0, 30.0], 25.0), Some(1));
        assert_eq!(nearest_index(&[30.0, 10.0, 20.0], 12.0), Some(1));
        assert_eq!(nearest_index(&[5.0], -100.0), Some(0));
    }

    #[test]
    fn test_argmax_argmin_first_occurrence() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmin(&[2.0, 0.0, 1.0, 0.0]), Some(1));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmin(&[]), None);
    }
}
