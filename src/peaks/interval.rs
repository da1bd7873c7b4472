//! Interval-based peak candidates
//!
//! Steps through the lattice and takes the density maximum between the
//! midpoints to the neighbouring intervals as that interval's peak. Lattice
//! spacing need not be uniform; neighbours always come from the lattice.

use super::extrema::{argmax, nearest_index};
use super::{ClampWarning, PeakMap, PeakRecord};
use crate::error::PeakError;
use crate::intervals::IntervalLattice;

/// Interval candidates plus any clamp warnings raised while bounding the scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalScan {
    /// Peaks keyed by bin index
    pub peaks: PeakMap,
    /// Scan-range clamps (advisory)
    pub warnings: Vec<ClampWarning>,
}

/// Find one peak candidate per lattice interval
///
/// # Arguments
///
/// * `x` - Bin positions
/// * `y` - Smoothed densities
/// * `lattice` - Expected interval positions
///
/// # Errors
///
/// Returns `PeakError::Configuration` if the lattice has fewer than two
/// intervals (its spacing is undefined).
pub fn interval_peaks(
    x: &[f32],
    y: &[f32],
    lattice: &IntervalLattice,
) -> Result<IntervalScan, PeakError> {
    let avg_spacing = lattice.average_spacing().ok_or_else(|| {
        PeakError::Configuration(
            "Interval-based detection needs a lattice with at least two intervals".to_string(),
        )
    })?;

    let mut scan = IntervalScan::default();
    let (Some(&min_x), Some(&max_x)) = (x.first(), x.last()) else {
        return Ok(scan);
    };

    let (first_center, last_center) = scan_bounds(min_x, max_x, avg_spacing, lattice, &mut scan.warnings);
    if first_center > last_center {
        log::debug!(
            "Interval strategy: empty scan range [{}, {}]",
            first_center,
            last_center
        );
        return Ok(scan);
    }

    let mut cursor = lattice.nearest(first_center)?;
    while cursor <= last_center {
        let next = lattice.next_after(cursor).ok();
        let prev = lattice.previous_after(cursor).ok();
        // Mirror the missing neighbour at either end of the lattice
        let (prev, next_or_mirror) = match (prev, next) {
            (Some(p), Some(n)) => (p, n),
            (Some(p), None) => (p, 2.0 * cursor - p),
            (None, Some(n)) => (2.0 * cursor - n, n),
            (None, None) => break,
        };

        if let (Some(left), Some(right)) = (
            nearest_index(x, (cursor + prev) / 2.0),
            nearest_index(x, (cursor + next_or_mirror) / 2.0),
        ) {
            if let Some(offset) = argmax(&y[left..right.max(left)]) {
                let key = left + offset;
                scan.peaks.insert(
                    key,
                    PeakRecord {
                        amplitude: y[key],
                        left_bound: left,
                        right_bound: right,
                    },
                );
            }
        }

        match next {
            Some(n) => cursor = n,
            None => break,
        }
    }

    log::debug!(
        "Interval strategy: {} peaks between {} and {}",
        scan.peaks.len(),
        first_center,
        last_center
    );

    Ok(scan)
}

/// First and last probable peak centers, clamped to the lattice
fn scan_bounds(
    min_x: f32,
    max_x: f32,
    avg_spacing: f32,
    lattice: &IntervalLattice,
    warnings: &mut Vec<ClampWarning>,
) -> (f32, f32) {
    let mut first_center = ((min_x + 1.5 * avg_spacing) / avg_spacing).floor() * avg_spacing;
    let mut last_center = ((max_x - avg_spacing) / avg_spacing).floor() * avg_spacing;

    if first_center < lattice.first() {
        let warning = ClampWarning::FirstCenterRaised {
            computed: first_center,
            clamped: lattice.first(),
        };
        log::warn!("{}", warning);
        warnings.push(warning);
        first_center = lattice.first();
    }
    if last_center > lattice.last() {
        let warning = ClampWarning::LastCenterLowered {
            computed: last_center,
            clamped: lattice.last(),
        };
        log::warn!("{}", warning);
        warnings.push(warning);
        last_center = lattice.last();
    }

    (first_center, last_center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents_axis(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32 * 10.0).collect()
    }

    fn twelve_tet() -> IntervalLattice {
        IntervalLattice::equal_tempered(0.0, 1100.0, 100.0).unwrap()
    }

    #[test]
    fn test_one_peak_per_scanned_interval() {
        let x = cents_axis(120);
        // Maxima just off each semitone
        let y: Vec<f32> = x
            .iter()
            .map(|&c| {
                let d = (c - 20.0).rem_euclid(100.0);
                1.0 - d.min(100.0 - d) / 50.0
            })
            .collect();

        let scan = interval_peaks(&x, &y, &twelve_tet()).unwrap();
        // Scan runs from 100 (0 + 1.5 spacings, snapped) to 1000
        assert_eq!(scan.peaks.len(), 10);
        assert!(scan.warnings.is_empty());
        for (&key, record) in &scan.peaks {
            assert!((x[key] - 20.0).rem_euclid(100.0) < 1e-3);
            assert!(record.left_bound <= key && key < record.right_bound);
        }
    }

    #[test]
    fn test_bounds_at_interval_midpoints() {
        let x = cents_axis(120);
        let mut y = vec![0.0f32; 120];
        y[40] = 1.0;

        let scan = interval_peaks(&x, &y, &twelve_tet()).unwrap();
        let record = scan.peaks[&40];
        assert_eq!(record.left_bound, 35);
        assert_eq!(record.right_bound, 45);
    }

    #[test]
    fn test_clamps_to_lattice_with_warnings() {
        // Histogram spans two octaves below and above a one-octave lattice
        let x: Vec<f32> = (0..360).map(|i| -1200.0 + i as f32 * 10.0).collect();
        let y = vec![0.5f32; 360];

        let scan = interval_peaks(&x, &y, &twelve_tet()).unwrap();
        assert_eq!(scan.warnings.len(), 2);
        assert!(matches!(scan.warnings[0], ClampWarning::FirstCenterRaised { clamped, .. } if clamped == 0.0));
        assert!(matches!(scan.warnings[1], ClampWarning::LastCenterLowered { clamped, .. } if clamped == 1100.0));
        // Every lattice interval is scanned, ends use mirrored neighbours
        assert_eq!(scan.peaks.len(), 12);
    }

    #[test]
    fn test_non_uniform_lattice() {
        let x = cents_axis(120);
        let mut y = vec![0.0f32; 120];
        y[31] = 1.0;
        let lattice = IntervalLattice::new(vec![0.0, 100.0, 150.0, 316.0, 500.0, 700.0, 1100.0]).unwrap();

        let scan = interval_peaks(&x, &y, &lattice).unwrap();
        // 316 is bounded by the midpoints to 150 and 500
        let record = scan.peaks[&31];
        assert_eq!(record.left_bound, 23);
        assert_eq!(record.right_bound, 41);
    }

    #[test]
    fn test_histogram_outside_lattice_scans_nothing() {
        let x: Vec<f32> = (0..100).map(|i| 5000.0 + i as f32 * 10.0).collect();
        let y = vec![1.0f32; 100];
        let scan = interval_peaks(&x, &y, &twelve_tet()).unwrap();
        assert!(scan.peaks.is_empty());
    }

    #[test]
    fn test_single_interval_lattice_is_configuration_error() {
        let lattice = IntervalLattice::new(vec![500.0]).unwrap();
        let result = interval_peaks(&cents_axis(10), &[0.0; 10], &lattice);
        assert!(matches!(result, Err(PeakError::Configuration(_))));
    }

    #[test]
    fn test_empty_histogram() {
        let scan = interval_peaks(&[], &[], &twelve_tet()).unwrap();
        assert!(scan.peaks.is_empty());
    }
}
