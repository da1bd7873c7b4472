//! Lattice of expected interval positions (in cents)
//!
//! The interval-based detection strategy steps through this lattice and looks
//! for one peak per interval. Neighbour lookups are exact-match: callers that
//! start from an arbitrary cent value compose [`IntervalLattice::nearest`] with
//! [`IntervalLattice::next_after`] / [`IntervalLattice::previous_after`].

use serde::{Deserialize, Serialize};

use crate::config::LATTICE_TOLERANCE_CENTS;
use crate::error::PeakError;
use crate::peaks::extrema::nearest_index;

/// Ordered, deduplicated set of reference interval positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalLattice {
    intervals: Vec<f32>,
}

impl IntervalLattice {
    /// Build a lattice from interval positions
    ///
    /// The input is sorted and duplicates are removed.
    ///
    /// # Errors
    ///
    /// Returns `PeakError::InvalidInput` if `intervals` is empty or contains
    /// non-finite values.
    pub fn new(mut intervals: Vec<f32>) -> Result<Self, PeakError> {
        if intervals.is_empty() {
            return Err(PeakError::InvalidInput(
                "Interval lattice needs at least one interval".to_string(),
            ));
        }
        if intervals.iter().any(|v| !v.is_finite()) {
            return Err(PeakError::InvalidInput(
                "Interval lattice contains non-finite values".to_string(),
            ));
        }

        intervals.sort_by(f32::total_cmp);
        intervals.dedup();

        Ok(Self { intervals })
    }

    /// Evenly spaced lattice covering `[low, high]` with the given step
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_tonic::IntervalLattice;
    ///
    /// // 12-tone equal temperament over one octave
    /// let lattice = IntervalLattice::equal_tempered(0.0, 1100.0, 100.0)?;
    /// assert_eq!(lattice.len(), 12);
    /// assert_eq!(lattice.nearest(205.0)?, 200.0);
    /// # Ok::<(), stratum_tonic::PeakError>(())
    /// ```
    pub fn equal_tempered(low: f32, high: f32, step: f32) -> Result<Self, PeakError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(PeakError::InvalidInput(format!(
                "Lattice step must be positive, got {}",
                step
            )));
        }
        if !(low.is_finite() && high.is_finite()) || high < low {
            return Err(PeakError::InvalidInput(format!(
                "Invalid lattice range [{}, {}]",
                low, high
            )));
        }

        let count = ((high - low) / step + 1e-3).floor() as usize + 1;
        Self::new((0..count).map(|i| low + i as f32 * step).collect())
    }

    /// Lattice element closest to `value`
    ///
    /// # Errors
    ///
    /// Returns `PeakError::OutOfRange` if `value` lies more than
    /// [`LATTICE_TOLERANCE_CENTS`] below the first or above the last interval.
    pub fn nearest(&self, value: f32) -> Result<f32, PeakError> {
        let first = self.first();
        let last = self.last();
        if !value.is_finite()
            || value < first - LATTICE_TOLERANCE_CENTS
            || value > last + LATTICE_TOLERANCE_CENTS
        {
            return Err(PeakError::OutOfRange(format!(
                "{} is beyond {} cents of the lattice range [{}, {}]",
                value, LATTICE_TOLERANCE_CENTS, first, last
            )));
        }

        nearest_index(&self.intervals, value)
            .map(|i| self.intervals[i])
            .ok_or_else(|| PeakError::OutOfRange("Empty interval lattice".to_string()))
    }

    /// Interval immediately after `value`, which must be a lattice member
    ///
    /// # Errors
    ///
    /// Returns `PeakError::Exhausted` if `value` is the last interval or is not
    /// in the lattice.
    pub fn next_after(&self, value: f32) -> Result<f32, PeakError> {
        let index = self.position(value)?;
        self.intervals.get(index + 1).copied().ok_or_else(|| {
            PeakError::Exhausted(format!("No interval after {}", value))
        })
    }

    /// Interval immediately before `value`, which must be a lattice member
    ///
    /// # Errors
    ///
    /// Returns `PeakError::Exhausted` if `value` is the first interval or is not
    /// in the lattice.
    pub fn previous_after(&self, value: f32) -> Result<f32, PeakError> {
        let index = self.position(value)?;
        index
            .checked_sub(1)
            .map(|i| self.intervals[i])
            .ok_or_else(|| PeakError::Exhausted(format!("No interval before {}", value)))
    }

    /// Mean spacing between consecutive intervals, `None` for a single interval
    pub fn average_spacing(&self) -> Option<f32> {
        if self.intervals.len() < 2 {
            return None;
        }
        Some((self.last() - self.first()) / (self.intervals.len() - 1) as f32)
    }

    /// Lowest interval
    pub fn first(&self) -> f32 {
        self.intervals[0]
    }

    /// Highest interval
    pub fn last(&self) -> f32 {
        self.intervals[self.intervals.len() - 1]
    }

    /// All intervals, ascending
    pub fn as_slice(&self) -> &[f32] {
        &self.intervals
    }

    /// Number of intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always false; a lattice holds at least one interval
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    fn position(&self, value: f32) -> Result<usize, PeakError> {
        self.intervals
            .binary_search_by(|probe| probe.total_cmp(&value))
            .map_err(|_| PeakError::Exhausted(format!("{} is not a lattice interval", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twelve_tet() -> IntervalLattice {
        IntervalLattice::equal_tempered(0.0, 1100.0, 100.0).unwrap()
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let lattice = IntervalLattice::new(vec![300.0, 100.0, 200.0, 100.0]).unwrap();
        assert_eq!(lattice.as_slice(), &[100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_new_rejects_empty_and_nan() {
        assert!(IntervalLattice::new(vec![]).is_err());
        assert!(IntervalLattice::new(vec![0.0, f32::NAN]).is_err());
    }

    #[test]
    fn test_equal_tempered() {
        let lattice = twelve_tet();
        assert_eq!(lattice.len(), 12);
        assert_eq!(lattice.first(), 0.0);
        assert_eq!(lattice.last(), 1100.0);
        assert!(IntervalLattice::equal_tempered(0.0, 100.0, 0.0).is_err());
        assert!(IntervalLattice::equal_tempered(100.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_nearest() {
        let lattice = twelve_tet();
        assert_eq!(lattice.nearest(205.0).unwrap(), 200.0);
        assert_eq!(lattice.nearest(249.0).unwrap(), 200.0);
        assert_eq!(lattice.nearest(-20.0).unwrap(), 0.0);
        assert_eq!(lattice.nearest(1125.0).unwrap(), 1100.0);
    }

    #[test]
    fn test_nearest_out_of_range() {
        let lattice = twelve_tet();
        assert!(matches!(lattice.nearest(-25.5), Err(PeakError::OutOfRange(_))));
        assert!(matches!(lattice.nearest(1126.0), Err(PeakError::OutOfRange(_))));
        assert!(matches!(lattice.nearest(5000.0), Err(PeakError::OutOfRange(_))));
    }

    #[test]
    fn test_next_after_every_member() {
        let lattice = twelve_tet();
        let values = lattice.as_slice().to_vec();
        for pair in values.windows(2) {
            assert_eq!(lattice.next_after(pair[0]).unwrap(), pair[1]);
            assert_eq!(lattice.previous_after(pair[1]).unwrap(), pair[0]);
        }
    }

    #[test]
    fn test_neighbour_lookups_exhausted() {
        let lattice = twelve_tet();
        assert!(matches!(lattice.next_after(1100.0), Err(PeakError::Exhausted(_))));
        assert!(matches!(lattice.previous_after(0.0), Err(PeakError::Exhausted(_))));
        // Not a member: exact match only
        assert!(matches!(lattice.next_after(150.0), Err(PeakError::Exhausted(_))));
        assert!(matches!(lattice.previous_after(150.0), Err(PeakError::Exhausted(_))));
    }

    #[test]
    fn test_non_uniform_spacing() {
        // Just-intonation-like steps
        let lattice = IntervalLattice::new(vec![0.0, 112.0, 204.0, 316.0, 386.0]).unwrap();
        assert_eq!(lattice.next_after(204.0).unwrap(), 316.0);
        assert_eq!(lattice.previous_after(386.0).unwrap(), 316.0);
        assert!((lattice.average_spacing().unwrap() - 96.5).abs() < 1e-4);
    }

    #[test]
    fn test_average_spacing_single_interval() {
        let lattice = IntervalLattice::new(vec![700.0]).unwrap();
        assert_eq!(lattice.average_spacing(), None);
    }
}
