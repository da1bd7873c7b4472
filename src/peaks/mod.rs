//! Peak and valley detection on pitch histograms
//!
//! Three strategies produce candidate peaks:
//! - Slope: lookahead extrema with valley-bounded lobes
//! - Interval: one maximum per interval of an [`IntervalLattice`](crate::IntervalLattice)
//! - Hybrid: slope peaks plus interval peaks not already covered by a slope peak
//!
//! Candidates are then filtered by amplitude, lobe shape and valley depth.
//! All bookkeeping is keyed by bin index; positions in cents only appear in
//! the final [`PeakResult`].

pub mod engine;
pub mod extrema;
pub mod filter;
pub mod interval;
pub mod merge;
pub mod octave;
pub mod slope;

pub use engine::{detect_peaks, PeakEngine};
pub use extrema::{find_extrema, nearest_index, Extrema};
pub use octave::{extend_peaks, extend_peaks_with_default};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Candidate peak, keyed externally by its bin index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRecord {
    /// Peak amplitude
    pub amplitude: f32,
    /// Bin index of the left bound (valley or interval midpoint)
    pub left_bound: usize,
    /// Bin index of the right bound
    pub right_bound: usize,
}

/// Peaks keyed by bin index
pub type PeakMap = BTreeMap<usize, PeakRecord>;

/// Valley amplitudes keyed by bin index
pub type ValleyMap = BTreeMap<usize, f32>;

/// Parallel position/amplitude sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSeries {
    /// Positions in histogram x units
    pub positions: Vec<f32>,
    /// Amplitudes at those positions
    pub amplitudes: Vec<f32>,
}

impl PositionSeries {
    /// Append one point
    pub fn push(&mut self, position: f32, amplitude: f32) {
        self.positions.push(position);
        self.amplitudes.push(amplitude);
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no points
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over `(position, amplitude)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.amplitudes.iter().copied())
    }
}

/// Advisory notice that the interval scan range was clamped to the lattice
///
/// Detection still completes; the warning is logged and returned in
/// [`PeakResult::warnings`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClampWarning {
    /// First scan center fell below the lattice and was raised to its first interval
    FirstCenterRaised {
        /// Center derived from the histogram range
        computed: f32,
        /// Value actually used
        clamped: f32,
    },
    /// Last scan center rose above the lattice and was lowered to its last interval
    LastCenterLowered {
        /// Center derived from the histogram range
        computed: f32,
        /// Value actually used
        clamped: f32,
    },
}

impl fmt::Display for ClampWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClampWarning::FirstCenterRaised { computed, clamped } => write!(
                f,
                "First interval center {} was too low and is set to {}",
                computed, clamped
            ),
            ClampWarning::LastCenterLowered { computed, clamped } => write!(
                f,
                "Last interval center {} was too high and is set to {}",
                computed, clamped
            ),
        }
    }
}

/// Detected peaks and their valleys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakResult {
    /// Surviving peaks, ascending by position
    pub peaks: PositionSeries,
    /// Valleys flanking the surviving peaks, ascending by position
    pub valleys: PositionSeries,
    /// Non-fatal diagnostics raised during detection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ClampWarning>,
}

impl PeakResult {
    /// Result with no peaks, valleys or warnings
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no peak survived
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Peak positions propagated into neighbouring octaves
    ///
    /// See [`extend_peaks`].
    pub fn extended_peaks(&self, propagation_thresh: f32) -> Vec<f32> {
        extend_peaks(&self.peaks.positions, propagation_thresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_series() {
        let mut series = PositionSeries::default();
        assert!(series.is_empty());
        series.push(100.0, 0.5);
        series.push(300.0, 0.25);
        assert_eq!(series.len(), 2);
        let pairs: Vec<(f32, f32)> = series.iter().collect();
        assert_eq!(pairs, vec![(100.0, 0.5), (300.0, 0.25)]);
    }

    #[test]
    fn test_clamp_warning_display() {
        let warning = ClampWarning::FirstCenterRaised {
            computed: -50.0,
            clamped: 0.0,
        };
        assert!(warning.to_string().contains("too low"));
    }

    #[test]
    fn test_empty_result() {
        let result = PeakResult::empty();
        assert!(result.is_empty());
        assert!(result.valleys.is_empty());
        assert!(result.extended_peaks(50.0).is_empty());
    }
}
