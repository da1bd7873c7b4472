//! Octave propagation of detected peaks
//!
//! A tonal center found in one octave is expected to show up in the
//! neighbouring octaves as well. For every peak this predicts the peaks one
//! octave up and one octave down, unless another peak already sits at that
//! pitch class.

use crate::config::{DEFAULT_PROPAGATION_THRESH, OCTAVE_CENTS};

/// Distance between two positions folded into a single octave, in `[0, 600]`
pub fn octave_folded_distance(a: f32, b: f32) -> f32 {
    let r = (a - b).abs().rem_euclid(OCTAVE_CENTS);
    r.min(OCTAVE_CENTS - r)
}

/// Extend peak positions into the octaves above and below
///
/// For each position `p`, the candidates `p + 1200` and `p - 1200` are
/// considered (all upward candidates first, then all downward ones). A
/// candidate is admitted when no other input position lies within
/// `propagation_thresh` cents of it after octave folding. The peak a
/// candidate was derived from is not compared against, since it always
/// folds onto the candidate.
///
/// The input is never modified; the output starts with every input position.
///
/// # Example
///
/// ```
/// use stratum_tonic::peaks::extend_peaks;
///
/// let extended = extend_peaks(&[200.0], 50.0);
/// assert_eq!(extended, vec![200.0, 1400.0, -1000.0]);
/// ```
pub fn extend_peaks(positions: &[f32], propagation_thresh: f32) -> Vec<f32> {
    let mut extended = positions.to_vec();

    for shift in [OCTAVE_CENTS, -OCTAVE_CENTS] {
        for (source, &p) in positions.iter().enumerate() {
            let candidate = p + shift;
            let occupied = positions
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != source)
                .any(|(_, &q)| octave_folded_distance(candidate, q) <= propagation_thresh);
            if !occupied {
                extended.push(candidate);
            }
        }
    }

    log::debug!(
        "Octave extension: {} peaks -> {} (threshold {} cents)",
        positions.len(),
        extended.len(),
        propagation_thresh
    );

    extended
}

/// [`extend_peaks`] with [`DEFAULT_PROPAGATION_THRESH`]
pub fn extend_peaks_with_default(positions: &[f32]) -> Vec<f32> {
    extend_peaks(positions, DEFAULT_PROPAGATION_THRESH)
}
