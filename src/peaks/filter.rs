//! Peak filtering by amplitude, lobe shape and valley depth
//!
//! Rejections are routine outcomes of the heuristic and never errors.

use super::extrema::argmin;
use super::{PeakMap, ValleyMap};

/// Thresholds applied to candidate peaks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    /// Minimum peak amplitude
    pub peak_amp_thresh: f32,
    /// Minimum depth of at least one flanking valley below the peak
    pub valley_thresh: f32,
    /// Lower bound for left/right lobe length ratio
    pub min_lobe_ratio: f32,
    /// Upper bound for left/right lobe length ratio
    pub max_lobe_ratio: f32,
}

/// Drop candidates whose amplitude is below `peak_amp_thresh`
pub fn filter_by_amplitude(peaks: PeakMap, peak_amp_thresh: f32) -> PeakMap {
    peaks
        .into_iter()
        .filter(|(key, record)| {
            let keep = record.amplitude >= peak_amp_thresh;
            if !keep {
                log::trace!(
                    "Rejecting peak at bin {}: amplitude {} below {}",
                    key,
                    record.amplitude,
                    peak_amp_thresh
                );
            }
            keep
        })
        .collect()
}

/// Keep candidates with well-shaped lobes and deep enough valleys
///
/// The left lobe is `y[left_bound..key]` and the right lobe `y[key..right_bound]`.
/// A peak survives if both lobes are non-empty, their length ratio lies within
/// the configured bounds, and at least one lobe minimum lies more than
/// `valley_thresh` below the peak density. Both lobe minima of every survivor
/// are returned as valleys.
pub fn filter_by_shape(y: &[f32], peaks: PeakMap, thresholds: &FilterThresholds) -> (PeakMap, ValleyMap) {
    let mut kept = PeakMap::new();
    let mut valleys = ValleyMap::new();

    for (key, record) in peaks {
        let left_lobe = &y[record.left_bound.min(key)..key];
        let right_lobe = &y[key..record.right_bound.clamp(key, y.len())];

        if left_lobe.is_empty() || right_lobe.is_empty() {
            log::trace!("Rejecting peak at bin {}: empty lobe", key);
            continue;
        }

        let ratio = left_lobe.len() as f32 / right_lobe.len() as f32;
        if ratio < thresholds.min_lobe_ratio || ratio > thresholds.max_lobe_ratio {
            log::trace!("Rejecting peak at bin {}: lobe ratio {:.2}", key, ratio);
            continue;
        }

        let (Some(left_offset), Some(right_offset)) = (argmin(left_lobe), argmin(right_lobe)) else {
            continue;
        };
        let left_valley = left_lobe[left_offset];
        let right_valley = right_lobe[right_offset];
        let peak_density = y[key];

        if (left_valley - peak_density).abs() <= thresholds.valley_thresh
            && (right_valley - peak_density).abs() <= thresholds.valley_thresh
        {
            log::trace!("Rejecting peak at bin {}: valleys too shallow", key);
            continue;
        }

        valleys.insert(record.left_bound + left_offset, left_valley);
        valleys.insert(key + right_offset, right_valley);
        kept.insert(key, record);
    }

    (kept, valleys)
}
