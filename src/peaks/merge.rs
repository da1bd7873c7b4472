//! Hybrid merge of slope and interval candidates

use std::collections::BTreeSet;

use super::PeakMap;

/// Merge slope and interval candidates
///
/// Interval candidates lying within `half_window` (x units) of any slope
/// candidate are discarded. The remaining interval candidates and all slope
/// candidates are unioned; when both strategies produced the same bin, the
/// slope record is kept since its bounds come from real valleys.
pub fn merge_hybrid(x: &[f32], slope: &PeakMap, interval: &PeakMap, half_window: f32) -> PeakMap {
    let rejected: BTreeSet<usize> = interval
        .keys()
        .copied()
        .filter(|&candidate| {
            slope
                .keys()
                .any(|&s| (x[s] - x[candidate]).abs() < half_window)
        })
        .collect();

    let mut merged: PeakMap = interval
        .iter()
        .filter(|(key, _)| !rejected.contains(key))
        .map(|(&key, &record)| (key, record))
        .collect();
    merged.extend(slope.iter().map(|(&key, &record)| (key, record)));

    log::debug!(
        "Hybrid merge: {} slope + {} interval ({} rejected) -> {} peaks",
        slope.len(),
        interval.len(),
        rejected.len(),
        merged.len()
    );

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::PeakRecord;

    fn record(amplitude: f32, left_bound: usize, right_bound: usize) -> PeakRecord {
        PeakRecord {
            amplitude,
            left_bound,
            right_bound,
        }
    }

    fn axis() -> Vec<f32> {
        (0..120).map(|i| i as f32 * 10.0).collect()
    }

    #[test]
    fn test_nearby_interval_peaks_dropped() {
        let x = axis();
        let slope = PeakMap::from([(30, record(1.0, 20, 40))]);
        let interval = PeakMap::from([
            (28, record(0.9, 25, 35)),
            (33, record(0.8, 30, 40)),
            (70, record(0.5, 65, 75)),
        ]);

        let merged = merge_hybrid(&x, &slope, &interval, 50.0);
        assert_eq!(merged.keys().copied().collect::<Vec<_>>(), vec![30, 70]);
    }

    #[test]
    fn test_slope_wins_on_key_collision() {
        let x = axis();
        let slope = PeakMap::from([(50, record(1.0, 40, 60))]);
        let interval = PeakMap::from([(50, record(0.7, 45, 55))]);

        // Zero window: nothing is rejected by proximity, only the collision decides
        let merged = merge_hybrid(&x, &slope, &interval, 0.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&50], record(1.0, 40, 60));
    }

    #[test]
    fn test_no_cross_strategy_pairs_within_window() {
        let x = axis();
        let slope = PeakMap::from([(10, record(1.0, 0, 20)), (55, record(1.0, 45, 65))]);
        let interval: PeakMap = (0..12).map(|i| (i * 10 + 2, record(0.5, i * 10, i * 10 + 5))).collect();

        let merged = merge_hybrid(&x, &slope, &interval, 50.0);
        for &k in merged.keys().filter(|k| !slope.contains_key(k)) {
            for &s in slope.keys() {
                assert!((x[k] - x[s]).abs() >= 50.0);
            }
        }
        assert!(merged.contains_key(&10) && merged.contains_key(&55));
    }

    #[test]
    fn test_empty_inputs() {
        let x = axis();
        assert!(merge_hybrid(&x, &PeakMap::new(), &PeakMap::new(), 50.0).is_empty());
    }
}
