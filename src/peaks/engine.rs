//! Peak detection pipeline
//!
//! Runs the selected strategy, merges hybrid candidates, filters them and
//! translates surviving bin indices back to histogram positions.

use super::filter::{filter_by_amplitude, filter_by_shape, FilterThresholds};
use super::interval::interval_peaks;
use super::merge::merge_hybrid;
use super::slope::slope_peaks;
use super::{PeakMap, PeakResult, PositionSeries};
use crate::config::{PeakDetectionConfig, PeakMethod};
use crate::error::PeakError;
use crate::histogram::Histogram;
use crate::intervals::IntervalLattice;

/// Detect peaks and valleys in a smoothed histogram
///
/// This expects a smoothed histogram: on raw, noisy densities the shape and
/// valley heuristics reject most candidates.
///
/// # Arguments
///
/// * `histogram` - Histogram whose smoothed density is analysed
/// * `config` - Method and thresholds
/// * `lattice` - Interval lattice, required for `Interval` and `Hybrid`
///
/// # Errors
///
/// Returns `PeakError::Configuration` if the method needs a lattice and none
/// (or one with fewer than two intervals) is given, and
/// `PeakError::InvalidInput` for an invalid configuration.
///
/// # Example
///
/// ```
/// use stratum_tonic::{detect_peaks, Histogram, PeakDetectionConfig};
///
/// let x: Vec<f32> = (0..120).map(|i| i as f32 * 10.0).collect();
/// let y: Vec<f32> = x.iter().map(|&c| (-(c - 600.0).powi(2) / 5000.0).exp()).collect();
/// let histogram = Histogram::new(x, y, 0.0)?;
///
/// let config = PeakDetectionConfig {
///     peak_amp_thresh: 0.1,
///     valley_thresh: 0.01,
///     lookahead: 5,
///     ..PeakDetectionConfig::default()
/// };
/// let result = detect_peaks(&histogram, &config, None)?;
/// assert_eq!(result.peaks.positions, vec![600.0]);
/// # Ok::<(), stratum_tonic::PeakError>(())
/// ```
pub fn detect_peaks(
    histogram: &Histogram,
    config: &PeakDetectionConfig,
    lattice: Option<&IntervalLattice>,
) -> Result<PeakResult, PeakError> {
    config.validate()?;

    if config.method.requires_lattice() && lattice.is_none() {
        return Err(missing_lattice(config.method));
    }

    log::debug!(
        "Detecting peaks with {} method on {} bins",
        config.method,
        histogram.len()
    );

    if histogram.is_empty() {
        return Ok(PeakResult::empty());
    }

    let x = histogram.x();
    let y = histogram.density();

    let slope = if config.method.uses_slope() {
        slope_peaks(x, y, config.lookahead, config.valley_thresh, config.avg_interval)
    } else {
        PeakMap::new()
    };

    let (candidates, warnings) = match (config.method, lattice) {
        (PeakMethod::Slope, _) => (slope, Vec::new()),
        (PeakMethod::Interval, Some(lattice)) => {
            let scan = interval_peaks(x, y, lattice)?;
            (scan.peaks, scan.warnings)
        }
        (PeakMethod::Hybrid, Some(lattice)) => {
            let scan = interval_peaks(x, y, lattice)?;
            let half_window = lattice.average_spacing().unwrap_or(config.avg_interval) / 2.0;
            (merge_hybrid(x, &slope, &scan.peaks, half_window), scan.warnings)
        }
        (method, None) => return Err(missing_lattice(method)),
    };

    let thresholds = FilterThresholds {
        peak_amp_thresh: config.peak_amp_thresh,
        valley_thresh: config.valley_thresh,
        min_lobe_ratio: config.min_lobe_ratio,
        max_lobe_ratio: config.max_lobe_ratio,
    };
    let candidate_count = candidates.len();
    let candidates = filter_by_amplitude(candidates, thresholds.peak_amp_thresh);
    let (peaks, valleys) = filter_by_shape(y, candidates, &thresholds);

    let mut result = PeakResult {
        peaks: PositionSeries::default(),
        valleys: PositionSeries::default(),
        warnings,
    };
    for (&key, record) in &peaks {
        result.peaks.push(x[key], record.amplitude);
    }
    for (&key, &amplitude) in &valleys {
        result.valleys.push(x[key], amplitude);
    }

    log::debug!(
        "Kept {} of {} candidate peaks, {} valleys",
        result.peaks.len(),
        candidate_count,
        result.valleys.len()
    );

    Ok(result)
}

fn missing_lattice(method: PeakMethod) -> PeakError {
    PeakError::Configuration(format!(
        "The {} method requires an interval lattice",
        method
    ))
}

/// Owns a histogram and remembers the last detection result
///
/// Re-smoothing goes through [`PeakEngine::histogram_mut`]; since detection
/// needs `&mut self`, the two can never overlap on one engine.
#[derive(Debug, Clone)]
pub struct PeakEngine {
    histogram: Histogram,
    last_result: Option<PeakResult>,
}

impl PeakEngine {
    /// Create an engine over `histogram`
    pub fn new(histogram: Histogram) -> Self {
        Self {
            histogram,
            last_result: None,
        }
    }

    /// Run detection and store the result
    ///
    /// See [`detect_peaks`] for the errors. On error the previous result is kept.
    pub fn detect(
        &mut self,
        config: &PeakDetectionConfig,
        lattice: Option<&IntervalLattice>,
    ) -> Result<&PeakResult, PeakError> {
        let result = detect_peaks(&self.histogram, config, lattice)?;
        Ok(self.last_result.insert(result))
    }

    /// Result of the last successful detection
    pub fn last_result(&self) -> Option<&PeakResult> {
        self.last_result.as_ref()
    }

    /// Analysed histogram
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Mutable access for changing smoothness and re-smoothing
    pub fn histogram_mut(&mut self) -> &mut Histogram {
        &mut self.histogram
    }

    /// Give back the histogram
    pub fn into_histogram(self) -> Histogram {
        self.histogram
    }
}
