//! Pitch-occurrence histogram over a cent-scale axis
//!
//! Keeps the raw densities alongside a Gaussian-smoothed copy. Peak detection
//! always runs on the smoothed densities.

pub mod smoothing;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SMOOTHNESS;
use crate::error::PeakError;
use smoothing::gaussian_filter;

/// Serializable snapshot of a histogram: bin positions, raw densities and
/// smoothing bandwidth. The smoothed densities are recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Bin positions (cents), strictly increasing
    pub x: Vec<f32>,
    /// Unsmoothed densities
    pub density_raw: Vec<f32>,
    /// Gaussian bandwidth in bins
    pub smoothness: f32,
}

/// Histogram of pitch-occurrence density
///
/// Invariant: `x`, `density` and `density_raw` have equal length and `x` is
/// strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    x: Vec<f32>,
    density_raw: Vec<f32>,
    density: Vec<f32>,
    smoothness: f32,
}

impl Histogram {
    /// Build a histogram and smooth it once with `smoothness`
    ///
    /// # Errors
    ///
    /// Returns `PeakError::InvalidInput` if `x` and `y` differ in length, `x` is
    /// not strictly increasing, any value is non-finite, or `smoothness` is
    /// negative.
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_tonic::Histogram;
    ///
    /// let x: Vec<f32> = (0..120).map(|i| i as f32 * 10.0).collect();
    /// let y = vec![0.0; 120];
    /// let histogram = Histogram::new(x, y, 7.0)?;
    /// assert_eq!(histogram.len(), 120);
    /// # Ok::<(), stratum_tonic::PeakError>(())
    /// ```
    pub fn new(x: Vec<f32>, y: Vec<f32>, smoothness: f32) -> Result<Self, PeakError> {
        if x.len() != y.len() {
            return Err(PeakError::InvalidInput(format!(
                "Histogram x and y lengths differ: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        validate_smoothness(smoothness)?;

        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(PeakError::InvalidInput(format!(
                "Non-finite bin position at index {}",
                i
            )));
        }
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            return Err(PeakError::InvalidInput(format!(
                "Non-finite density at index {}",
                i
            )));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PeakError::InvalidInput(format!(
                "Bin positions must be strictly increasing (index {}: {} -> {})",
                i + 1,
                x[i],
                x[i + 1]
            )));
        }

        let density = gaussian_filter(&y, smoothness);
        log::debug!(
            "Built histogram with {} bins, smoothness {}",
            x.len(),
            smoothness
        );

        Ok(Self {
            x,
            density_raw: y,
            density,
            smoothness,
        })
    }

    /// Build a histogram with [`DEFAULT_SMOOTHNESS`]
    pub fn with_default_smoothness(x: Vec<f32>, y: Vec<f32>) -> Result<Self, PeakError> {
        Self::new(x, y, DEFAULT_SMOOTHNESS)
    }

    /// Rebuild a histogram from a snapshot, re-smoothing the raw densities
    pub fn from_snapshot(data: HistogramData) -> Result<Self, PeakError> {
        Self::new(data.x, data.density_raw, data.smoothness)
    }

    /// Snapshot of the bin positions, raw densities and smoothness
    pub fn snapshot(&self) -> HistogramData {
        HistogramData {
            x: self.x.clone(),
            density_raw: self.density_raw.clone(),
            smoothness: self.smoothness,
        }
    }

    /// Change the smoothing bandwidth
    ///
    /// Only stores the value; call [`Histogram::smooth`] to apply it.
    pub fn set_smoothness(&mut self, smoothness: f32) -> Result<(), PeakError> {
        validate_smoothness(smoothness)?;
        self.smoothness = smoothness;
        Ok(())
    }

    /// Recompute the smoothed densities from the raw ones with the current smoothness
    pub fn smooth(&mut self) {
        log::debug!("Re-smoothing histogram with smoothness {}", self.smoothness);
        self.density = gaussian_filter(&self.density_raw, self.smoothness);
    }

    /// Bin positions
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Smoothed densities
    pub fn density(&self) -> &[f32] {
        &self.density
    }

    /// Unsmoothed densities
    pub fn density_raw(&self) -> &[f32] {
        &self.density_raw
    }

    /// Current smoothing bandwidth
    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the histogram has no bins
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

fn validate_smoothness(smoothness: f32) -> Result<(), PeakError> {
    if !smoothness.is_finite() || smoothness < 0.0 {
        return Err(PeakError::InvalidInput(format!(
            "Smoothness must be finite and non-negative, got {}",
            smoothness
        )));
    }
    Ok(())
}
