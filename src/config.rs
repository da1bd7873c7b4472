//! Configuration parameters for peak detection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeakError;

/// One octave, in cents
pub const OCTAVE_CENTS: f32 = 1200.0;

/// How far (in cents) a query may fall outside the lattice before
/// [`IntervalLattice::nearest`](crate::intervals::IntervalLattice::nearest) refuses it
pub const LATTICE_TOLERANCE_CENTS: f32 = 25.0;

/// Default cent range used when propagating peaks into neighbouring octaves
pub const DEFAULT_PROPAGATION_THRESH: f32 = 50.0;

/// Default Gaussian bandwidth (in bins) applied when a histogram is built
pub const DEFAULT_SMOOTHNESS: f32 = 7.0;

/// Smallest accepted left-lobe/right-lobe length ratio
pub const MIN_LOBE_RATIO: f32 = 0.15;

/// Largest accepted left-lobe/right-lobe length ratio (≈ 1 / 0.15)
pub const MAX_LOBE_RATIO: f32 = 6.67;

/// Peak detection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakMethod {
    /// Lookahead slope analysis; valleys come from the signal itself
    #[default]
    Slope,
    /// One local maximum per lattice interval
    Interval,
    /// Slope peaks plus interval peaks that no slope peak already covers
    Hybrid,
}

impl PeakMethod {
    /// Whether this method needs an [`IntervalLattice`](crate::intervals::IntervalLattice)
    pub fn requires_lattice(self) -> bool {
        matches!(self, PeakMethod::Interval | PeakMethod::Hybrid)
    }

    /// Whether the slope strategy participates in this method
    pub fn uses_slope(self) -> bool {
        matches!(self, PeakMethod::Slope | PeakMethod::Hybrid)
    }

    /// Lowercase method name
    pub fn as_str(self) -> &'static str {
        match self {
            PeakMethod::Slope => "slope",
            PeakMethod::Interval => "interval",
            PeakMethod::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for PeakMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeakMethod {
    type Err = PeakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slope" => Ok(PeakMethod::Slope),
            "interval" => Ok(PeakMethod::Interval),
            "hybrid" => Ok(PeakMethod::Hybrid),
            other => Err(PeakError::InvalidInput(format!(
                "Unknown peak method '{}', expected slope/interval/hybrid",
                other
            ))),
        }
    }
}

/// Peak detection configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDetectionConfig {
    /// Detection strategy (default: Slope)
    pub method: PeakMethod,

    /// Minimum amplitude a peak needs in the smoothed histogram (default: 0.00005)
    pub peak_amp_thresh: f32,

    /// Minimum depth of the valleys around a peak (default: 0.00003)
    /// Also used as the noise floor (delta) of the slope extrema finder
    pub valley_thresh: f32,

    /// Samples inspected ahead to confirm a slope extremum (default: 20)
    pub lookahead: usize,

    /// Expected distance between neighbouring peaks, in x units (default: 100.0)
    /// Half of it is the fallback valley distance for slope peaks at the edges
    pub avg_interval: f32,

    /// Lower bound for the left/right lobe length ratio (default: 0.15)
    pub min_lobe_ratio: f32,

    /// Upper bound for the left/right lobe length ratio (default: 6.67)
    pub max_lobe_ratio: f32,
}

impl Default for PeakDetectionConfig {
    fn default() -> Self {
        Self {
            method: PeakMethod::Slope,
            peak_amp_thresh: 0.00005,
            valley_thresh: 0.00003,
            lookahead: 20,
            avg_interval: 100.0,
            min_lobe_ratio: MIN_LOBE_RATIO,
            max_lobe_ratio: MAX_LOBE_RATIO,
        }
    }
}

impl PeakDetectionConfig {
    /// Default configuration with the given method
    pub fn with_method(method: PeakMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Check that all parameters are usable
    ///
    /// # Errors
    ///
    /// Returns `PeakError::InvalidInput` for negative or non-finite thresholds,
    /// a zero lookahead, a non-positive `avg_interval` or inverted lobe ratios.
    pub fn validate(&self) -> Result<(), PeakError> {
        if !self.peak_amp_thresh.is_finite() || self.peak_amp_thresh < 0.0 {
            return Err(PeakError::InvalidInput(format!(
                "peak_amp_thresh must be finite and non-negative, got {}",
                self.peak_amp_thresh
            )));
        }
        if !self.valley_thresh.is_finite() || self.valley_thresh < 0.0 {
            return Err(PeakError::InvalidInput(format!(
                "valley_thresh must be finite and non-negative, got {}",
                self.valley_thresh
            )));
        }
        if self.lookahead == 0 {
            return Err(PeakError::InvalidInput(
                "lookahead must be at least 1".to_string(),
            ));
        }
        if !self.avg_interval.is_finite() || self.avg_interval <= 0.0 {
            return Err(PeakError::InvalidInput(format!(
                "avg_interval must be positive, got {}",
                self.avg_interval
            )));
        }
        if !(self.min_lobe_ratio > 0.0 && self.min_lobe_ratio < self.max_lobe_ratio) {
            return Err(PeakError::InvalidInput(format!(
                "Lobe ratio bounds must satisfy 0 < min < max, got [{}, {}]",
                self.min_lobe_ratio, self.max_lobe_ratio
            )));
        }
        Ok(())
    }
}
