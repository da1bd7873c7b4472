//! # Stratum Tonic
//!
//! Peak and valley extraction from pitch-occurrence histograms on a cent
//! scale, used to locate the tonal centers of a performance.
//!
//! ## Features
//!
//! - **Histogram**: raw and Gaussian-smoothed densities over cent bins
//! - **Slope detection**: lookahead extrema bounded by their valleys
//! - **Interval detection**: one peak per interval of a reference lattice
//! - **Hybrid detection**: slope peaks completed by lattice-aligned peaks
//! - **Octave propagation**: predict the same peaks in neighbouring octaves
//!
//! ## Quick Start
//!
//! ```
//! use stratum_tonic::{detect_peaks, Histogram, IntervalLattice, PeakDetectionConfig, PeakMethod};
//!
//! // Two tonal centers, at 200 and 700 cents
//! let x: Vec<f32> = (0..240).map(|i| i as f32 * 5.0).collect();
//! let y: Vec<f32> = x
//!     .iter()
//!     .map(|&c| (-(c - 200.0).powi(2) / 1800.0).exp() + 0.6 * (-(c - 700.0).powi(2) / 1800.0).exp())
//!     .collect();
//! let histogram = Histogram::new(x, y, 2.0)?;
//!
//! let lattice = IntervalLattice::equal_tempered(0.0, 1100.0, 100.0)?;
//! let config = PeakDetectionConfig {
//!     method: PeakMethod::Hybrid,
//!     peak_amp_thresh: 0.05,
//!     valley_thresh: 0.01,
//!     lookahead: 5,
//!     ..PeakDetectionConfig::default()
//! };
//! let result = detect_peaks(&histogram, &config, Some(&lattice))?;
//!
//! for (position, amplitude) in result.peaks.iter() {
//!     println!("peak at {:.0} cents (density {:.3})", position, amplitude);
//! }
//! # Ok::<(), stratum_tonic::PeakError>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! (x, y) → Histogram (smoothing) → strategy (slope / interval / hybrid)
//!        → amplitude, lobe-shape and valley filters → PeakResult → extend_peaks
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod histogram;
pub mod intervals;
pub mod peaks;

// Re-export main types
pub use config::{PeakDetectionConfig, PeakMethod};
pub use error::PeakError;
pub use histogram::{Histogram, HistogramData};
pub use intervals::IntervalLattice;
pub use peaks::{detect_peaks, extend_peaks, ClampWarning, PeakEngine, PeakResult, PositionSeries};
