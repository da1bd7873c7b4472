//! Example: Detect tonal centers in a synthetic pitch histogram
//!
//! Run with `RUST_LOG=debug` to see the detection stages.

use stratum_tonic::config::DEFAULT_PROPAGATION_THRESH;
use stratum_tonic::{Histogram, IntervalLattice, PeakDetectionConfig, PeakEngine, PeakMethod};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let method: PeakMethod = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("hybrid")
        .parse()?;

    // One octave at 5-cent resolution: Sa, Ga, Pa and a weak Ni
    let centers = [(0.0, 1.0), (400.0, 0.6), (700.0, 0.9), (1100.0, 0.3)];
    let x: Vec<f32> = (0..300).map(|i| i as f32 * 5.0 - 150.0).collect();
    let y: Vec<f32> = x
        .iter()
        .map(|&c| {
            centers
                .iter()
                .map(|&(m, a)| a * (-(c - m).powi(2) / 1250.0).exp())
                .sum()
        })
        .collect();

    let histogram = Histogram::new(x, y, 3.0)?;
    let lattice = IntervalLattice::equal_tempered(-100.0, 1300.0, 100.0)?;
    let config = PeakDetectionConfig {
        method,
        peak_amp_thresh: 0.05,
        valley_thresh: 0.01,
        lookahead: 5,
        ..PeakDetectionConfig::default()
    };

    let mut engine = PeakEngine::new(histogram);
    let result = engine.detect(&config, Some(&lattice))?;

    println!("Detection ({}):", method);
    for (position, amplitude) in result.peaks.iter() {
        println!("  peak   {:>7.1} cents  density {:.3}", position, amplitude);
    }
    for (position, amplitude) in result.valleys.iter() {
        println!("  valley {:>7.1} cents  density {:.3}", position, amplitude);
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }

    let extended = result.extended_peaks(DEFAULT_PROPAGATION_THRESH);
    println!("Octave-extended peaks: {:?}", extended);

    Ok(())
}
