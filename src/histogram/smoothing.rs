//! Gaussian smoothing of histogram densities

/// Kernel half-width, in standard deviations
const TRUNCATE: f32 = 4.0;

/// Smooth a 1-D signal with a normalized Gaussian kernel
///
/// Boundaries are extended by half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`), so mass near the edges is not lost.
///
/// # Arguments
///
/// * `signal` - Signal to smooth
/// * `sigma` - Kernel standard deviation in samples (larger = smoother)
///
/// # Returns
///
/// Smoothed signal of the same length. `sigma <= 0` returns a copy of the input.
///
/// # Example
///
/// ```
/// use stratum_tonic::histogram::smoothing::gaussian_filter;
///
/// let signal = vec![0.0, 0.0, 1.0, 0.0, 0.0];
/// let smoothed = gaussian_filter(&signal, 1.0);
/// assert!(smoothed[2] < 1.0);
/// assert!((smoothed.iter().sum::<f32>() - 1.0).abs() < 1e-4);
/// ```
pub fn gaussian_filter(signal: &[f32], sigma: f32) -> Vec<f32> {
    let n = signal.len();
    if n == 0 || sigma.is_nan() || sigma <= 0.0 {
        return signal.to_vec();
    }

    let radius = (TRUNCATE * sigma + 0.5) as usize;
    if radius == 0 {
        return signal.to_vec();
    }

    let kernel = gaussian_kernel(sigma, radius);

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(j, &w)| {
                    let idx = reflect_index(i as isize + j as isize - radius as isize, n);
                    signal[idx] * w
                })
                .sum()
        })
        .collect()
}

fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    kernel
}

/// Map any index onto `[0, n)` by half-sample symmetric reflection.
/// Works for offsets larger than the signal itself.
fn reflect_index(idx: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = idx.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
