//! Window function for FFT spectral analysis
//!
//! The capture stage multiplies every completed frame by a Hann window before
//! handing it to the analysis stage.

use super::constants::FFT_SIZE;
use apodize::hanning_iter;

/// Pre-computed Hann window coefficients, one per sample of an analysis frame
///
/// Computed once at initialization and shared read-only by every frame, so the
/// audio thread never evaluates a cosine.
pub struct HannWindow {
    /// Window values [0.0..1.0], symmetric, zero at both edges
    coefficients: Box<[f32; FFT_SIZE]>,
}

impl HannWindow {
    /// Hann formula: w[n] = 0.5 * (1 - cos(2πn/(N-1))) for n = 0..N-1
    ///
    /// The N-1 denominator makes the window symmetric, with both the first and
    /// last coefficient at zero.
    pub fn new() -> Self {
        let mut coefficients = Box::new([0.0f32; FFT_SIZE]);
        for (coeff, w) in coefficients.iter_mut().zip(hanning_iter(FFT_SIZE)) {
            *coeff = w as f32;
        }

        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f32; FFT_SIZE] {
        &self.coefficients
    }

    /// Writes `samples[i] * w[i]` into `out`
    pub fn apply(&self, samples: &[f32; FFT_SIZE], out: &mut [f32]) {
        for ((out, &sample), &coeff) in out
            .iter_mut()
            .zip(samples.iter())
            .zip(self.coefficients.iter())
        {
            *out = sample * coeff;
        }
    }
}

impl Default for HannWindow {
    fn default() -> Self {
        Self::new()
    }
}
