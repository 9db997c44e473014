use atomic_float::AtomicF32;
use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use std::sync::{atomic::Ordering, Arc};

use super::constants::{
    FALLBACK_SAMPLE_RATE, FFT_SIZE, MAX_DB, MIN_DB, NUM_BINS, SPECTRUM_SMOOTHING,
};
use super::frame_exchange::{FrameReceiver, FrameState};
use super::peak_hold::{PeakData, PeakHold};

/// The analyser's smoothed level per frequency bin, in dB
pub type SpectrumData = [f32; NUM_BINS];

/// Converts a normalized magnitude to dB, clamped to the display range
///
/// Zero (or negative) magnitudes map to the display floor instead of -inf.
pub fn magnitude_to_db(magnitude: f32) -> f32 {
    let db = if magnitude > 0.0 {
        20.0 * libm::log10f(magnitude)
    } else {
        MIN_DB
    };

    db.clamp(MIN_DB, MAX_DB)
}

/// First-order low-pass on the dB trace of one bin
///
/// y[n] = α*y[n-1] + (1-α)*x[n] with α = `SPECTRUM_SMOOTHING`, clamped so
/// rounding never pushes a level outside the display range
pub fn smooth_level(previous_db: f32, new_db: f32) -> f32 {
    let smoothed = previous_db * SPECTRUM_SMOOTHING + new_db * (1.0 - SPECTRUM_SMOOTHING);
    smoothed.clamp(MIN_DB, MAX_DB)
}

/// Turns published analysis frames into smoothed dB levels and peak holds
///
/// Lives on the refresh thread. Apart from the frame hand-off and the sample
/// rate atomic nothing in here is shared with the audio thread.
pub struct SpectrumAnalyser {
    frames: FrameReceiver,

    /// FFT processing engine
    fft_processor: Arc<dyn RealToComplex<f32>>,
    /// Output buffer for FFT results (frequency domain)
    frequency_domain_buffer: Vec<Complex32>,
    fft_scratch: Vec<Complex32>,

    /// Current spectrum result with smoothing applied
    spectrum: Box<SpectrumData>,
    peak_hold: PeakHold,

    /// Host sample rate, written by the plugin
    sample_rate_source: Arc<AtomicF32>,
    /// Sample rate of the last transformed frame
    sample_rate: f32,

    frames_processed: u64,
}

impl SpectrumAnalyser {
    pub fn new(frames: FrameReceiver, sample_rate_source: Arc<AtomicF32>) -> Self {
        let mut fft_planner = RealFftPlanner::<f32>::new();
        let fft_processor = fft_planner.plan_fft_forward(FFT_SIZE);
        let frequency_domain_buffer = fft_processor.make_output_vec();
        let fft_scratch = fft_processor.make_scratch_vec();

        Self {
            frames,
            fft_processor,
            frequency_domain_buffer,
            fft_scratch,
            spectrum: Box::new([MIN_DB; NUM_BINS]),
            peak_hold: PeakHold::new(true),
            sample_rate_source,
            sample_rate: FALLBACK_SAMPLE_RATE,
            frames_processed: 0,
        }
    }

    /// One refresh step
    ///
    /// Transforms the pending frame if there is one, then advances the peak
    /// hold. Ticks without a new frame leave the spectrum alone and only let
    /// the peaks decay.
    pub fn tick(&mut self) {
        if self.update_spectrum() {
            self.frames_processed += 1;
            self.peak_hold.update(Some(&*self.spectrum));
        } else {
            self.peak_hold.update(None);
        }
    }

    /// Returns `false` when no frame was pending
    fn update_spectrum(&mut self) -> bool {
        if self.frames.state() != FrameState::Ready {
            return false;
        }

        let sample_rate = self.sample_rate_source.load(Ordering::Relaxed);
        self.sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            FALLBACK_SAMPLE_RATE
        };

        let fft_processor = &self.fft_processor;
        let frequency_domain_buffer = &mut self.frequency_domain_buffer;
        let fft_scratch = &mut self.fft_scratch;
        let result = self.frames.try_consume(|frame| {
            // Only the windowed first half carries signal, the rest is zero padding
            fft_processor.process_with_scratch(
                &mut frame[..FFT_SIZE],
                frequency_domain_buffer,
                fft_scratch,
            )
        });

        match result {
            Some(Ok(())) => {}
            Some(Err(err)) => {
                nih_plug::nih_debug_assert_failure!("FFT failed on a fixed-size frame: {}", err);
                return false;
            }
            None => return false,
        }

        for (level, bin) in self
            .spectrum
            .iter_mut()
            .zip(self.frequency_domain_buffer.iter())
        {
            let magnitude = bin.norm() / FFT_SIZE as f32;
            *level = smooth_level(*level, magnitude_to_db(magnitude));
        }

        true
    }

    pub fn set_peak_hold_enabled(&mut self, enabled: bool) {
        self.peak_hold.set_enabled(enabled);
    }

    pub fn is_peak_hold_enabled(&self) -> bool {
        self.peak_hold.is_enabled()
    }

    pub fn spectrum(&self) -> &SpectrumData {
        &self.spectrum
    }

    pub fn peaks(&self) -> &PeakData {
        self.peak_hold.peaks()
    }

    /// Sample rate used for the most recent frame, for bin to frequency mapping
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frame_state(&self) -> FrameState {
        self.frames.state()
    }
}
