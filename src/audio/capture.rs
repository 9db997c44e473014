use super::constants::FFT_SIZE;
use super::frame_exchange::FrameSender;
use super::window_functions::HannWindow;
use std::sync::Arc;

/// Collects mono samples on the audio thread and publishes windowed frames
///
/// Everything is allocated up front; `push_sample` only writes into the fixed
/// FIFO and, once per frame, into the shared analysis frame.
pub struct FrameCapture {
    /// Raw samples of the frame being collected
    fifo: Box<[f32; FFT_SIZE]>,
    /// Next write position in `fifo`
    fifo_index: usize,
    window: Arc<HannWindow>,
    frames: FrameSender,
}

impl FrameCapture {
    pub fn new(window: Arc<HannWindow>, frames: FrameSender) -> Self {
        Self {
            fifo: Box::new([0.0; FFT_SIZE]),
            fifo_index: 0,
            window,
            frames,
        }
    }

    /// Append one already mixed-down sample
    ///
    /// When this completes a frame it is windowed and published, or dropped if
    /// the analysis thread has not picked up the previous one yet. Collection of
    /// the next frame starts right away in both cases.
    pub fn push_sample(&mut self, sample: f32) {
        self.fifo[self.fifo_index] = sample;
        self.fifo_index += 1;

        if self.fifo_index == FFT_SIZE {
            let fifo = &self.fifo;
            let window = &self.window;
            self.frames.try_publish(|frame| {
                let (windowed, padding) = frame.split_at_mut(FFT_SIZE);
                window.apply(fifo, windowed);
                padding.fill(0.0);
            });

            self.fifo_index = 0;
        }
    }

    /// Mix every channel down to mono and push the result sample by sample
    ///
    /// Channels are averaged, so a full-scale signal on every channel stays at
    /// full scale.
    pub fn push_channels<S: AsRef<[f32]>>(&mut self, channels: &[S]) {
        let Some(first) = channels.first() else {
            return;
        };

        let num_samples = first.as_ref().len();
        let normalization = 1.0 / channels.len() as f32;

        for sample_idx in 0..num_samples {
            let sum: f32 = channels
                .iter()
                .map(|channel| channel.as_ref().get(sample_idx).copied().unwrap_or(0.0))
                .sum();
            self.push_sample(sum * normalization);
        }
    }

    /// Discard the partially collected frame
    pub fn reset(&mut self) {
        self.fifo.fill(0.0);
        self.fifo_index = 0;
    }

    /// Samples collected towards the next frame
    pub fn pending_samples(&self) -> usize {
        self.fifo_index
    }

    pub fn published_frames(&self) -> u64 {
        self.frames.published_frames()
    }

    pub fn dropped_frames(&self) -> u64 {
        self.frames.dropped_frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::constants::ANALYSIS_BUFFER_SIZE;
    use crate::audio::frame_exchange::{frame_exchange, FrameReceiver, FrameState};

    fn capture() -> (FrameCapture, FrameReceiver) {
        let (sender, receiver) = frame_exchange();
        (FrameCapture::new(Arc::new(HannWindow::new()), sender), receiver)
    }

    #[test]
    fn test_publishes_on_nth_sample() {
        let (mut capture, receiver) = capture();

        for _ in 0..FFT_SIZE - 1 {
            capture.push_sample(0.5);
        }
        assert_eq!(receiver.state(), FrameState::NotReady);
        assert_eq!(capture.pending_samples(), FFT_SIZE - 1);

        capture.push_sample(0.5);
        assert_eq!(receiver.state(), FrameState::Ready);
        assert_eq!(capture.pending_samples(), 0);
        assert_eq!(capture.published_frames(), 1);
    }

    #[test]
    fn test_published_frame_is_windowed_and_padded() {
        let (mut capture, mut receiver) = capture();
        let window = HannWindow::new();

        for _ in 0..FFT_SIZE {
            capture.push_sample(1.0);
        }

        let frame = receiver
            .try_consume(|frame| frame.to_vec())
            .expect("frame should be ready");
        assert_eq!(frame.len(), ANALYSIS_BUFFER_SIZE);
        for i in 0..FFT_SIZE {
            assert!((frame[i] - window.coefficients()[i]).abs() < 1e-6);
        }
        assert!(frame[FFT_SIZE..].iter().all(|&sample| sample == 0.0));
    }

    #[test]
    fn test_second_frame_dropped_while_pending() {
        let (mut capture, mut receiver) = capture();

        for _ in 0..FFT_SIZE {
            capture.push_sample(1.0);
        }
        for _ in 0..FFT_SIZE {
            capture.push_sample(-1.0);
        }

        assert_eq!(capture.published_frames(), 1);
        assert_eq!(capture.dropped_frames(), 1);
        // The pending frame still holds the first (positive) block
        let centre = receiver.try_consume(|frame| frame[FFT_SIZE / 2]).unwrap();
        assert!(centre > 0.0);
    }

    #[test]
    fn test_push_channels_averages() {
        let (mut capture, mut receiver) = capture();
        let left = vec![1.0f32; FFT_SIZE];
        let right = vec![0.0f32; FFT_SIZE];

        capture.push_channels(&[left.as_slice(), right.as_slice()]);

        let centre = receiver.try_consume(|frame| frame[FFT_SIZE / 2]).unwrap();
        let expected = 0.5 * HannWindow::new().coefficients()[FFT_SIZE / 2];
        assert!((centre - expected).abs() < 1e-6);
    }

    #[test]
    fn test_push_channels_without_channels_is_noop() {
        let (mut capture, _receiver) = capture();
        let channels: [&[f32]; 0] = [];
        capture.push_channels(&channels);
        assert_eq!(capture.pending_samples(), 0);
    }

    #[test]
    fn test_reset_rewinds_fifo() {
        let (mut capture, receiver) = capture();
        for _ in 0..100 {
            capture.push_sample(0.25);
        }
        capture.reset();
        assert_eq!(capture.pending_samples(), 0);

        for _ in 0..FFT_SIZE - 1 {
            capture.push_sample(0.25);
        }
        assert_eq!(receiver.state(), FrameState::NotReady);
    }
}
