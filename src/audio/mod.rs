pub mod capture;
pub mod constants;
pub mod frame_exchange;
pub mod peak_hold;
pub mod refresh;
pub mod spectrum;
pub mod spectrum_channel;
pub mod window_functions;

use atomic_float::AtomicF32;
use std::sync::Arc;

use capture::FrameCapture;
use frame_exchange::frame_exchange;
use spectrum::SpectrumAnalyser;
use window_functions::HannWindow;

/// Builds a connected capture (audio thread) and analyser (refresh thread) pair
///
/// Both start from silence: an empty FIFO, no pending frame, and every bin
/// at the display floor.
pub fn analysis_pipeline(sample_rate: Arc<AtomicF32>) -> (FrameCapture, SpectrumAnalyser) {
    let (sender, receiver) = frame_exchange();
    let capture = FrameCapture::new(Arc::new(HannWindow::new()), sender);
    let analyser = SpectrumAnalyser::new(receiver, sample_rate);

    (capture, analyser)
}
