use std::sync::{Arc, Mutex};
use triple_buffer::TripleBuffer;

use super::constants::{FALLBACK_SAMPLE_RATE, MIN_DB, NUM_BINS};
use super::peak_hold::PeakData;
use super::spectrum::{SpectrumAnalyser, SpectrumData};

/// Everything the rendering layer needs for one paint
#[derive(Clone)]
pub struct SpectrumSnapshot {
    pub spectrum: SpectrumData,
    pub peaks: PeakData,
    /// Sample rate the spectrum was computed with
    pub sample_rate: f32,
    pub peak_hold_enabled: bool,
    pub frames_processed: u64,
}

impl SpectrumSnapshot {
    /// All bins at the display floor
    pub fn silence() -> Self {
        Self {
            spectrum: [MIN_DB; NUM_BINS],
            peaks: [MIN_DB; NUM_BINS],
            sample_rate: FALLBACK_SAMPLE_RATE,
            peak_hold_enabled: true,
            frames_processed: 0,
        }
    }

    pub fn capture(analyser: &SpectrumAnalyser) -> Self {
        Self {
            spectrum: *analyser.spectrum(),
            peaks: *analyser.peaks(),
            sample_rate: analyser.sample_rate(),
            peak_hold_enabled: analyser.is_peak_hold_enabled(),
            frames_processed: analyser.frames_processed(),
        }
    }
}

/// Creates the publisher (refresh thread) and reader (rendering) pair
pub fn spectrum_channel() -> (SnapshotPublisher, SpectrumReader) {
    let (input, output) = TripleBuffer::new(&SpectrumSnapshot::silence()).split();
    (
        SnapshotPublisher { input },
        SpectrumReader {
            output: Arc::new(Mutex::new(output)),
        },
    )
}

/// Writes snapshots for the rendering layer (lock-free)
pub struct SnapshotPublisher {
    input: triple_buffer::Input<SpectrumSnapshot>,
}

impl SnapshotPublisher {
    pub fn publish(&mut self, snapshot: SpectrumSnapshot) {
        self.input.write(snapshot);
    }
}

/// Cloneable wrapper for the snapshot output (UI thread reads from this)
/// Uses Arc<Mutex<>> wrapper so several views can share one output
#[derive(Clone)]
pub struct SpectrumReader {
    output: Arc<Mutex<triple_buffer::Output<SpectrumSnapshot>>>,
}

impl SpectrumReader {
    /// Read the latest snapshot for display
    ///
    /// Never blocks: if another clone is reading right now this returns silence.
    pub fn read_or_silence(&self) -> SpectrumSnapshot {
        if let Ok(mut output) = self.output.try_lock() {
            output.read().clone()
        } else {
            SpectrumSnapshot::silence()
        }
    }
}
