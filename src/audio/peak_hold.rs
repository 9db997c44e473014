use super::constants::{MIN_DB, NOISE_FLOOR_DB, NUM_BINS, PEAK_DECAY_DB, PEAK_DISPLAY_MARGIN_DB};

/// Per-bin peak levels in dB
pub type PeakData = [f32; NUM_BINS];

/// Next peak value for one bin
///
/// Peaks jump straight up to any louder level above the noise floor and
/// otherwise fall linearly by `PEAK_DECAY_DB` until they reach `MIN_DB`.
/// `level` is `None` on ticks without a fresh spectrum, which only decay.
/// A disabled tracker pins every peak to `MIN_DB`.
pub fn next_peak(current_peak: f32, level: Option<f32>, enabled: bool) -> f32 {
    if !enabled {
        return MIN_DB;
    }

    match level {
        Some(level) if level > NOISE_FLOOR_DB && level > current_peak => level,
        _ if current_peak > MIN_DB => (current_peak - PEAK_DECAY_DB).max(MIN_DB),
        _ => MIN_DB,
    }
}

/// Peak level as it should be drawn, or `None` when it sits on the floor
pub fn visible_peak(peak: f32) -> Option<f32> {
    if peak > MIN_DB + PEAK_DISPLAY_MARGIN_DB {
        Some(peak)
    } else {
        None
    }
}

/// Peak hold state for every bin of the spectrum
pub struct PeakHold {
    peaks: Box<PeakData>,
    enabled: bool,
}

impl PeakHold {
    pub fn new(enabled: bool) -> Self {
        Self {
            peaks: Box::new([MIN_DB; NUM_BINS]),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling clears every peak immediately
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.peaks.fill(MIN_DB);
    }

    /// Advance every bin by one tick
    ///
    /// `levels` holds the freshly computed spectrum, or `None` when the tick
    /// consumed no frame and the peaks should only decay.
    pub fn update(&mut self, levels: Option<&[f32; NUM_BINS]>) {
        let enabled = self.enabled;
        match levels {
            Some(levels) => {
                for (peak, &level) in self.peaks.iter_mut().zip(levels.iter()) {
                    *peak = next_peak(*peak, Some(level), enabled);
                }
            }
            None => {
                for peak in self.peaks.iter_mut() {
                    *peak = next_peak(*peak, None, enabled);
                }
            }
        }
    }

    pub fn peaks(&self) -> &PeakData {
        &self.peaks
    }
}
