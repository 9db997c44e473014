//! Analysis and display constants shared by the capture, analysis and mapping stages
//! Everything here is fixed at build time

/// FFT size (N). Must stay a power of two
pub const FFT_SIZE: usize = 4096;

/// Number of displayed frequency bins (N/2)
pub const NUM_BINS: usize = FFT_SIZE / 2;

/// Analysis buffer length: N windowed samples followed by N zeros
pub const ANALYSIS_BUFFER_SIZE: usize = FFT_SIZE * 2;

/// Used until the host reports a sample rate
pub const FALLBACK_SAMPLE_RATE: f32 = 44100.0;

/// Frequency range constants
pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20000.0;

/// dB range for spectrum display
pub const MAX_DB: f32 = 0.0;
pub const MIN_DB: f32 = -100.0;

/// Share of the previous smoothed level kept on every new frame
pub const SPECTRUM_SMOOTHING: f32 = 0.7;

/// Peak hold decay per tick (~18 dB/s at 60 Hz)
pub const PEAK_DECAY_DB: f32 = 0.3;

/// Levels at or below this never raise a peak
pub const NOISE_FLOOR_DB: f32 = -96.0;

/// Peaks within this distance of MIN_DB are not drawn
pub const PEAK_DISPLAY_MARGIN_DB: f32 = 5.0;

/// Breakpoint of the piecewise dB axis
pub const SPLIT_POINT_DB: f32 = -60.0;

/// Share of the display height given to [SPLIT_POINT_DB, MAX_DB]
pub const TOP_RATIO: f32 = 0.35;

/// Refresh rate of the analysis tick
pub const TICK_RATE_HZ: f32 = 60.0;

/// Frequency grid lines
pub const FREQUENCY_MARKERS: &[f32] = &[
    50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 400.0, 500.0, 600.0, 800.0, 1000.0, 2000.0, 3000.0,
    4000.0, 5000.0, 6000.0, 8000.0, 10000.0, 15000.0, 20000.0,
];

/// Frequency grid lines that carry a label
pub const MAJOR_FREQUENCY_MARKERS: &[f32] = &[100.0, 500.0, 1000.0, 5000.0, 10000.0, 20000.0];

/// dB grid lines, denser towards the top of the range
pub const DB_MARKERS: &[f32] = &[0.0, -6.0, -12.0, -24.0, -40.0, -60.0, -80.0, -100.0];

// === HELPER FUNCTIONS ===

/// Format a frequency for a grid label ("100", "1k", "20k")
pub fn format_frequency(freq: f32) -> String {
    if freq >= 1000.0 {
        format!("{:.0}k", freq / 1000.0)
    } else {
        format!("{}", freq as i32)
    }
}

/// Format a dB grid label
pub fn format_db(db: f32) -> String {
    format!("{} dB", db as i32)
}
