use crate::audio::constants::{
    FFT_SIZE, MAX_DB, MAX_FREQUENCY, MIN_DB, MIN_FREQUENCY, SPLIT_POINT_DB, TOP_RATIO,
};

/// A position in display space, origin at the top left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Center frequency of an FFT bin
pub fn bin_to_frequency(bin: usize, sample_rate: f32) -> f32 {
    bin as f32 * sample_rate / FFT_SIZE as f32
}

/// Projects frequencies and dB levels onto a display of a given size
///
/// - x: logarithmic over 20 Hz..20 kHz
/// - y: piecewise linear, the top 35% of the height covers -60..0 dB and the
///   remaining 65% covers -100..-60 dB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    width: f32,
    height: f32,
}

impl DisplayMapping {
    pub fn new(width: f32, height: f32) -> Self {
        nih_plug::nih_debug_assert!(
            width >= 0.0 && height >= 0.0,
            "negative display size {}x{}",
            width,
            height
        );

        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Frequencies below `MIN_FREQUENCY` (including zero and negative values)
    /// map to the left edge
    pub fn frequency_to_x(&self, freq: f32) -> f32 {
        let log_min = libm::log10f(MIN_FREQUENCY);
        let log_max = libm::log10f(MAX_FREQUENCY);
        let log_freq = libm::log10f(freq.max(MIN_FREQUENCY));

        self.width * (log_freq - log_min) / (log_max - log_min)
    }

    pub fn magnitude_to_y(&self, db: f32) -> f32 {
        if db >= SPLIT_POINT_DB {
            let normalized = (MAX_DB - db) / (MAX_DB - SPLIT_POINT_DB);
            self.height * TOP_RATIO * normalized
        } else {
            let normalized = (SPLIT_POINT_DB - db) / (SPLIT_POINT_DB - MIN_DB);
            self.height * TOP_RATIO + self.height * (1.0 - TOP_RATIO) * normalized
        }
    }

    /// Display position of one bin at the given level
    pub fn bin_to_point(&self, bin: usize, db: f32, sample_rate: f32) -> Point {
        Point::new(
            self.frequency_to_x(bin_to_frequency(bin, sample_rate)),
            self.magnitude_to_y(db),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_frequency_edges() {
        let mapping = DisplayMapping::new(800.0, 400.0);
        assert!(mapping.frequency_to_x(MIN_FREQUENCY).abs() < EPSILON);
        assert!((mapping.frequency_to_x(MAX_FREQUENCY) - 800.0).abs() < EPSILON);
    }

    #[test]
    fn test_frequency_is_logarithmic() {
        let mapping = DisplayMapping::new(900.0, 400.0);
        // 20 -> 200 -> 2000 -> 20000 are three equal decades
        assert!((mapping.frequency_to_x(200.0) - 300.0).abs() < EPSILON);
        assert!((mapping.frequency_to_x(2000.0) - 600.0).abs() < EPSILON);
    }

    #[test]
    fn test_non_positive_frequency_is_guarded() {
        let mapping = DisplayMapping::new(800.0, 400.0);
        assert_eq!(mapping.frequency_to_x(0.0), mapping.frequency_to_x(MIN_FREQUENCY));
        assert_eq!(mapping.frequency_to_x(-5.0), mapping.frequency_to_x(MIN_FREQUENCY));
        assert!(mapping.frequency_to_x(0.0).is_finite());
    }

    #[test]
    fn test_magnitude_edges_and_split_point() {
        let mapping = DisplayMapping::new(800.0, 400.0);
        assert!(mapping.magnitude_to_y(MAX_DB).abs() < EPSILON);
        assert!((mapping.magnitude_to_y(MIN_DB) - 400.0).abs() < EPSILON);
        assert!((mapping.magnitude_to_y(SPLIT_POINT_DB) - 400.0 * 0.35).abs() < EPSILON);
    }

    #[test]
    fn test_magnitude_regions_are_linear() {
        let mapping = DisplayMapping::new(800.0, 400.0);
        // Halfway through the loud region
        assert!((mapping.magnitude_to_y(-30.0) - 70.0).abs() < EPSILON);
        // Halfway through the quiet region
        assert!((mapping.magnitude_to_y(-80.0) - (140.0 + 130.0)).abs() < EPSILON);
    }

    #[test]
    fn test_bin_to_frequency() {
        assert_eq!(bin_to_frequency(0, 44100.0), 0.0);
        assert!((bin_to_frequency(93, 44100.0) - 1001.29).abs() < 0.01);
        assert!((bin_to_frequency(FFT_SIZE / 2, 48000.0) - 24000.0).abs() < EPSILON);
    }

    #[test]
    fn test_bin_to_point() {
        let mapping = DisplayMapping::new(800.0, 400.0);
        let point = mapping.bin_to_point(93, SPLIT_POINT_DB, 44100.0);
        assert!((point.x - mapping.frequency_to_x(bin_to_frequency(93, 44100.0))).abs() < EPSILON);
        assert!((point.y - 140.0).abs() < EPSILON);
    }
}
