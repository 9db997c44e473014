use crate::audio::constants::{MAX_FREQUENCY, MIN_FREQUENCY, NUM_BINS};
use crate::audio::peak_hold::visible_peak;
use crate::audio::spectrum_channel::SpectrumSnapshot;
use crate::ui::display_mapping::{bin_to_frequency, DisplayMapping, Point};

/// Bins worth drawing: DC is skipped, and so is anything outside 20 Hz..20 kHz
fn displayed_bins(sample_rate: f32) -> impl Iterator<Item = usize> {
    (1..NUM_BINS).filter(move |&bin| {
        let freq = bin_to_frequency(bin, sample_rate);
        (MIN_FREQUENCY..=MAX_FREQUENCY).contains(&freq)
    })
}

/// Polyline of the smoothed spectrum, in bin order
pub fn spectrum_trace(mapping: &DisplayMapping, snapshot: &SpectrumSnapshot) -> Vec<Point> {
    displayed_bins(snapshot.sample_rate)
        .map(|bin| mapping.bin_to_point(bin, snapshot.spectrum[bin], snapshot.sample_rate))
        .collect()
}

/// Peak hold polylines
///
/// Bins sitting on the floor split the trace so the line does not flicker
/// along the bottom edge. Returns nothing when peak hold is off or no bin has
/// a visible peak.
pub fn peak_segments(mapping: &DisplayMapping, snapshot: &SpectrumSnapshot) -> Vec<Vec<Point>> {
    let mut segments = Vec::new();
    if !snapshot.peak_hold_enabled {
        return segments;
    }

    let mut current: Vec<Point> = Vec::new();
    for bin in displayed_bins(snapshot.sample_rate) {
        match visible_peak(snapshot.peaks[bin]) {
            Some(peak) => current.push(mapping.bin_to_point(bin, peak, snapshot.sample_rate)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::constants::{FFT_SIZE, MIN_DB};

    fn snapshot(sample_rate: f32) -> SpectrumSnapshot {
        let mut snapshot = SpectrumSnapshot::silence();
        snapshot.sample_rate = sample_rate;
        snapshot
    }

    #[test]
    fn test_trace_covers_audible_bins_only() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let trace = spectrum_trace(&mapping, &snapshot(44100.0));

        // 44100 / 4096 ≈ 10.77 Hz per bin: bins 2..=1857 lie within 20 Hz..20 kHz
        let first_bin = (MIN_FREQUENCY * FFT_SIZE as f32 / 44100.0).ceil() as usize;
        let last_bin = (MAX_FREQUENCY * FFT_SIZE as f32 / 44100.0).floor() as usize;
        assert_eq!(trace.len(), last_bin - first_bin + 1);

        assert!(trace.windows(2).all(|pair| pair[0].x < pair[1].x));
        assert!(trace.iter().all(|point| (point.y - 500.0).abs() < 1e-3));
        assert!(trace.iter().all(|point| point.x >= 0.0 && point.x <= 1000.0));
    }

    #[test]
    fn test_trace_follows_levels() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let mut snapshot = snapshot(44100.0);
        snapshot.spectrum[93] = 0.0;

        let trace = spectrum_trace(&mapping, &snapshot);
        let top = trace
            .iter()
            .find(|point| point.y.abs() < 1e-3)
            .expect("bin 93 should reach the top edge");
        assert!((top.x - mapping.bin_to_point(93, 0.0, 44100.0).x).abs() < 1e-3);
    }

    #[test]
    fn test_peak_segments_split_on_floor() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let mut snapshot = snapshot(44100.0);
        for bin in 100..110 {
            snapshot.peaks[bin] = -40.0;
        }
        for bin in 200..205 {
            snapshot.peaks[bin] = -50.0;
        }
        // Within 5 dB of the floor: not drawn
        snapshot.peaks[300] = MIN_DB + 4.0;

        let segments = peak_segments(&mapping, &snapshot);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 10);
        assert_eq!(segments[1].len(), 5);
    }

    #[test]
    fn test_no_peak_segments_when_disabled_or_silent() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let mut snapshot = snapshot(44100.0);
        assert!(peak_segments(&mapping, &snapshot).is_empty());

        snapshot.peaks[150] = -20.0;
        snapshot.peak_hold_enabled = false;
        assert!(peak_segments(&mapping, &snapshot).is_empty());
    }
}
