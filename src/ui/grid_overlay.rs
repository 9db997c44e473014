use crate::audio::constants::{self, DB_MARKERS, FREQUENCY_MARKERS, MAJOR_FREQUENCY_MARKERS};
use crate::ui::display_mapping::{DisplayMapping, Point};

/// Lines closer than this to an edge are treated as lying on it
const EDGE_TOLERANCE: f32 = 1e-3;

fn inside(position: f32, extent: f32) -> bool {
    position > EDGE_TOLERANCE && position < extent - EDGE_TOLERANCE
}

/// Grid line data for spectrum display
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub start: Point,
    pub end: Point,
    /// Major lines carry a label
    pub label: Option<String>,
}

/// Vertical lines at the frequency markers, major ones labelled
///
/// Markers that land on or outside the display edges are skipped.
pub fn frequency_grid_lines(mapping: &DisplayMapping) -> Vec<GridLine> {
    FREQUENCY_MARKERS
        .iter()
        .filter_map(|&freq| {
            let x = mapping.frequency_to_x(freq);
            if !inside(x, mapping.width()) {
                return None;
            }

            let label = MAJOR_FREQUENCY_MARKERS
                .contains(&freq)
                .then(|| constants::format_frequency(freq));
            Some(GridLine {
                start: Point::new(x, 0.0),
                end: Point::new(x, mapping.height()),
                label,
            })
        })
        .collect()
}

/// Horizontal lines at the dB markers, all labelled
pub fn db_grid_lines(mapping: &DisplayMapping) -> Vec<GridLine> {
    DB_MARKERS
        .iter()
        .filter_map(|&db| {
            let y = mapping.magnitude_to_y(db);
            if !inside(y, mapping.height()) {
                return None;
            }

            Some(GridLine {
                start: Point::new(0.0, y),
                end: Point::new(mapping.width(), y),
                label: Some(constants::format_db(db)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_lines_skip_right_edge() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let lines = frequency_grid_lines(&mapping);

        // 20 kHz sits exactly on the right edge
        assert_eq!(lines.len(), FREQUENCY_MARKERS.len() - 1);
        let labels: Vec<_> = lines.iter().filter_map(|line| line.label.clone()).collect();
        assert_eq!(labels, vec!["100", "500", "1k", "5k", "10k"]);
        assert!(lines.iter().all(|line| line.start.x == line.end.x));
    }

    #[test]
    fn test_db_lines_skip_edges() {
        let mapping = DisplayMapping::new(1000.0, 500.0);
        let lines = db_grid_lines(&mapping);

        // 0 dB and -100 dB map onto the top and bottom edges
        assert_eq!(lines.len(), DB_MARKERS.len() - 2);
        assert_eq!(lines[0].label.as_deref(), Some("-6 dB"));
        let split = lines
            .iter()
            .find(|line| line.label.as_deref() == Some("-60 dB"))
            .unwrap();
        assert!((split.start.y - 175.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_display_has_no_grid() {
        let mapping = DisplayMapping::new(0.0, 0.0);
        assert!(frequency_grid_lines(&mapping).is_empty());
        assert!(db_grid_lines(&mapping).is_empty());
    }
}
