use crate::processing::segmentation::{Classification, Segment, StandardizedRecord};
use crate::state::chart_config::SeriesStyle;

/// How a single point marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub radius: f32,
    pub color: [u8; 4],
    pub filled: bool,
}

/// Per-point presentation for one series.
pub trait PointRenderer {
    fn color_for(&self, record: &StandardizedRecord) -> [u8; 4];

    fn marker_for(&self, record: &StandardizedRecord) -> Marker;

    fn tooltip_for(&self, record: &StandardizedRecord) -> String;

    /// Stroke color for a whole segment.
    fn segment_color(&self, segment: &Segment) -> [u8; 4];
}

/// Colors points and segments by which side of the threshold they fall on.
pub struct ThresholdRenderer<'a> {
    pub style: &'a SeriesStyle,
    pub threshold: f64,
    pub marker_radius: f32,
}

impl<'a> ThresholdRenderer<'a> {
    pub fn new(style: &'a SeriesStyle, threshold: f64, marker_radius: f32) -> Self {
        Self {
            style,
            threshold,
            marker_radius,
        }
    }

    /// Classification of one point, judged on its own z-score.
    pub fn classify(&self, record: &StandardizedRecord) -> Classification {
        record
            .zscore(&self.style.field)
            .map_or(Classification::Below, |z| Classification::of(z, self.threshold))
    }

    fn color_of(&self, classification: Classification) -> [u8; 4] {
        if classification.is_flagged() {
            self.style.flagged_color
        } else {
            self.style.color
        }
    }
}

impl PointRenderer for ThresholdRenderer<'_> {
    fn color_for(&self, record: &StandardizedRecord) -> [u8; 4] {
        self.color_of(self.classify(record))
    }

    fn marker_for(&self, record: &StandardizedRecord) -> Marker {
        let flagged = self.classify(record).is_flagged();
        Marker {
            radius: if flagged {
                self.marker_radius * 1.5
            } else {
                self.marker_radius
            },
            color: self.color_for(record),
            filled: flagged,
        }
    }

    fn tooltip_for(&self, record: &StandardizedRecord) -> String {
        let field = &self.style.field;
        let value = record
            .value(field)
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.0}"));
        let z = record
            .zscore(field)
            .map_or_else(|| "n/a".to_string(), |z| format!("{z:+.2}"));
        let mut text = format!("{}\n{field}: {value}  (z = {z})", record.label);
        if self.classify(record).is_flagged() {
            text.push_str(&format!("\nabove {:.2}\u{03c3}", self.threshold));
        }
        text
    }

    fn segment_color(&self, segment: &Segment) -> [u8; 4] {
        self.color_of(segment.classification)
    }
}

pub fn color32(rgba: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::state::chart_config::FLAGGED_COLOR;

    fn point(label: &str, value: f64, z: f64) -> StandardizedRecord {
        StandardizedRecord {
            position: 0.0,
            label: label.to_string(),
            values: BTreeMap::from([("pv".to_string(), value)]),
            zscores: BTreeMap::from([("pv".to_string(), z)]),
            interpolated: false,
        }
    }

    #[test]
    fn colors_follow_each_points_own_zscore() {
        let style = SeriesStyle::new("pv", [1, 2, 3, 255]);
        let renderer = ThresholdRenderer::new(&style, 1.0, 3.0);

        assert_eq!(renderer.color_for(&point("a", 10.0, 0.4)), [1, 2, 3, 255]);
        assert_eq!(renderer.color_for(&point("b", 10.0, 1.0)), [1, 2, 3, 255]);
        assert_eq!(renderer.color_for(&point("c", 10.0, 2.2)), FLAGGED_COLOR);
    }

    #[test]
    fn flagged_markers_are_larger_and_filled() {
        let style = SeriesStyle::new("pv", [1, 2, 3, 255]);
        let renderer = ThresholdRenderer::new(&style, 1.0, 4.0);

        let normal = renderer.marker_for(&point("a", 1.0, 0.0));
        assert_eq!(normal.radius, 4.0);
        assert!(!normal.filled);

        let flagged = renderer.marker_for(&point("b", 1.0, 3.0));
        assert_eq!(flagged.radius, 6.0);
        assert!(flagged.filled);
        assert_eq!(flagged.color, FLAGGED_COLOR);
    }

    #[test]
    fn tooltip_shows_value_and_zscore() {
        let style = SeriesStyle::new("pv", [0, 0, 0, 255]);
        let renderer = ThresholdRenderer::new(&style, 1.0, 3.0);

        let text = renderer.tooltip_for(&point("Page C", 9800.0, 2.2035));
        assert_eq!(text, "Page C\npv: 9800  (z = +2.20)\nabove 1.00\u{03c3}");

        let text = renderer.tooltip_for(&point("Page A", 2400.0, -0.7849));
        assert_eq!(text, "Page A\npv: 2400  (z = -0.78)");
    }

    #[test]
    fn segment_color_uses_classification() {
        let style = SeriesStyle::new("pv", [5, 5, 5, 255]);
        let renderer = ThresholdRenderer::new(&style, 1.0, 3.0);
        let above = Segment {
            classification: Classification::Above,
            points: vec![point("a", 1.0, 2.0), point("b", 1.0, 2.0)],
        };
        assert_eq!(renderer.segment_color(&above), FLAGGED_COLOR);
    }
}
