use serde::Serialize;

use crate::data::record::{field_values, Record};
use crate::processing::segmentation::{self, Segment, StandardizedRecord};
use crate::processing::statistics::SeriesStats;
use crate::state::chart_config::SeriesStyle;

/// Everything the chart needs to draw one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub stats: Option<SeriesStats>,
    /// Original samples with their z-scores, used for markers and tooltips.
    pub points: Vec<StandardizedRecord>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesOutcome {
    Ready(SeriesData),
    /// The series could not be computed; only this series is skipped.
    Failed { error: String },
}

/// A configured series with its computed segments for one threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub style: SeriesStyle,
    pub threshold: f64,
    pub outcome: SeriesOutcome,
}

impl SeriesView {
    pub fn compute(records: &[Record], style: &SeriesStyle, threshold: f64) -> Self {
        let outcome = match Self::build(records, &style.field, threshold) {
            Ok(data) => SeriesOutcome::Ready(data),
            Err(e) => {
                tracing::warn!("Series {:?} not rendered: {e}", style.field);
                SeriesOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        Self {
            style: style.clone(),
            threshold,
            outcome,
        }
    }

    fn build(
        records: &[Record],
        field: &str,
        threshold: f64,
    ) -> Result<SeriesData, segmentation::SegmentError> {
        let stats = SeriesStats::compute(&field_values(records, field)?);
        let points = segmentation::standardize(records, &[field])?;
        let segments = segmentation::segment_standardized(&points, field, threshold)?;
        Ok(SeriesData {
            stats,
            points,
            segments,
        })
    }

    pub fn field(&self) -> &str {
        &self.style.field
    }

    pub fn data(&self) -> Option<&SeriesData> {
        match &self.outcome {
            SeriesOutcome::Ready(data) => Some(data),
            SeriesOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            SeriesOutcome::Ready(_) => None,
            SeriesOutcome::Failed { error } => Some(error),
        }
    }

    /// (x, value) pairs of a segment, ready for a line plot.
    pub fn line_points(&self, segment: &Segment) -> Vec<[f64; 2]> {
        segment
            .points
            .iter()
            .filter_map(|p| p.value(self.field()).map(|v| [p.position, v]))
            .collect()
    }

    /// Number of threshold crossings, one per shared boundary.
    pub fn crossing_count(&self) -> usize {
        self.data().map_or(0, |d| d.segments.len().saturating_sub(1))
    }

    /// Number of original samples above the threshold.
    pub fn flagged_count(&self) -> usize {
        self.data().map_or(0, |d| {
            d.points
                .iter()
                .filter_map(|p| p.zscore(self.field()))
                .filter(|&z| z > self.threshold)
                .count()
        })
    }
}
