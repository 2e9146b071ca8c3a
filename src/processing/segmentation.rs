//! Threshold segmentation of standardized series.
//!
//! A series is split wherever its z-score crosses the threshold. Each crossing
//! gets a synthetic boundary record, interpolated linearly between the two
//! samples that straddle it, and that record closes one segment and opens the
//! next. A line drawn per segment therefore changes color exactly at the
//! crossing instead of at the nearest sample.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::record::{field_values, Record};
use crate::processing::statistics::SeriesStats;

/// Default deviation threshold, in standard deviations.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    #[error("record {index} ({label:?}) has no numeric field {field:?}")]
    MissingField {
        index: usize,
        label: String,
        field: String,
    },

    #[error("record {index} ({label:?}) field {field:?} is not a finite number: {value}")]
    NonFiniteValue {
        index: usize,
        label: String,
        field: String,
        value: f64,
    },

    #[error("sample {position} is not a finite number: {value}")]
    NonFiniteSample { position: usize, value: f64 },

    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),

    #[error("field {0:?} has no z-score; standardize it before segmenting")]
    NotStandardized(String),
}

/// Which side of the threshold a point or segment falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Below,
    Above,
}

impl Classification {
    /// Strictly greater than the threshold is flagged; equal is not.
    pub fn of(z: f64, threshold: f64) -> Self {
        if z > threshold {
            Classification::Above
        } else {
            Classification::Below
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Classification::Above)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Below => "below",
            Classification::Above => "above",
        }
    }
}

/// A record together with its z-score for each standardized field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedRecord {
    /// X position. Whole numbers for samples, fractional for boundaries.
    pub position: f64,
    pub label: String,
    pub values: BTreeMap<String, f64>,
    pub zscores: BTreeMap<String, f64>,
    /// Set on synthetic boundary records.
    pub interpolated: bool,
}

impl StandardizedRecord {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    pub fn zscore(&self, field: &str) -> Option<f64> {
        self.zscores.get(field).copied()
    }

    /// Boundary record at parameter `t` between `a` and `b`.
    ///
    /// Every numeric field moves by the same `t`. The segmented field's
    /// z-score is pinned to `threshold` so both adjacent segments agree on it.
    fn boundary(
        a: &StandardizedRecord,
        b: &StandardizedRecord,
        t: f64,
        field: &str,
        threshold: f64,
    ) -> Self {
        let mut zscores = lerp_map(&a.zscores, &b.zscores, t);
        zscores.insert(field.to_string(), threshold);

        Self {
            position: lerp(a.position, b.position, t),
            label: format!("{}..{}", a.label, b.label),
            values: lerp_map(&a.values, &b.values, t),
            zscores,
            interpolated: true,
        }
    }
}

/// Weighted form: stays finite for finite endpoints and `t` in `[0, 1]`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Fields missing on the right keep the left value.
fn lerp_map(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>, t: f64) -> BTreeMap<String, f64> {
    a.iter()
        .map(|(k, &va)| {
            let v = b.get(k).map_or(va, |&vb| lerp(va, vb, t));
            (k.clone(), v)
        })
        .collect()
}

/// A contiguous run drawn in a single color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub classification: Classification,
    pub points: Vec<StandardizedRecord>,
}

impl Segment {
    pub fn is_flagged(&self) -> bool {
        self.classification.is_flagged()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Standardize `fields` over the whole sequence.
///
/// A record's X position is its place in `records`, not its `index`.
/// Statistics are computed once per field across all records, so every
/// z-score (and any boundary derived from them later) uses the same mean
/// and standard deviation. Fails on the first record missing a field.
pub fn standardize(records: &[Record], fields: &[&str]) -> Result<Vec<StandardizedRecord>, SegmentError> {
    let mut columns = Vec::with_capacity(fields.len());
    for &field in fields {
        let values = field_values(records, field)?;
        let stats = SeriesStats::compute(&values);
        columns.push((field, values, stats));
    }

    let standardized = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let zscores = columns
                .iter()
                .map(|(field, values, stats)| {
                    let z = stats.as_ref().map_or(0.0, |s| s.zscore(values[i]));
                    (field.to_string(), z)
                })
                .collect();
            StandardizedRecord {
                position: i as f64,
                label: record.label.clone(),
                values: record.values.clone(),
                zscores,
                interpolated: false,
            }
        })
        .collect();

    Ok(standardized)
}

/// Split an already standardized sequence at every crossing of `threshold`
/// by `field`'s z-score.
///
/// Fewer than two records cannot form a line, so they yield no segments.
pub fn segment_standardized(
    records: &[StandardizedRecord],
    field: &str,
    threshold: f64,
) -> Result<Vec<Segment>, SegmentError> {
    if !threshold.is_finite() {
        return Err(SegmentError::InvalidThreshold(threshold));
    }
    let zs = records
        .iter()
        .enumerate()
        .map(|(i, r)| match r.zscore(field) {
            None => Err(SegmentError::NotStandardized(field.to_string())),
            Some(z) if !z.is_finite() => Err(SegmentError::NonFiniteValue {
                index: i,
                label: r.label.clone(),
                field: field.to_string(),
                value: z,
            }),
            Some(z) => Ok(z),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if records.len() < 2 {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut current = Classification::of(zs[0], threshold);
    let mut points = vec![records[0].clone()];

    for (i, pair) in records.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        let (za, zb) = (zs[i], zs[i + 1]);
        let next = Classification::of(zb, threshold);

        if next != current {
            // Classes differ, so exactly one of za, zb exceeds the threshold and za != zb.
            let t = (threshold - za) / (zb - za);
            let boundary = StandardizedRecord::boundary(a, b, t, field, threshold);
            points.push(boundary.clone());
            segments.push(Segment {
                classification: current,
                points: std::mem::replace(&mut points, vec![boundary]),
            });
            current = next;
        }
        points.push(b.clone());
    }

    segments.push(Segment {
        classification: current,
        points,
    });
    segments.retain(|s| s.len() > 1);

    Ok(segments)
}

/// Standardize `field` over `records` and split it at threshold crossings.
pub fn segment(records: &[Record], field: &str, threshold: f64) -> Result<Vec<Segment>, SegmentError> {
    let standardized = standardize(records, &[field])?;
    segment_standardized(&standardized, field, threshold)
}
