use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::processing::segmentation::SegmentError;

/// One labeled sample on the X axis with a value per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier reported in errors. The X position is the record's place
    /// in the sequence.
    pub index: usize,
    pub label: String,
    pub values: BTreeMap<String, f64>,
}

impl Record {
    pub fn new<I, K>(index: usize, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            index,
            label: label.into(),
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up a series value, failing if the field is absent or not a finite number.
    pub fn value(&self, field: &str) -> Result<f64, SegmentError> {
        let value = *self.values.get(field).ok_or_else(|| SegmentError::MissingField {
            index: self.index,
            label: self.label.clone(),
            field: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(SegmentError::NonFiniteValue {
                index: self.index,
                label: self.label.clone(),
                field: field.to_string(),
                value,
            });
        }
        Ok(value)
    }
}

/// Collect one field across all records, in order.
pub fn field_values(records: &[Record], field: &str) -> Result<Vec<f64>, SegmentError> {
    records.iter().map(|r| r.value(field)).collect()
}
