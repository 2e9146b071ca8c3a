use serde::{Deserialize, Serialize};

use crate::data::record::Record;

/// An ordered collection of records plotted against their position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// The seven-page traffic sample shipped with the chart.
    pub fn sample() -> Self {
        const ROWS: [(&str, f64, f64, f64); 7] = [
            ("Page A", 4000.0, 2400.0, 2400.0),
            ("Page B", 3000.0, 1398.0, 2210.0),
            ("Page C", 2000.0, 9800.0, 2290.0),
            ("Page D", 2780.0, 3908.0, 2000.0),
            ("Page E", 1890.0, 4800.0, 2181.0),
            ("Page F", 2390.0, 3800.0, 2500.0),
            ("Page G", 3490.0, 4300.0, 2100.0),
        ];

        let records = ROWS
            .iter()
            .enumerate()
            .map(|(i, &(label, uv, pv, amt))| {
                Record::new(i, label, [("uv", uv), ("pv", pv), ("amt", amt)])
            })
            .collect();
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Label of the record at an X position, if the position lands on one.
    ///
    /// Positions count records in order and ignore `Record::index`.
    pub fn label_at(&self, position: f64) -> Option<&str> {
        if position < 0.0 || position.fract() != 0.0 {
            return None;
        }
        self.records
            .get(position as usize)
            .map(|r| r.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_seven_ordered_pages() {
        let data = Dataset::sample();
        assert_eq!(data.len(), 7);
        for (i, r) in data.records.iter().enumerate() {
            assert_eq!(r.index, i);
        }
        assert_eq!(data.records[2].value("pv").unwrap(), 9800.0);
        assert_eq!(data.records[6].value("uv").unwrap(), 3490.0);
    }

    #[test]
    fn label_at_only_matches_whole_positions() {
        let data = Dataset::sample();
        assert_eq!(data.label_at(0.0), Some("Page A"));
        assert_eq!(data.label_at(6.0), Some("Page G"));
        assert_eq!(data.label_at(2.5), None);
        assert_eq!(data.label_at(-1.0), None);
        assert_eq!(data.label_at(7.0), None);
    }

    #[test]
    fn label_at_uses_sequence_order_not_index() {
        let data = Dataset::new(vec![
            Record::new(10, "first", [("v", 1.0)]),
            Record::new(42, "second", [("v", 2.0)]),
        ]);
        assert_eq!(data.label_at(0.0), Some("first"));
        assert_eq!(data.label_at(1.0), Some("second"));
        assert_eq!(data.label_at(10.0), None);
    }
}
