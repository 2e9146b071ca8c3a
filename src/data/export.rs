use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::state::series_view::SeriesView;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One exported row: a point of one segment of one series.
#[derive(Debug, Serialize)]
struct SegmentRow<'a> {
    series: &'a str,
    segment: usize,
    classification: &'static str,
    x: f64,
    label: &'a str,
    value: Option<f64>,
    z: Option<f64>,
    interpolated: bool,
}

/// Write every segment point of every computed series as CSV.
///
/// Boundary points appear twice, once at the end of the outgoing segment and
/// once at the start of the incoming one. Failed series are skipped.
pub fn write_segments_csv<W: Write>(writer: W, views: &[SeriesView]) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0usize;

    for view in views {
        let Some(data) = view.data() else {
            continue;
        };
        let field = view.field();
        for (segment_idx, segment) in data.segments.iter().enumerate() {
            for point in &segment.points {
                wtr.serialize(SegmentRow {
                    series: field,
                    segment: segment_idx,
                    classification: segment.classification.label(),
                    x: point.position,
                    label: &point.label,
                    value: point.value(field),
                    z: point.zscore(field),
                    interpolated: point.interpolated,
                })?;
                rows += 1;
            }
        }
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

pub fn export_segments_csv(path: &Path, views: &[SeriesView]) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_segments_csv(file, views)?;
    tracing::info!("Exported {rows} segment points to {:?}", path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::Dataset;
    use crate::state::chart_config::SeriesStyle;

    fn uv_view() -> SeriesView {
        SeriesView::compute(
            &Dataset::sample().records,
            &SeriesStyle::new("uv", [0; 4]),
            1.0,
        )
    }

    #[test]
    fn writes_header_and_one_row_per_segment_point() {
        let mut out = Vec::new();
        let rows = write_segments_csv(&mut out, &[uv_view()]).unwrap();

        // [A, b] + [b, B, C, D, E, F, G]
        assert_eq!(rows, 9);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "series,segment,classification,x,label,value,z,interpolated"
        );
        assert_eq!(lines.len(), 10);
        assert!(lines[1].starts_with("uv,0,above,0.0,Page A,4000.0,"));
        assert!(lines[2].ends_with(",true"));
        assert!(lines[3].starts_with("uv,1,below,"));
    }

    #[test]
    fn skips_failed_series() {
        let failed = SeriesView::compute(
            &Dataset::sample().records,
            &SeriesStyle::new("missing", [0; 4]),
            1.0,
        );
        let mut out = Vec::new();
        assert_eq!(write_segments_csv(&mut out, &[failed]).unwrap(), 0);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segments.csv");
        let rows = export_segments_csv(&path, &[uv_view()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), rows + 1);
    }

    #[test]
    fn export_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("segments.csv");
        assert!(matches!(
            export_segments_csv(&path, &[uv_view()]),
            Err(ExportError::Io { .. })
        ));
    }
}
