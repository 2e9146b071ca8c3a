use serde::{Deserialize, Serialize};

use crate::processing::segmentation::SegmentError;

/// Population statistics for a data series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute statistics over the finite values in `y`.
    ///
    /// Callers that must reject malformed input validate it first (see
    /// [`zscores`] and `Record::value`). Variance divides by the number of
    /// values (population variance), so the standard deviation matches the
    /// one used for z-scores. Sums are taken on values scaled by the largest
    /// magnitude, so the mean and standard deviation stay finite for any
    /// finite input. `variance` can still overflow near `f64::MAX`; z-scores
    /// only use `std_dev`.
    pub fn compute(y: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = y.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let n = count as f64;
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let peak_to_peak = max - min;

        let scale = vals.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let (mean, std_dev) = if scale > 0.0 {
            let scaled_mean = vals.iter().map(|v| v / scale).sum::<f64>() / n;
            let scaled_var = vals
                .iter()
                .map(|v| (v / scale - scaled_mean).powi(2))
                .sum::<f64>()
                / n;
            (scale * scaled_mean, scale * scaled_var.sqrt())
        } else {
            (0.0, 0.0)
        };
        let variance = std_dev * std_dev;

        vals.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            vals[count / 2 - 1] / 2.0 + vals[count / 2] / 2.0
        } else {
            vals[count / 2]
        };

        Some(SeriesStats {
            count,
            min,
            max,
            peak_to_peak,
            mean,
            median,
            variance,
            std_dev,
        })
    }

    /// Standardize a single value against these statistics.
    ///
    /// A constant series has no spread, so every value sits at 0.0 rather
    /// than dividing by zero.
    pub fn zscore(&self, value: f64) -> f64 {
        if self.std_dev > 0.0 {
            let delta = value - self.mean;
            if delta.is_finite() {
                delta / self.std_dev
            } else {
                value / self.std_dev - self.mean / self.std_dev
            }
        } else {
            0.0
        }
    }

    /// Raw value that standardizes to `z`.
    pub fn value_at(&self, z: f64) -> f64 {
        self.mean + z * self.std_dev
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}:\n  Count: {}\n  Min: {:.3}\n  Max: {:.3}\n  Peak-to-Peak: {:.3}\n  Mean: {:.3}\n  Median: {:.3}\n  Std Dev: {:.3}\n",
            label, self.count, self.min, self.max, self.peak_to_peak, self.mean, self.median, self.std_dev
        )
    }
}

/// Z-scores of `values` against their own mean and population standard deviation.
///
/// Returns an empty vector for empty input and all zeros for a constant series.
/// A NaN or infinite value is rejected rather than standardized.
pub fn zscores(values: &[f64]) -> Result<Vec<f64>, SegmentError> {
    if let Some((position, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SegmentError::NonFiniteSample { position, value });
    }
    Ok(match SeriesStats::compute(values) {
        Some(stats) => values.iter().map(|&v| stats.zscore(v)).collect(),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UV: [f64; 7] = [4000.0, 3000.0, 2000.0, 2780.0, 1890.0, 2390.0, 3490.0];

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn uv_sample_matches_closed_form() {
        let stats = SeriesStats::compute(&UV).unwrap();
        let n = UV.len() as f64;
        let mean = UV.iter().sum::<f64>() / n;
        let var = UV.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        assert_eq!(stats.count, 7);
        assert_close(stats.mean, 19550.0 / 7.0);
        assert_close(stats.mean, mean);
        assert_close(stats.variance, var);
        assert_close(stats.std_dev, var.sqrt());
        assert_close(stats.std_dev, 716.374_089_938_136_9);
        assert_eq!(stats.min, 1890.0);
        assert_eq!(stats.max, 4000.0);
        assert_eq!(stats.median, 2780.0);
    }

    #[test]
    fn zscores_use_population_std_dev() {
        let z = zscores(&[10.0, 20.0, 12.0]).unwrap();
        assert_eq!(z.len(), 3);
        assert_close(z[0], -4.0 / (56.0_f64 / 3.0).sqrt());
        assert_close(z[1], 6.0 / (56.0_f64 / 3.0).sqrt());
        assert_close(z[2], -2.0 / (56.0_f64 / 3.0).sqrt());
        assert_close(z.iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn constant_series_standardizes_to_zero() {
        let z = zscores(&[5.0; 4]).unwrap();
        assert_eq!(z, vec![0.0; 4]);
        assert!(z.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn empty_series_has_no_scores() {
        assert!(zscores(&[]).unwrap().is_empty());
        assert!(SeriesStats::compute(&[]).is_none());
    }

    #[test]
    fn value_at_inverts_zscore() {
        let stats = SeriesStats::compute(&UV).unwrap();
        assert_close(stats.zscore(stats.value_at(1.0)), 1.0);
        assert_close(stats.value_at(0.0), stats.mean);
    }

    #[test]
    fn report_lists_every_measure() {
        let report = SeriesStats::compute(&[1.0, 2.0, 3.0]).unwrap().report("uv");
        assert!(report.starts_with("uv:\n"));
        assert!(report.contains("Count: 3"));
        assert!(report.contains("Median: 2.000"));
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let err = zscores(&[1.0, f64::NAN, 3.0]).unwrap_err();
        assert!(matches!(err, SegmentError::NonFiniteSample { position: 1, .. }));

        let err = zscores(&[f64::INFINITY, 2.0]).unwrap_err();
        assert!(matches!(err, SegmentError::NonFiniteSample { position: 0, .. }));
    }

    #[test]
    fn huge_values_stay_finite() {
        let values = [1e308, 1.5e308, 1e308];
        let stats = SeriesStats::compute(&values).unwrap();
        assert!(stats.mean.is_finite());
        assert!(stats.std_dev.is_finite());
        assert_close(stats.mean, 3.5 / 3.0 * 1e308);

        let z = zscores(&values).unwrap();
        assert!(z.iter().all(|v| v.is_finite()), "{z:?}");
        assert_close(z.iter().sum::<f64>(), 0.0);
        assert!(z[1] > 1.0);

        let z = zscores(&[-f64::MAX, f64::MAX]).unwrap();
        assert_close(z[0], -1.0);
        assert_close(z[1], 1.0);
    }
}
