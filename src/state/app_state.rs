use crate::data::sample::Dataset;
use crate::state::chart_config::ChartConfig;
use crate::state::series_view::SeriesView;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Input data, settings, and the series computed from them.
///
/// Views are derived state: they are rebuilt whenever the threshold changes
/// and never edited in place.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Dataset,
    pub config: ChartConfig,
    views: Vec<SeriesView>,
}

impl AppState {
    pub fn new(dataset: Dataset, config: ChartConfig) -> Self {
        let views = compute_views(&dataset, &config);
        Self {
            dataset,
            config,
            views,
        }
    }

    pub fn views(&self) -> &[SeriesView] {
        &self.views
    }

    pub fn view(&self, field: &str) -> Option<&SeriesView> {
        self.views.iter().find(|v| v.field() == field)
    }

    /// Update the threshold, recomputing segments only when it actually changed.
    /// Non-finite values are ignored.
    pub fn set_threshold(&mut self, threshold: f64) -> bool {
        if !threshold.is_finite() || threshold == self.config.threshold {
            return false;
        }
        self.config.threshold = threshold;
        self.recompute();
        true
    }

    pub fn recompute(&mut self) {
        self.views = compute_views(&self.dataset, &self.config);
    }

    pub fn failed_count(&self) -> usize {
        self.views.iter().filter(|v| v.error().is_some()).count()
    }
}

fn compute_views(dataset: &Dataset, config: &ChartConfig) -> Vec<SeriesView> {
    let views: Vec<SeriesView> = config
        .series
        .iter()
        .map(|style| SeriesView::compute(&dataset.records, style, config.threshold))
        .collect();
    tracing::debug!(
        "Computed {} series over {} records at threshold {}",
        views.len(),
        dataset.len(),
        config.threshold
    );
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::chart_config::SeriesStyle;

    #[test]
    fn builds_a_view_per_configured_series() {
        let state = AppState::new(Dataset::sample(), ChartConfig::default());
        assert_eq!(state.views().len(), 2);
        assert!(state.view("pv").is_some());
        assert!(state.view("uv").is_some());
        assert!(state.view("amt").is_none());
        assert_eq!(state.failed_count(), 0);
    }

    #[test]
    fn threshold_change_recomputes() {
        let mut state = AppState::new(Dataset::sample(), ChartConfig::default());
        assert_eq!(state.view("uv").unwrap().flagged_count(), 1);

        assert!(state.set_threshold(0.5));
        let uv = state.view("uv").unwrap();
        assert_eq!(uv.threshold, 0.5);
        // Page A (1.69) and Page G (0.97) now both exceed.
        assert_eq!(uv.flagged_count(), 2);

        assert!(!state.set_threshold(0.5));
        assert!(!state.set_threshold(f64::NAN));
        assert_eq!(state.config.threshold, 0.5);
    }

    #[test]
    fn one_bad_series_leaves_the_others() {
        let mut config = ChartConfig::default();
        config.series.push(SeriesStyle::new("missing", [0; 4]));
        let state = AppState::new(Dataset::sample(), config);
        assert_eq!(state.failed_count(), 1);
        assert!(state.view("pv").unwrap().data().is_some());
        assert!(state.view("missing").unwrap().error().is_some());
    }
}
