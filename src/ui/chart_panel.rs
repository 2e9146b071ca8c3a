use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::processing::kd_tree::{extent, HoverTree};
use crate::render::point_renderer::{color32, PointRenderer, ThresholdRenderer};
use crate::state::app_state::AppState;
use crate::state::series_view::SeriesView;

/// Normalized distance under which the pointer counts as over a point.
const HOVER_RADIUS: f64 = 0.04;

/// Point under the pointer: (view index, point index).
type Hovered = (usize, usize);

/// Render the line chart for every series in `state`.
pub fn show_chart_panel(ui: &mut egui::Ui, state: &AppState) {
    let theme = state.config.theme;

    // --- Per-series status row ---
    ui.horizontal_wrapped(|ui| {
        for view in state.views() {
            match view.error() {
                Some(err) => {
                    ui.colored_label(theme.error_text(), format!("{}: {err}", view.field()));
                }
                None => {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}: {} flagged, {} crossings",
                            view.field(),
                            view.flagged_count(),
                            view.crossing_count()
                        ))
                        .color(color32(view.style.color)),
                    );
                }
            }
            ui.separator();
        }
    });

    let dataset = state.dataset.clone();
    let trees = hover_trees(state.views());
    let config = &state.config;

    let plot_response = Plot::new("zline_chart")
        .legend(Legend::default())
        .show_x(false)
        .show_y(false)
        .show_background(true)
        .x_axis_formatter(move |mark, _range| {
            dataset.label_at(mark.value).map(str::to_owned).unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for view in state.views() {
                let Some(data) = view.data() else {
                    continue;
                };
                let renderer = ThresholdRenderer::new(&view.style, view.threshold, config.marker_radius);

                for segment in &data.segments {
                    let line = Line::new(PlotPoints::from(view.line_points(segment)))
                        .name(view.field())
                        .color(color32(renderer.segment_color(segment)))
                        .width(config.line_width);
                    plot_ui.line(line);
                }

                if config.show_markers {
                    for point in &data.points {
                        let Some(value) = point.value(view.field()) else {
                            continue;
                        };
                        let marker = renderer.marker_for(point);
                        plot_ui.points(
                            Points::new(vec![[point.position, value]])
                                .shape(MarkerShape::Circle)
                                .radius(marker.radius)
                                .filled(marker.filled)
                                .color(color32(marker.color)),
                        );
                    }
                }
            }

            let hovered = plot_ui
                .pointer_coordinate()
                .and_then(|p| nearest(&trees, p.x, p.y));

            if let Some((vi, pi)) = hovered {
                let view = &state.views()[vi];
                if let Some(point) = view.data().map(|d| &d.points[pi]) {
                    if let Some(value) = point.value(view.field()) {
                        plot_ui.points(
                            Points::new(vec![[point.position, value]])
                                .shape(MarkerShape::Circle)
                                .radius(config.marker_radius * 2.5)
                                .filled(false)
                                .color(theme.highlight_stroke()),
                        );
                    }
                }
            }
            hovered
        });

    if let Some((vi, pi)) = plot_response.inner {
        let view = &state.views()[vi];
        if let Some(point) = view.data().map(|d| &d.points[pi]) {
            let renderer = ThresholdRenderer::new(&view.style, view.threshold, config.marker_radius);
            let text = renderer.tooltip_for(point);
            let color = color32(renderer.color_for(point));
            plot_response.response.on_hover_ui_at_pointer(|ui| {
                ui.label(egui::RichText::new(text).color(color));
            });
        }
    }
}

/// One tree per series, all scaled by the extent of every plotted point.
fn hover_trees(views: &[SeriesView]) -> Vec<Option<HoverTree>> {
    let columns: Vec<Option<(Vec<f64>, Vec<f64>)>> = views
        .iter()
        .map(|view| {
            let data = view.data()?;
            Some(
                data.points
                    .iter()
                    .map(|p| (p.position, p.value(view.field()).unwrap_or(f64::NAN)))
                    .unzip(),
            )
        })
        .collect();

    let all = || columns.iter().flatten();
    let x_span = extent(all().flat_map(|(x, _)| x.iter().copied()));
    let y_span = extent(all().flat_map(|(_, y)| y.iter().copied()));

    columns
        .iter()
        .map(|c| c.as_ref().map(|(x, y)| HoverTree::with_spans(x, y, x_span, y_span)))
        .collect()
}

/// Closest point across all series, if any lies within the hover radius.
fn nearest(trees: &[Option<HoverTree>], x: f64, y: f64) -> Option<Hovered> {
    trees
        .iter()
        .enumerate()
        .filter_map(|(vi, tree)| {
            let (pi, dist) = tree.as_ref()?.nearest(x, y)?;
            Some((vi, pi, dist))
        })
        .filter(|&(_, _, dist)| dist < HOVER_RADIUS)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(vi, pi, _)| (vi, pi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::Dataset;
    use crate::state::chart_config::{ChartConfig, SeriesStyle};

    fn render(state: &AppState) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| show_chart_panel(ui, state));
        });
    }

    #[test]
    fn renders_sample_chart() {
        let state = AppState::new(Dataset::sample(), ChartConfig::default());
        render(&state);
    }

    #[test]
    fn renders_with_a_failed_series() {
        let mut config = ChartConfig::default();
        config.series.push(SeriesStyle::new("missing", [0, 0, 0, 255]));
        let state = AppState::new(Dataset::sample(), config);
        assert!(state.view("missing").and_then(|v| v.error()).is_some());
        render(&state);
    }

    #[test]
    fn nearest_picks_closest_series_within_radius() {
        let state = AppState::new(Dataset::sample(), ChartConfig::default());
        let trees = hover_trees(state.views());
        let pv = state.views().iter().position(|v| v.field() == "pv").unwrap();

        // Page C pv peak.
        assert_eq!(nearest(&trees, 2.0, 9800.0), Some((pv, 2)));
        assert_eq!(nearest(&trees, 3.5, 9000.0), None);
    }
}
