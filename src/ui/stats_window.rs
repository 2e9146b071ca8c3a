use crate::render::point_renderer::color32;
use crate::state::app_state::AppState;
use crate::state::series_view::SeriesView;

/// Statistics report for every series. Returns `false` once the user closes it.
pub fn show_stats_window(ctx: &egui::Context, state: &AppState) -> bool {
    let mut open = true;

    egui::Window::new("Series Statistics")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for view in state.views() {
                    ui.label(
                        egui::RichText::new(view.field())
                            .strong()
                            .color(color32(view.style.color)),
                    );
                    egui::Frame::group(ui.style())
                        .inner_margin(egui::Margin::same(8))
                        .show(ui, |ui| {
                            ui.monospace(series_report(view));
                        });
                    ui.add_space(6.0);
                }
            });
        });

    open
}

/// Text report for one series: statistics plus where the threshold falls.
pub fn series_report(view: &SeriesView) -> String {
    if let Some(err) = view.error() {
        return format!("{}: unavailable\n  {err}\n", view.field());
    }
    let Some(stats) = view.data().and_then(|d| d.stats.as_ref()) else {
        return format!("{}: no data\n", view.field());
    };

    let mut report = stats.report(view.field());
    report.push_str(&format!(
        "  Threshold: {:.2}\u{03c3} = {:.3}\n  Flagged: {}\n  Crossings: {}\n",
        view.threshold,
        stats.value_at(view.threshold),
        view.flagged_count(),
        view.crossing_count()
    ));
    report
}
