use eframe::egui;

use crate::data::export;
use crate::state::app_state::{AppState, VERSION};
use crate::ui::chart_panel;
use crate::ui::stats_window;

/// Slider range for the threshold, in standard deviations.
const THRESHOLD_RANGE: std::ops::RangeInclusive<f64> = 0.0..=3.0;

/// The chart window.
pub struct ZLineApp {
    pub state: AppState,
    /// Slider value; applied to `state` when it changes.
    threshold_input: f64,
    pub show_stats: bool,
    /// An error message shown in the footer until dismissed.
    pub error_message: Option<String>,
}

impl ZLineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(state.config.theme.visuals());

        let threshold_input = state.config.threshold;
        Self {
            state,
            threshold_input,
            show_stats: false,
            error_message: None,
        }
    }

    /// Ask for a destination and write the current segments as CSV.
    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("segments.csv")
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };

        if let Err(e) = export::export_segments_csv(&path, self.state.views()) {
            tracing::error!("Failed to export CSV: {e}");
            self.error_message = Some(format!("Failed to export CSV: {e}"));
        }
    }

    fn apply_threshold(&mut self) {
        if self.state.set_threshold(self.threshold_input) {
            tracing::info!("Threshold set to {:.2}", self.threshold_input);
        }
    }
}

impl eframe::App for ZLineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.config.theme.visuals());

        // --- Header panel ---
        let mut export_requested = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("zline");
                    ui.separator();

                    let slider = egui::Slider::new(&mut self.threshold_input, THRESHOLD_RANGE)
                        .step_by(0.05)
                        .text("threshold (\u{03c3})");
                    ui.add(slider)
                        .on_hover_text("Points with a z-score above this are flagged");

                    ui.separator();

                    if ui.selectable_label(self.show_stats, "Statistics").clicked() {
                        self.show_stats = !self.show_stats;
                    }
                    if ui.button("Export CSV").on_hover_text("Save segment points as CSV").clicked() {
                        export_requested = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme = self.state.config.theme;
                        if ui.button(theme.toggle_label()).clicked() {
                            self.state.config.theme = theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        self.apply_threshold();
        if export_requested {
            self.export_csv();
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let records = self.state.dataset.len();
                    ui.label(egui::RichText::new(format!("{records} records")).weak());

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(self.state.config.theme.error_text(), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // --- Chart ---
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.label(egui::RichText::new("No records to plot.").weak());
                });
                return;
            }
            chart_panel::show_chart_panel(ui, &self.state);
        });

        if self.show_stats {
            self.show_stats = stats_window::show_stats_window(ctx, &self.state);
        }
    }
}
