pub mod chart_panel;
pub mod stats_window;
