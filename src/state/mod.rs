pub mod app_state;
pub mod chart_config;
pub mod series_view;
pub mod theme;
