pub mod point_renderer;
