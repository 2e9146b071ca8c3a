pub mod kd_tree;
pub mod segmentation;
pub mod statistics;
