//! Line chart of numeric series that highlights points deviating from the
//! series mean by more than a z-score threshold.
//!
//! The core lives in [`processing`]: [`processing::statistics::zscores`]
//! standardizes a series and [`processing::segmentation::segment`] splits it
//! into runs above and below the threshold, inserting an interpolated
//! boundary point at every crossing. Everything else draws the result.
//!
//! ```
//! use zline::data::sample::Dataset;
//! use zline::processing::segmentation::{segment, Classification};
//!
//! let data = Dataset::sample();
//! let segments = segment(&data.records, "pv", 1.0).unwrap();
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].classification, Classification::Above);
//! ```

pub mod app;
pub mod data;
pub mod processing;
pub mod render;
pub mod state;
pub mod ui;
