//! Flat, chart-ready rows built from comparator and classifier output.
//! Nothing here computes new figures; it only reshapes, labels and sorts.

mod charts;
pub mod views;

pub use charts::{
    comet_rows, comparison_bars, gap_bars, radar_rows, trend_rows, truncate_label,
    DEFAULT_LABEL_WIDTH,
};
pub use views::{CometRow, ComparisonBar, GapBar, RadarRow, TrendRow};
