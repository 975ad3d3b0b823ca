//! Statistics over the tasks of a focus session.

mod focus_report;

pub use focus_report::{FocusReport, RatingCount};
