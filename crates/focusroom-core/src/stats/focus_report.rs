//! Focus report over finished tasks
//!
//! Only tasks that have been rated count as finished. Open tasks are counted
//! separately so the host can show "N still in progress".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::{Rating, Task};

/// Number of finished tasks that received a given rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCount {
    pub rating: Rating,
    pub count: u32,
}

/// Totals across finished tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusReport {
    /// Tasks with feedback recorded
    pub completed_tasks: u32,
    /// Tasks still waiting for feedback
    pub open_tasks: u32,
    /// Sum of logged focus time over completed tasks
    pub total_logged_focus_secs: u64,
    /// Rating histogram, best rating first; ratings never given are omitted
    pub feedback: Vec<RatingCount>,
    /// Mean rating score (1.0 to 5.0), if any task was rated
    pub average_score: Option<f64>,
}

impl FocusReport {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut report = FocusReport::default();
        let mut histogram: BTreeMap<Rating, u32> = BTreeMap::new();
        let mut score_sum: u64 = 0;

        for task in tasks {
            match task.feedback {
                Some(rating) => {
                    report.completed_tasks += 1;
                    report.total_logged_focus_secs += task.logged_focus_secs;
                    *histogram.entry(rating).or_default() += 1;
                    score_sum += u64::from(rating.score());
                }
                None => report.open_tasks += 1,
            }
        }

        report.feedback = histogram
            .into_iter()
            .map(|(rating, count)| RatingCount { rating, count })
            .collect();
        if report.completed_tasks > 0 {
            report.average_score = Some(score_sum as f64 / f64::from(report.completed_tasks));
        }
        report
    }

    pub fn total_logged_focus_min(&self) -> u64 {
        self.total_logged_focus_secs / 60
    }

    pub fn count_for(&self, rating: Rating) -> u32 {
        self.feedback
            .iter()
            .find(|rc| rc.rating == rating)
            .map(|rc| rc.count)
            .unwrap_or(0)
    }
}
