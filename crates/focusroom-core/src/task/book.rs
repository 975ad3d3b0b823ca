//! In-memory collection of tasks, keyed by (name, day).

use chrono::{DateTime, NaiveDate, Utc};

use super::{Task, TaskKey};
use crate::suggestion::SuggestionInput;

/// Outcome of [`TaskBook::upsert_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// All tasks known to one session, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskBook {
    tasks: Vec<Task>,
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Find the open (not yet rated) task for `key`.
    pub fn find_open(&self, key: &TaskKey) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_open() && t.matches(key))
    }

    pub fn find_open_mut(&mut self, key: &TaskKey) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.is_open() && t.matches(key))
    }

    /// Update the open task for `key` with new durations and pick, or
    /// create it.
    ///
    /// At most one open task exists per key at any time.
    pub fn upsert_open(
        &mut self,
        key: &TaskKey,
        focus_secs: u64,
        break_secs: u64,
        pick: Option<SuggestionInput>,
        now: DateTime<Utc>,
    ) -> Upsert {
        if let Some(task) = self.find_open_mut(key) {
            task.focus_secs = focus_secs;
            task.break_secs = break_secs;
            task.pick = pick;
            return Upsert::Updated;
        }
        let mut task = Task::new(key.clone(), focus_secs, break_secs, now);
        task.pick = pick;
        self.tasks.push(task);
        Upsert::Created
    }

    /// All tasks, most recent day first, insertion order within a day.
    pub fn history(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        // Stable sort keeps insertion order for equal days.
        tasks.sort_by(|a, b| b.day.cmp(&a.day));
        tasks
    }

    /// Tasks belonging to `day`, in insertion order.
    pub fn for_day(&self, day: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.day == day)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::Complexity;
    use crate::task::Rating;
    use chrono::TimeZone;

    fn key(name: &str, day: (i32, u32, u32)) -> TaskKey {
        TaskKey::new(name, NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap())
    }

    #[test]
    fn upsert_merges_open_task_with_same_key() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut book = TaskBook::new();
        let k = key("write report", (2024, 3, 1));

        let deep = Some(SuggestionInput::Complexity(Complexity::Deep));
        assert_eq!(book.upsert_open(&k, 1500, 300, None, now), Upsert::Created);
        assert_eq!(book.upsert_open(&k, 3000, 600, deep, now), Upsert::Updated);

        assert_eq!(book.len(), 1);
        let task = book.find_open(&k).unwrap();
        assert_eq!(task.focus_secs, 3000);
        assert_eq!(task.break_secs, 600);
        assert_eq!(task.pick, deep);
    }

    #[test]
    fn closed_task_does_not_block_a_new_one() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut book = TaskBook::new();
        let k = key("review", (2024, 3, 1));

        book.upsert_open(&k, 600, 60, None, now);
        book.find_open_mut(&k).unwrap().feedback = Some(Rating::Good);

        assert_eq!(book.upsert_open(&k, 600, 60, None, now), Upsert::Created);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn same_name_on_another_day_is_a_separate_task() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        let mut book = TaskBook::new();
        book.upsert_open(&key("gym", (2024, 3, 1)), 600, 60, None, now);
        book.upsert_open(&key("gym", (2024, 3, 2)), 600, 60, None, now);
        assert_eq!(book.len(), 2);
        assert_eq!(book.for_day(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()).count(), 1);
    }

    #[test]
    fn history_orders_day_descending_then_insertion() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        let mut book = TaskBook::new();
        book.upsert_open(&key("a", (2024, 3, 1)), 60, 60, None, now);
        book.upsert_open(&key("b", (2024, 3, 2)), 60, 60, None, now);
        book.upsert_open(&key("c", (2024, 3, 1)), 60, 60, None, now);
        book.upsert_open(&key("d", (2024, 3, 2)), 60, 60, None, now);

        let names: Vec<_> = book.history().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }
}
