//! Priority ranking, filtering, and active/finished segregation.
//!
//! # Responsibility
//! - Assign urgency classes and order the presented task list.
//! - Apply tag/frequency filters against the full reset task set.
//!
//! # Invariants
//! - Sorting is stable: equal keys keep their original relative order, so
//!   repeated requests produce identical listings.
//! - Finished tasks are excluded from ranking, not interleaved.

use crate::model::tag::TagId;
use crate::model::task::{Frequency, Task};
use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

/// Caller-selected presentation ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Urgency-class ordering with deadline tie-break.
    #[default]
    Smart,
    /// Lexicographic ascending by title.
    Title,
}

/// Optional tag and frequency filters applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub tag: Option<TagId>,
    pub frequency: Option<Frequency>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(tag_id) = self.tag {
            if !task.tags.iter().any(|tag| tag.id == tag_id) {
                return false;
            }
        }
        if let Some(frequency) = self.frequency {
            if task.frequency != frequency {
                return false;
            }
        }
        true
    }
}

/// Urgency bucket for the smart ordering; lower is more urgent.
///
/// 1. One-time tasks overdue or due within 24 hours.
/// 2. Weekly tasks when `now` falls on a weekend.
/// 3. Daily tasks.
/// 4. Everything else.
pub fn urgency_class(task: &Task, now: NaiveDateTime) -> u8 {
    let is_weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
    match task.frequency {
        Frequency::OneTime
            if task.deadline.signed_duration_since(now) <= Duration::days(1) =>
        {
            1
        }
        Frequency::Weekly if is_weekend => 2,
        Frequency::Daily => 3,
        _ => 4,
    }
}

/// Orders tasks in place according to the selected mode.
pub fn rank(tasks: &mut [Task], mode: SortMode, now: NaiveDateTime) {
    match mode {
        SortMode::Title => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        SortMode::Smart => tasks.sort_by_key(|task| (urgency_class(task, now), task.deadline)),
    }
}

/// Splits a ranked list into (active, finished) collections.
pub fn split_finished(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    tasks.into_iter().partition(|task| !task.is_completed())
}

#[cfg(test)]
mod tests {
    use super::{rank, split_finished, urgency_class, SortMode, TaskFilter};
    use crate::model::task::{Frequency, Task, TaskDraft};
    use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
    use uuid::Uuid;

    fn task(title: &str, frequency: Frequency, deadline: NaiveDateTime) -> Task {
        let draft = TaskDraft {
            title: title.to_string(),
            description: None,
            points_per_click: 5,
            frequency,
            required_count: 2,
        };
        Task::from_draft(Uuid::new_v4(), &draft, deadline, deadline)
    }

    fn saturday_noon() -> NaiveDateTime {
        // 2024-03-09 is a Saturday.
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(day.weekday(), Weekday::Sat);
        day.and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn overdue_one_time_is_class_one() {
        let now = saturday_noon();
        let overdue = task("a", Frequency::OneTime, now - Duration::hours(1));
        assert_eq!(urgency_class(&overdue, now), 1);
    }

    #[test]
    fn distant_one_time_is_class_four() {
        let now = saturday_noon();
        let distant = task("d", Frequency::OneTime, now + Duration::days(30));
        assert_eq!(urgency_class(&distant, now), 4);
    }

    #[test]
    fn weekly_is_urgent_only_on_weekend() {
        let saturday = saturday_noon();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let weekly = task("b", Frequency::Weekly, saturday + Duration::days(2));
        assert_eq!(urgency_class(&weekly, saturday), 2);
        assert_eq!(urgency_class(&weekly, monday), 4);
    }

    #[test]
    fn smart_order_matches_urgency_scenario() {
        let now = saturday_noon();
        let a = task("a", Frequency::OneTime, now - Duration::hours(1));
        let b = task("b", Frequency::Weekly, now + Duration::days(2));
        let c = task("c", Frequency::Daily, now + Duration::hours(12));
        let d = task("d", Frequency::OneTime, now + Duration::days(30));

        let mut tasks = vec![d.clone(), c.clone(), b.clone(), a.clone()];
        rank(&mut tasks, SortMode::Smart, now);

        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn equal_keys_keep_original_order() {
        let now = saturday_noon();
        let deadline = now + Duration::hours(12);
        let first = task("first", Frequency::Daily, deadline);
        let second = task("second", Frequency::Daily, deadline);

        let mut tasks = vec![first.clone(), second.clone()];
        rank(&mut tasks, SortMode::Smart, now);
        assert_eq!(tasks[0].id, first.id);
        assert_eq!(tasks[1].id, second.id);
    }

    #[test]
    fn title_mode_sorts_lexicographically() {
        let now = saturday_noon();
        let mut tasks = vec![
            task("pears", Frequency::Daily, now),
            task("apples", Frequency::Weekly, now),
        ];
        rank(&mut tasks, SortMode::Title, now);
        assert_eq!(tasks[0].title, "apples");
    }

    #[test]
    fn filter_matches_frequency() {
        let now = saturday_noon();
        let daily = task("x", Frequency::Daily, now);
        let filter = TaskFilter {
            tag: None,
            frequency: Some(Frequency::Weekly),
        };
        assert!(!filter.matches(&daily));
        assert!(TaskFilter::default().matches(&daily));
    }

    #[test]
    fn finished_tasks_are_segregated() {
        let now = saturday_noon();
        let mut done = task("done", Frequency::Daily, now);
        done.completed_count = done.required_count;
        done.completed_at = Some(now);
        let open = task("open", Frequency::Daily, now);

        let (active, finished) = split_finished(vec![done.clone(), open.clone()]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, open.id);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, done.id);
    }
}
