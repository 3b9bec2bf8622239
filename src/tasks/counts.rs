use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::model::{Task, TaskPriority, TaskStatus};

/// Headline numbers for the task dashboard cards.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub paused: usize,
    pub failed: usize,
    pub due_today: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    pub by_priority: BTreeMap<TaskPriority, usize>,
    pub by_division: BTreeMap<String, usize>,
}

/// `due_today` compares calendar days in the time zone of `now`.
pub fn derive_counts<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> TaskCounts {
    let today = now.date_naive();
    let zone = now.timezone();

    let mut counts = TaskCounts {
        total: tasks.len(),
        ..TaskCounts::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Paused => counts.paused += 1,
            TaskStatus::Failed => counts.failed += 1,
        }
        if task
            .due_date
            .is_some_and(|due| due.with_timezone(&zone).date_naive() == today)
        {
            counts.due_today += 1;
        }
    }
    counts
}

pub fn derive_breakdown(tasks: &[Task]) -> TaskBreakdown {
    let mut breakdown = TaskBreakdown::default();
    for task in tasks {
        *breakdown.by_priority.entry(task.priority).or_default() += 1;
        *breakdown
            .by_division
            .entry(task.division.clone())
            .or_default() += 1;
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures::{sample_anchor, sample_tasks};
    use chrono::{FixedOffset, Utc};

    #[test]
    fn sample_fixture_counts_in_utc() {
        let counts = derive_counts(&sample_tasks(), &sample_anchor());
        assert_eq!(
            counts,
            TaskCounts {
                total: 6,
                in_progress: 3,
                completed: 1,
                paused: 1,
                failed: 1,
                due_today: 2,
            }
        );
    }

    #[test]
    fn due_today_follows_the_local_calendar_day() {
        // 23:30 UTC on the 13th is already the 14th two hours east.
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = sample_anchor().with_timezone(&east);
        assert_eq!(derive_counts(&sample_tasks(), &now).due_today, 3);
    }

    #[test]
    fn status_buckets_sum_to_total() {
        let tasks = sample_tasks();
        let counts = derive_counts(&tasks, &Utc::now());
        assert_eq!(counts.total, tasks.len());
        assert_eq!(
            counts.in_progress + counts.completed + counts.paused + counts.failed,
            counts.total
        );
    }

    #[test]
    fn empty_list_has_zero_counts() {
        assert_eq!(derive_counts(&[], &Utc::now()), TaskCounts::default());
    }

    #[test]
    fn breakdown_groups_by_priority_and_division() {
        let breakdown = derive_breakdown(&sample_tasks());
        assert_eq!(breakdown.by_priority[&TaskPriority::High], 3);
        assert_eq!(breakdown.by_priority[&TaskPriority::Medium], 2);
        assert_eq!(breakdown.by_priority[&TaskPriority::Low], 1);
        assert_eq!(breakdown.by_division["development"], 2);
        assert_eq!(breakdown.by_division.len(), 5);
    }
}
