//! Task list filtering for the dashboard view.
//!
//! Every set dimension must match exactly (AND). The search term, when not
//! blank, must appear case-insensitively in the title, the description or
//! any tag (OR across those fields).

use serde::{Deserialize, Serialize};

use super::model::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub division: Option<String>,
    #[serde(default)]
    pub search_term: String,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.priority.is_none()
            && self.status.is_none()
            && self.division.is_none()
            && self.search_term.trim().is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.priority.is_some_and(|priority| priority != task.priority) {
            return false;
        }
        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }
        if let Some(division) = &self.division {
            if division != &task.division {
                return false;
            }
        }
        matches_search(task, &self.search_term)
    }
}

pub fn apply_filter(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

fn matches_search(task: &Task, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
        || task
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures::sample_tasks;

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let tasks = sample_tasks();
        let filtered = apply_filter(&tasks, &TaskFilter::default());
        assert_eq!(filtered, tasks);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let tasks = sample_tasks();
        let filter = TaskFilter {
            priority: Some(TaskPriority::High),
            division: Some("development".into()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply_filter(&tasks, &filter)), vec!["task-2", "task-6"]);

        let filter = TaskFilter {
            status: Some(TaskStatus::Failed),
            ..filter
        };
        assert_eq!(ids(&apply_filter(&tasks, &filter)), vec!["task-6"]);
    }

    #[test]
    fn search_is_case_insensitive_across_title_description_and_tags() {
        let tasks = sample_tasks();
        let by_title = TaskFilter {
            search_term: "AUDIT".into(),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply_filter(&tasks, &by_title)), vec!["task-3"]);

        let by_description = TaskFilter {
            search_term: "churn".into(),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply_filter(&tasks, &by_description)), vec!["task-2"]);

        let by_tag = TaskFilter {
            search_term: "Q2".into(),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&apply_filter(&tasks, &by_tag)), vec!["task-1", "task-3"]);
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let tasks = sample_tasks();
        let filter = TaskFilter {
            search_term: "   ".into(),
            ..TaskFilter::default()
        };
        assert!(filter.is_empty());
        assert_eq!(apply_filter(&tasks, &filter).len(), tasks.len());
    }

    #[test]
    fn division_must_match_exactly() {
        let tasks = sample_tasks();
        let filter = TaskFilter {
            division: Some("Research".into()),
            ..TaskFilter::default()
        };
        assert!(apply_filter(&tasks, &filter).is_empty());
    }

    #[test]
    fn order_of_dimension_application_does_not_matter() {
        let tasks = sample_tasks();
        let priority = TaskFilter {
            priority: Some(TaskPriority::High),
            ..TaskFilter::default()
        };
        let status = TaskFilter {
            status: Some(TaskStatus::InProgress),
            ..TaskFilter::default()
        };
        let division = TaskFilter {
            division: Some("research".into()),
            ..TaskFilter::default()
        };
        let combined = TaskFilter {
            priority: priority.priority,
            status: status.status,
            division: division.division.clone(),
            search_term: String::new(),
        };
        let expected = apply_filter(&tasks, &combined);

        let orders = [
            [&priority, &status, &division],
            [&priority, &division, &status],
            [&status, &priority, &division],
            [&status, &division, &priority],
            [&division, &priority, &status],
            [&division, &status, &priority],
        ];
        for order in orders {
            let mut current = tasks.clone();
            for step in order {
                current = apply_filter(&current, step);
            }
            assert_eq!(current, expected);
        }
        assert_eq!(ids(&expected), vec!["task-1"]);
    }
}
