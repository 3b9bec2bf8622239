//! Seed data shown on first launch.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::model::{Comment, Subtask, Task, TaskPriority, TaskStatus};

/// Anchor used by [`sample_tasks`]: 2024-06-14 12:00 UTC.
pub fn sample_anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn sample_tasks() -> Vec<Task> {
    sample_tasks_at(sample_anchor())
}

/// The six seeded tasks with every timestamp placed relative to `anchor`.
pub fn sample_tasks_at(anchor: DateTime<Utc>) -> Vec<Task> {
    vec![
        seeded(
            "task-1",
            "Market trend analysis",
            "Summarise competitor pricing moves for the leadership brief.",
            TaskStatus::InProgress,
            65,
            TaskPriority::High,
            "research",
            anchor - Duration::days(5),
            Some(anchor + Duration::hours(3)),
            &["analysis", "q2"],
        )
        .with_subtasks(&[("Collect pricing pages", true), ("Draft brief", false)]),
        seeded(
            "task-2",
            "Deploy recommendation model v2",
            "Roll the retrained model out behind the churn experiment flag.",
            TaskStatus::InProgress,
            40,
            TaskPriority::High,
            "development",
            anchor - Duration::days(3),
            Some(anchor - Duration::hours(3)),
            &["ml", "deployment"],
        ),
        seeded(
            "task-3",
            "Quarterly compliance audit",
            "Verify data-retention controls across every agent workspace.",
            TaskStatus::Completed,
            100,
            TaskPriority::Medium,
            "compliance",
            anchor - Duration::days(12),
            Some(anchor - Duration::days(4)),
            &["audit", "q2"],
        )
        .with_comment("Compliance Agent", "All controls verified.", anchor - Duration::days(4)),
        seeded(
            "task-4",
            "Knowledge base migration",
            "Move legacy runbooks into the shared knowledge graph.",
            TaskStatus::Paused,
            30,
            TaskPriority::Low,
            "knowledge",
            anchor - Duration::days(8),
            Some(anchor + Duration::days(6)),
            &["docs"],
        ),
        seeded(
            "task-5",
            "Agent onboarding workflow",
            "Define the hand-off checklist for newly provisioned agents.",
            TaskStatus::InProgress,
            80,
            TaskPriority::Medium,
            "management",
            anchor - Duration::days(2),
            None,
            &["process"],
        ),
        seeded(
            "task-6",
            "Data pipeline backfill",
            "Replay the ingestion jobs that dropped records last week.",
            TaskStatus::Failed,
            15,
            TaskPriority::High,
            "development",
            anchor - Duration::days(1),
            Some(anchor - Duration::minutes(12 * 60 + 30)),
            &["pipeline"],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seeded(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    progress: u8,
    priority: TaskPriority,
    division: &str,
    created_at: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    tags: &[&str],
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        progress,
        priority,
        division: division.to_string(),
        created_at,
        updated_at: created_at,
        due_date,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        attachments: Vec::new(),
        subtasks: Vec::new(),
        comments: Vec::new(),
    }
}

trait SeedExt {
    fn with_subtasks(self, subtasks: &[(&str, bool)]) -> Self;
    fn with_comment(self, author: &str, text: &str, at: DateTime<Utc>) -> Self;
}

impl SeedExt for Task {
    fn with_subtasks(mut self, subtasks: &[(&str, bool)]) -> Self {
        for (index, (title, completed)) in subtasks.iter().enumerate() {
            self.subtasks.push(Subtask {
                id: format!("{}-sub-{}", self.id, index + 1),
                title: title.to_string(),
                completed: *completed,
            });
        }
        self
    }

    fn with_comment(mut self, author: &str, text: &str, at: DateTime<Utc>) -> Self {
        let id = format!("{}-comment-{}", self.id, self.comments.len() + 1);
        self.comments.push(Comment {
            id,
            author: author.to_string(),
            text: text.to_string(),
            timestamp: at,
        });
        self
    }
}
