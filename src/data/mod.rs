//! Mock metric feeds behind a pluggable [`DataSource`] capability.
//!
//! The dashboard only consumes the shapes defined here and treats every
//! value as already validated.

mod generator;

pub use generator::{RandomDataSource, SeededDataSource};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

impl TimePeriod {
    pub fn bucket_count(&self) -> usize {
        match self {
            TimePeriod::Day => 24,
            TimePeriod::Week => 7,
            TimePeriod::Month => 30,
            TimePeriod::Quarter => 12,
        }
    }

    pub fn bucket_label(&self, index: usize) -> String {
        const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        match self {
            TimePeriod::Day => format!("{index:02}:00"),
            TimePeriod::Week => WEEKDAYS[index % WEEKDAYS.len()].to_string(),
            TimePeriod::Month => format!("Day {}", index + 1),
            TimePeriod::Quarter => format!("W{}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

/// Percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub efficiency: f64,
    pub accuracy: f64,
    pub utilization: f64,
    pub satisfaction: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InsightImpact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInsight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: InsightImpact,
    pub division: String,
    pub applied: bool,
}

pub trait DataSource: Send + Sync {
    fn kpi_series(&self, period: TimePeriod) -> Vec<SeriesPoint>;
    fn performance(&self, period: TimePeriod) -> PerformanceSummary;
    fn workflow_insights(&self) -> Vec<WorkflowInsight>;
}
