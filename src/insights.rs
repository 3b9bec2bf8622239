//! Workflow insight board: the AI suggestions a user can apply or revert.

use std::sync::{Arc, RwLock};

use crate::{
    data::{InsightImpact, WorkflowInsight},
    events::{DashboardEvent, SharedBus},
    utils::sync::{read, write},
};

#[derive(Clone)]
pub struct InsightBoard {
    insights: Arc<RwLock<Vec<WorkflowInsight>>>,
    bus: SharedBus,
}

impl InsightBoard {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            insights: Arc::new(RwLock::new(Vec::new())),
            bus,
        }
    }

    /// Swaps in a fresh batch. Insights that survive the swap keep their
    /// applied flag.
    pub fn replace(&self, incoming: Vec<WorkflowInsight>) {
        {
            let mut insights = write(&self.insights);
            let merged: Vec<WorkflowInsight> = incoming
                .into_iter()
                .map(|mut insight| {
                    if let Some(previous) = insights.iter().find(|old| old.id == insight.id) {
                        insight.applied = previous.applied;
                    }
                    insight
                })
                .collect();
            *insights = merged;
        }
        self.bus.emit(DashboardEvent::InsightsChanged);
    }

    pub fn list(&self) -> Vec<WorkflowInsight> {
        read(&self.insights).clone()
    }

    pub fn apply(&self, id: &str) -> bool {
        self.set_applied(id, true)
    }

    pub fn revert(&self, id: &str) -> bool {
        self.set_applied(id, false)
    }

    pub fn filter(&self, impact: Option<InsightImpact>) -> Vec<WorkflowInsight> {
        filter_by_impact(&read(&self.insights), impact)
    }

    /// False when the id is unknown or the flag already had that value.
    fn set_applied(&self, id: &str, applied: bool) -> bool {
        let changed = {
            let mut insights = write(&self.insights);
            match insights.iter_mut().find(|insight| insight.id == id) {
                Some(insight) if insight.applied != applied => {
                    insight.applied = applied;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.bus.emit(DashboardEvent::InsightsChanged);
        }
        changed
    }
}

pub fn filter_by_impact(
    insights: &[WorkflowInsight],
    impact: Option<InsightImpact>,
) -> Vec<WorkflowInsight> {
    insights
        .iter()
        .filter(|insight| impact.map_or(true, |impact| insight.impact == impact))
        .cloned()
        .collect()
}
