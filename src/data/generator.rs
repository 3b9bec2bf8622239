use std::sync::Mutex;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::utils::sync::lock;

use super::{
    DataSource, InsightImpact, PerformanceSummary, SeriesPoint, TimePeriod, WorkflowInsight,
};

const INSIGHTS_PER_REFRESH: usize = 3;

struct InsightTemplate {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    impact: InsightImpact,
    division: &'static str,
}

const INSIGHT_CATALOG: [InsightTemplate; 5] = [
    InsightTemplate {
        id: "insight-parallel-review",
        title: "Parallelise code review",
        description: "Routing reviews to two agents at once would cut cycle time by ~18%.",
        impact: InsightImpact::High,
        division: "development",
    },
    InsightTemplate {
        id: "insight-cache-sources",
        title: "Cache research sources",
        description: "Half of the research queries re-fetch the same sources every day.",
        impact: InsightImpact::Medium,
        division: "research",
    },
    InsightTemplate {
        id: "insight-batch-audits",
        title: "Batch compliance audits",
        description: "Grouping audits by workspace removes duplicated policy loads.",
        impact: InsightImpact::Medium,
        division: "compliance",
    },
    InsightTemplate {
        id: "insight-prune-articles",
        title: "Prune stale articles",
        description: "Twelve knowledge articles have not been read in 90 days.",
        impact: InsightImpact::Low,
        division: "knowledge",
    },
    InsightTemplate {
        id: "insight-rebalance-load",
        title: "Rebalance agent load",
        description: "Three management agents sit idle while the queue backs up.",
        impact: InsightImpact::High,
        division: "management",
    },
];

/// Bounds of a single KPI bucket for each period.
fn kpi_range(period: TimePeriod) -> (f64, f64) {
    match period {
        TimePeriod::Day => (20.0, 80.0),
        TimePeriod::Week => (200.0, 500.0),
        TimePeriod::Month => (800.0, 1500.0),
        TimePeriod::Quarter => (2500.0, 5000.0),
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

struct Generator {
    rng: Mutex<StdRng>,
}

impl Generator {
    fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn kpi_series(&self, period: TimePeriod) -> Vec<SeriesPoint> {
        let (low, high) = kpi_range(period);
        let mut rng = lock(&self.rng);
        (0..period.bucket_count())
            .map(|index| SeriesPoint {
                name: period.bucket_label(index),
                value: rng.gen_range(low..high).round(),
            })
            .collect()
    }

    fn performance(&self, period: TimePeriod) -> PerformanceSummary {
        // Longer windows average out, so their spread is narrower.
        let spread = match period {
            TimePeriod::Day => 1.0,
            TimePeriod::Week => 0.8,
            TimePeriod::Month => 0.6,
            TimePeriod::Quarter => 0.5,
        };
        let mut rng = lock(&self.rng);
        let mut draw = |center: f64, radius: f64| {
            let radius = radius * spread;
            one_decimal(rng.gen_range(center - radius..center + radius).clamp(0.0, 100.0))
        };
        PerformanceSummary {
            efficiency: draw(86.0, 10.0),
            accuracy: draw(93.0, 6.0),
            utilization: draw(78.0, 16.0),
            satisfaction: draw(90.0, 8.0),
        }
    }

    fn workflow_insights(&self) -> Vec<WorkflowInsight> {
        let mut rng = lock(&self.rng);
        INSIGHT_CATALOG
            .choose_multiple(&mut *rng, INSIGHTS_PER_REFRESH)
            .map(|template| WorkflowInsight {
                id: template.id.to_string(),
                title: template.title.to_string(),
                description: template.description.to_string(),
                impact: template.impact,
                division: template.division.to_string(),
                applied: false,
            })
            .collect()
    }
}

/// Deterministic feed: equal seeds produce equal sequences of calls.
pub struct SeededDataSource(Generator);

impl SeededDataSource {
    pub fn new(seed: u64) -> Self {
        Self(Generator::new(StdRng::seed_from_u64(seed)))
    }
}

/// Entropy-backed feed for demo runs.
pub struct RandomDataSource(Generator);

impl RandomDataSource {
    pub fn new() -> Self {
        Self(Generator::new(StdRng::from_entropy()))
    }
}

impl Default for RandomDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for SeededDataSource {
    fn kpi_series(&self, period: TimePeriod) -> Vec<SeriesPoint> {
        self.0.kpi_series(period)
    }

    fn performance(&self, period: TimePeriod) -> PerformanceSummary {
        self.0.performance(period)
    }

    fn workflow_insights(&self) -> Vec<WorkflowInsight> {
        self.0.workflow_insights()
    }
}

impl DataSource for RandomDataSource {
    fn kpi_series(&self, period: TimePeriod) -> Vec<SeriesPoint> {
        self.0.kpi_series(period)
    }

    fn performance(&self, period: TimePeriod) -> PerformanceSummary {
        self.0.performance(period)
    }

    fn workflow_insights(&self) -> Vec<WorkflowInsight> {
        self.0.workflow_insights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_data() {
        let a = SeededDataSource::new(42);
        let b = SeededDataSource::new(42);
        assert_eq!(a.kpi_series(TimePeriod::Week), b.kpi_series(TimePeriod::Week));
        assert_eq!(a.performance(TimePeriod::Day), b.performance(TimePeriod::Day));
        assert_eq!(a.workflow_insights(), b.workflow_insights());
    }

    #[test]
    fn series_has_one_point_per_bucket_within_range() {
        let source = RandomDataSource::new();
        for period in [
            TimePeriod::Day,
            TimePeriod::Week,
            TimePeriod::Month,
            TimePeriod::Quarter,
        ] {
            let series = source.kpi_series(period);
            let (low, high) = kpi_range(period);
            assert_eq!(series.len(), period.bucket_count());
            assert_eq!(series[0].name, period.bucket_label(0));
            assert!(series
                .iter()
                .all(|point| point.value >= low && point.value <= high));
        }
    }

    #[test]
    fn performance_stays_a_percentage() {
        let source = SeededDataSource::new(7);
        for _ in 0..50 {
            let summary = source.performance(TimePeriod::Day);
            for value in [
                summary.efficiency,
                summary.accuracy,
                summary.utilization,
                summary.satisfaction,
            ] {
                assert!((0.0..=100.0).contains(&value));
            }
        }
    }

    #[test]
    fn insights_are_distinct_and_unapplied() {
        let insights = SeededDataSource::new(3).workflow_insights();
        assert_eq!(insights.len(), INSIGHTS_PER_REFRESH);
        assert!(insights.iter().all(|insight| !insight.applied));
        let mut ids: Vec<_> = insights.iter().map(|insight| insight.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), INSIGHTS_PER_REFRESH);
    }
}
