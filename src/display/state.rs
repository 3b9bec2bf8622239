use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyAlert {
    pub title: String,
    pub description: String,
    pub severity: AnomalySeverity,
    pub division: String,
}

struct AnomalyTemplate {
    title: &'static str,
    description: &'static str,
    severity: AnomalySeverity,
    division: &'static str,
}

const ANOMALY_CATALOG: [AnomalyTemplate; 4] = [
    AnomalyTemplate {
        title: "Unusual response latency",
        description: "Research agents are answering 3x slower than their weekly baseline.",
        severity: AnomalySeverity::High,
        division: "research",
    },
    AnomalyTemplate {
        title: "Deployment error spike",
        description: "Failed builds in the development division doubled in the last hour.",
        severity: AnomalySeverity::High,
        division: "development",
    },
    AnomalyTemplate {
        title: "Policy check drift",
        description: "Two compliance rules were evaluated against an outdated policy set.",
        severity: AnomalySeverity::Medium,
        division: "compliance",
    },
    AnomalyTemplate {
        title: "Knowledge sync stalled",
        description: "The knowledge graph has not ingested new documents for 45 minutes.",
        severity: AnomalySeverity::Low,
        division: "knowledge",
    },
];

/// Maps a unit draw in `[0, 1)` onto a catalog entry.
pub fn anomaly_from_draw(draw: f64) -> AnomalyAlert {
    let len = ANOMALY_CATALOG.len();
    let index = ((draw.clamp(0.0, 1.0) * len as f64) as usize).min(len - 1);
    let template = &ANOMALY_CATALOG[index];
    AnomalyAlert {
        title: template.title.to_string(),
        description: template.description.to_string(),
        severity: template.severity,
        division: template.division.to_string(),
    }
}

/// Per-tab UI state; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySession {
    pub system_health: f64,
    pub anomaly_alert: Option<AnomalyAlert>,
    pub is_fullscreen: bool,
    pub sidebar_collapsed: bool,
}

impl DisplaySession {
    pub fn new(initial_health: f64) -> Self {
        Self {
            system_health: initial_health,
            anomaly_alert: None,
            is_fullscreen: false,
            sidebar_collapsed: false,
        }
    }
}

pub fn next_health(current: f64, delta: f64, min: f64, max: f64) -> f64 {
    (current + delta).clamp(min, max)
}

/// Uniform step in `[-max_step, max_step)`. A zero, negative or NaN bound
/// freezes the gauge instead of sampling an empty range.
pub fn health_delta<R: Rng + ?Sized>(rng: &mut R, max_step: f64) -> f64 {
    if max_step > 0.0 {
        rng.gen_range(-max_step..max_step)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn health_step_is_clamped_to_bounds() {
        assert_eq!(next_health(98.6, 0.9, 90.0, 99.0), 99.0);
        assert_eq!(next_health(90.2, -0.7, 90.0, 99.0), 90.0);
        assert_eq!(next_health(94.0, 0.5, 90.0, 99.0), 94.5);
    }

    #[test]
    fn out_of_range_health_is_pulled_back_in() {
        assert_eq!(next_health(150.0, -1.0, 90.0, 99.0), 99.0);
        assert_eq!(next_health(-3.0, 1.0, 90.0, 99.0), 90.0);
    }

    #[test]
    fn non_positive_step_bound_yields_no_movement() {
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(health_delta(&mut rng, 0.0), 0.0);
        assert_eq!(health_delta(&mut rng, -2.0), 0.0);
        assert_eq!(health_delta(&mut rng, f64::NAN), 0.0);
    }

    #[test]
    fn step_stays_within_the_bound() {
        let mut low = StepRng::new(0, 0);
        assert_eq!(health_delta(&mut low, 1.0), -1.0);

        let mut high = StepRng::new(u64::MAX, 0);
        let delta = health_delta(&mut high, 0.5);
        assert!(delta > 0.49 && delta < 0.5, "delta was {delta}");
    }

    #[test]
    fn draw_maps_across_the_whole_catalog() {
        assert_eq!(anomaly_from_draw(0.0).division, "research");
        assert_eq!(anomaly_from_draw(0.999_999).division, "knowledge");
        assert_eq!(anomaly_from_draw(1.0).division, "knowledge");
        assert_eq!(anomaly_from_draw(0.3).division, "development");
    }
}
