use std::time::Duration;

pub const HEALTH_TICK_SECS: u64 = 5;
pub const HEALTH_MIN: f64 = 90.0;
pub const HEALTH_MAX: f64 = 99.0;
pub const INITIAL_HEALTH: f64 = 97.0;
pub const MAX_HEALTH_STEP: f64 = 1.0;
pub const ANOMALY_DELAY_SECS: u64 = 30;
pub const ANOMALY_THRESHOLD: f64 = 0.7;

/// Tunables for the display session timers.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Interval between health random-walk steps
    pub health_tick: Duration,

    /// Health is clamped into `[health_min, health_max]` after every step
    pub health_min: f64,
    pub health_max: f64,
    pub initial_health: f64,

    /// Each step adds a uniform draw from `[-max_health_step, max_health_step)`;
    /// zero freezes the gauge
    pub max_health_step: f64,

    /// One-shot anomaly check fires this long after `start`
    pub anomaly_delay: Duration,

    /// The check raises an anomaly only when its draw exceeds this
    pub anomaly_threshold: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            health_tick: Duration::from_secs(HEALTH_TICK_SECS),
            health_min: HEALTH_MIN,
            health_max: HEALTH_MAX,
            initial_health: INITIAL_HEALTH,
            max_health_step: MAX_HEALTH_STEP,
            anomaly_delay: Duration::from_secs(ANOMALY_DELAY_SECS),
            anomaly_threshold: ANOMALY_THRESHOLD,
        }
    }
}
