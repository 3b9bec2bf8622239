use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{bail, Result};
use rand::{Rng, RngCore};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    events::{DashboardEvent, NoticeLevel, SharedBus},
    utils::sync::lock,
};

use super::{
    config::DisplayConfig,
    state::{anomaly_from_draw, health_delta, next_health, DisplaySession},
    surface::FullscreenSurface,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub type SharedRng = Arc<StdMutex<Box<dyn RngCore + Send>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    TornDown,
}

struct ControllerState {
    session: DisplaySession,
    lifecycle: Lifecycle,
}

#[derive(Default)]
struct Timers {
    health: Option<JoinHandle<()>>,
    anomaly: Option<JoinHandle<()>>,
}

/// Owns the display session: fullscreen / sidebar toggles, the health random
/// walk and the one-shot anomaly check.
///
/// A controller runs once. After [`teardown`](Self::teardown) every timer is
/// gone and the session is frozen; re-arming the anomaly check means building
/// a new controller.
#[derive(Clone)]
pub struct DisplayStateController {
    state: Arc<Mutex<ControllerState>>,
    timers: Arc<Mutex<Timers>>,
    rng: SharedRng,
    surface: Arc<dyn FullscreenSurface>,
    bus: SharedBus,
    config: DisplayConfig,
    cancel_token: CancellationToken,
}

impl DisplayStateController {
    pub fn new(
        config: DisplayConfig,
        rng: Box<dyn RngCore + Send>,
        surface: Arc<dyn FullscreenSurface>,
        bus: SharedBus,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                session: DisplaySession::new(config.initial_health),
                lifecycle: Lifecycle::Idle,
            })),
            timers: Arc::new(Mutex::new(Timers::default())),
            rng: Arc::new(StdMutex::new(rng)),
            surface,
            bus,
            config,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn snapshot(&self) -> DisplaySession {
        self.state.lock().await.session.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.lifecycle == Lifecycle::Running
    }

    /// Starts the health ticker and schedules the single anomaly check.
    pub async fn start(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            match state.lifecycle {
                Lifecycle::Running => bail!("display controller already running"),
                Lifecycle::TornDown => bail!("display controller was torn down"),
                Lifecycle::Idle => state.lifecycle = Lifecycle::Running,
            }
        }

        let mut timers = self.timers.lock().await;
        timers.health = Some(self.spawn_health_ticker());
        timers.anomaly = Some(self.spawn_anomaly_check());
        log_info!(
            "display controller started (tick {:?}, anomaly check in {:?})",
            self.config.health_tick,
            self.config.anomaly_delay
        );
        Ok(())
    }

    /// Stops every timer. Idempotent; nothing mutates the session afterwards.
    pub async fn teardown(&self) {
        {
            let mut state = self.state.lock().await;
            if state.lifecycle == Lifecycle::TornDown {
                return;
            }
            state.lifecycle = Lifecycle::TornDown;
        }
        self.cancel_token.cancel();

        let (health, anomaly) = {
            let mut timers = self.timers.lock().await;
            (timers.health.take(), timers.anomaly.take())
        };
        for handle in [health, anomaly].into_iter().flatten() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    log_error!("display timer task failed: {err}");
                }
            }
        }
        log_info!("display controller torn down");
    }

    /// Flips the fullscreen flag and asks the surface to follow. A surface
    /// failure is logged and surfaced as a notice; the flag keeps the
    /// requested value.
    pub async fn toggle_fullscreen(&self) -> bool {
        let requested = {
            let mut state = self.state.lock().await;
            if state.lifecycle == Lifecycle::TornDown {
                log_warn!("fullscreen toggle after teardown ignored");
                return state.session.is_fullscreen;
            }
            state.session.is_fullscreen = !state.session.is_fullscreen;
            state.session.is_fullscreen
        };
        self.bus.emit(DashboardEvent::FullscreenChanged { requested });

        let outcome = if requested {
            self.surface.request_fullscreen().await
        } else {
            self.surface.exit_fullscreen().await
        };
        if let Err(err) = outcome {
            let action = if requested { "enter" } else { "exit" };
            log_error!("failed to {action} fullscreen: {err:#}");
            self.bus.emit(DashboardEvent::Notice {
                level: NoticeLevel::Warning,
                message: format!("Could not {action} fullscreen mode: {err}"),
            });
        }
        requested
    }

    pub async fn toggle_sidebar(&self) -> bool {
        let collapsed = {
            let mut state = self.state.lock().await;
            if state.lifecycle == Lifecycle::TornDown {
                log_warn!("sidebar toggle after teardown ignored");
                return state.session.sidebar_collapsed;
            }
            state.session.sidebar_collapsed = !state.session.sidebar_collapsed;
            state.session.sidebar_collapsed
        };
        self.bus.emit(DashboardEvent::SidebarChanged { collapsed });
        collapsed
    }

    pub async fn dismiss_anomaly(&self) {
        let cleared = {
            let mut state = self.state.lock().await;
            if state.lifecycle == Lifecycle::TornDown {
                return;
            }
            state.session.anomaly_alert.take().is_some()
        };
        if cleared {
            self.bus.emit(DashboardEvent::AnomalyDismissed);
        }
    }

    fn spawn_health_ticker(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let rng = Arc::clone(&self.rng);
        let bus = Arc::clone(&self.bus);
        let config = self.config.clone();
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let mut ticker =
                time::interval_at(Instant::now() + config.health_tick, config.health_tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let delta = health_delta(&mut *lock(&rng), config.max_health_step);
                        let value = {
                            let mut guard = state.lock().await;
                            if guard.lifecycle != Lifecycle::Running {
                                break;
                            }
                            guard.session.system_health = next_health(
                                guard.session.system_health,
                                delta,
                                config.health_min,
                                config.health_max,
                            );
                            guard.session.system_health
                        };
                        log_debug!("system health now {value:.2}");
                        bus.emit(DashboardEvent::HealthUpdated { value });
                    }
                    _ = cancel_token.cancelled() => break,
                }
            }
        })
    }

    fn spawn_anomaly_check(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let rng = Arc::clone(&self.rng);
        let bus = Arc::clone(&self.bus);
        let delay = self.config.anomaly_delay;
        let threshold = self.config.anomaly_threshold;
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = cancel_token.cancelled() => return,
            }

            let alert = {
                let mut guard = state.lock().await;
                if guard.lifecycle != Lifecycle::Running || guard.session.anomaly_alert.is_some() {
                    return;
                }
                let (draw, pick) = {
                    let mut rng = lock(&rng);
                    (rng.gen::<f64>(), rng.gen::<f64>())
                };
                if draw <= threshold {
                    log_debug!("anomaly check passed quietly (draw {draw:.3})");
                    return;
                }
                let alert = anomaly_from_draw(pick);
                guard.session.anomaly_alert = Some(alert.clone());
                alert
            };
            log_info!("anomaly raised: {} ({})", alert.title, alert.division);
            bus.emit(DashboardEvent::AnomalyRaised { alert });
        })
    }
}
