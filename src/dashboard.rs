//! Composition root: one `Dashboard` per application instance owns every
//! store, the shared event bus and the current task filter.

use std::{
    path::PathBuf,
    sync::{Arc, RwLock},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    data::{
        DataSource, PerformanceSummary, RandomDataSource, SeededDataSource, SeriesPoint,
        TimePeriod, WorkflowInsight,
    },
    display::{DisplayConfig, DisplaySession, DisplayStateController, FullscreenSurface, HeadlessSurface},
    ephemeral::{
        EphemeralConfig, Notification, NotificationKind, NotificationManager, Point,
        TransmissionManager, TransmissionPath,
    },
    events::{DashboardEvent, NoticeLevel, SharedBus},
    insights::InsightBoard,
    settings::{PreferenceStore, Theme, PREFERENCES_FILE},
    tasks::{fixtures::sample_tasks_at, Task, TaskCounts, TaskFilter, TaskPriority, TaskStatus, TaskStore},
    utils::sync::{read, write},
};

pub const METRICS_REFRESH_SECS: u64 = 30;
pub const DATA_SEED_ENV: &str = "AGENCY_DASHBOARD_SEED";
pub const DATA_DIR_ENV: &str = "AGENCY_DASHBOARD_DATA_DIR";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub display: DisplayConfig,
    pub notifications: EphemeralConfig,
    pub transmissions: EphemeralConfig,
    pub metrics_refresh: Duration,
    pub metrics_period: TimePeriod,
    /// Seeds both the data source and the display RNG when set.
    pub data_seed: Option<u64>,
    /// Where `preferences.json` lives; in-memory preferences when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            notifications: EphemeralConfig::notifications(),
            transmissions: EphemeralConfig::transmissions(),
            metrics_refresh: Duration::from_secs(METRICS_REFRESH_SECS),
            metrics_period: TimePeriod::default(),
            data_seed: None,
            data_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let data_seed = std::env::var(DATA_SEED_ENV).ok().and_then(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|err| warn!("Ignoring {DATA_SEED_ENV}='{raw}': {err}"))
                .ok()
        });
        let data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);

        Self {
            data_seed,
            data_dir,
            ..Self::default()
        }
    }
}

/// External collaborators a dashboard is wired to.
pub struct DashboardDeps {
    pub bus: SharedBus,
    pub data: Arc<dyn DataSource>,
    pub surface: Arc<dyn FullscreenSurface>,
    pub preferences: PreferenceStore,
    pub rng: Box<dyn RngCore + Send>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub period: TimePeriod,
    pub kpis: Vec<SeriesPoint>,
    pub performance: PerformanceSummary,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub tasks: Vec<Task>,
    /// Counted over the full list, not the filtered one.
    pub counts: TaskCounts,
    pub filter: TaskFilter,
    pub notifications: Vec<Notification>,
    pub transmissions: Vec<TransmissionPath>,
    pub session: DisplaySession,
    pub theme: Theme,
    pub metrics: Option<DashboardMetrics>,
    pub insights: Vec<WorkflowInsight>,
}

#[derive(Clone)]
pub struct Dashboard {
    tasks: TaskStore,
    notifications: NotificationManager,
    transmissions: TransmissionManager,
    display: DisplayStateController,
    insights: InsightBoard,
    preferences: Arc<PreferenceStore>,
    data: Arc<dyn DataSource>,
    filter: Arc<RwLock<TaskFilter>>,
    metrics: Arc<Mutex<Option<DashboardMetrics>>>,
    refresher: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel_token: CancellationToken,
    bus: SharedBus,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, deps: DashboardDeps, seed: Vec<Task>) -> Self {
        let DashboardDeps {
            bus,
            data,
            surface,
            preferences,
            rng,
        } = deps;

        Self {
            tasks: TaskStore::with_tasks(Arc::clone(&bus), seed),
            notifications: NotificationManager::new(config.notifications, Arc::clone(&bus)),
            transmissions: TransmissionManager::new(config.transmissions, Arc::clone(&bus)),
            display: DisplayStateController::new(
                config.display.clone(),
                rng,
                surface,
                Arc::clone(&bus),
            ),
            insights: InsightBoard::new(Arc::clone(&bus)),
            preferences: Arc::new(preferences),
            data,
            filter: Arc::new(RwLock::new(TaskFilter::default())),
            metrics: Arc::new(Mutex::new(None)),
            refresher: Arc::new(Mutex::new(None)),
            cancel_token: CancellationToken::new(),
            bus,
            config,
        }
    }

    /// Default wiring: headless surface, sample tasks anchored at now, seeded
    /// or entropy-backed data depending on `config.data_seed`.
    pub fn from_config(config: DashboardConfig, bus: SharedBus) -> Result<Self> {
        let preferences = match &config.data_dir {
            Some(dir) => PreferenceStore::new(dir.join(PREFERENCES_FILE))
                .context("failed to open dashboard preferences")?,
            None => PreferenceStore::in_memory(),
        };
        let (data, rng): (Arc<dyn DataSource>, Box<dyn RngCore + Send>) = match config.data_seed {
            Some(seed) => {
                info!("Using seeded data source (seed {seed})");
                (
                    Arc::new(SeededDataSource::new(seed)),
                    Box::new(StdRng::seed_from_u64(seed)),
                )
            }
            None => (
                Arc::new(RandomDataSource::new()),
                Box::new(StdRng::from_entropy()),
            ),
        };

        let deps = DashboardDeps {
            bus,
            data,
            surface: Arc::new(HeadlessSurface),
            preferences,
            rng,
        };
        Ok(Self::new(config, deps, sample_tasks_at(Utc::now())))
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn transmissions(&self) -> &TransmissionManager {
        &self.transmissions
    }

    pub fn display(&self) -> &DisplayStateController {
        &self.display
    }

    pub fn insights(&self) -> &InsightBoard {
        &self.insights
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub async fn start(&self) -> Result<()> {
        self.display.start().await?;
        self.refresh_metrics(self.config.metrics_period).await;
        self.refresh_insights();

        let mut refresher = self.refresher.lock().await;
        if let Some(handle) = refresher.take() {
            handle.abort();
        }
        *refresher = Some(self.spawn_metrics_refresher());
        info!("Dashboard started with theme {}", self.theme().as_str());
        Ok(())
    }

    /// Tears down every timer the dashboard owns.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.refresher.lock().await.take() {
            handle.abort();
        }
        self.display.teardown().await;
        self.notifications.clear().await;
        self.transmissions.clear().await;
        info!("Dashboard shut down");
    }

    pub fn filter(&self) -> TaskFilter {
        read(&self.filter).clone()
    }

    pub fn set_filter(&self, filter: TaskFilter) {
        *write(&self.filter) = filter;
        self.bus.emit(DashboardEvent::FilterChanged);
    }

    pub fn set_priority_filter(&self, priority: Option<TaskPriority>) {
        write(&self.filter).priority = priority;
        self.bus.emit(DashboardEvent::FilterChanged);
    }

    pub fn set_status_filter(&self, status: Option<TaskStatus>) {
        write(&self.filter).status = status;
        self.bus.emit(DashboardEvent::FilterChanged);
    }

    pub fn set_division_filter(&self, division: Option<String>) {
        write(&self.filter).division = division;
        self.bus.emit(DashboardEvent::FilterChanged);
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        write(&self.filter).search_term = term.into();
        self.bus.emit(DashboardEvent::FilterChanged);
    }

    pub fn clear_filter(&self) {
        self.set_filter(TaskFilter::default());
    }

    pub fn visible_tasks(&self) -> Vec<Task> {
        self.tasks.filtered(&self.filter())
    }

    /// Pushes a toast and returns its id.
    pub async fn notify(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        temporary: bool,
    ) -> String {
        let mut notification = Notification::new(Uuid::new_v4().to_string(), kind, message);
        notification.temporary = temporary;
        let id = notification.id.clone();
        self.notifications.push(notification).await;
        id
    }

    /// Animates a transmission between two floorplan points; it expires on
    /// its own.
    pub async fn transmit(&self, from: Point, to: Point, color: impl Into<String>) -> String {
        let path = TransmissionPath::new(Uuid::new_v4().to_string(), from, to, color);
        let id = path.id.clone();
        self.transmissions.push(path).await;
        id
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    /// Persists the theme. A write failure is reported on the bus and
    /// returned; the in-memory preference has already changed.
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let persisted = self.preferences.set_theme(theme);
        self.bus.emit(DashboardEvent::ThemeChanged { theme });
        if let Err(err) = &persisted {
            error!("Failed to persist theme {}: {err:#}", theme.as_str());
            self.bus.emit(DashboardEvent::Notice {
                level: NoticeLevel::Error,
                message: format!("Theme could not be saved: {err}"),
            });
        }
        persisted
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub async fn refresh_metrics(&self, period: TimePeriod) -> DashboardMetrics {
        let metrics = DashboardMetrics {
            period,
            kpis: self.data.kpi_series(period),
            performance: self.data.performance(period),
        };
        *self.metrics.lock().await = Some(metrics.clone());
        self.bus.emit(DashboardEvent::MetricsRefreshed { period });
        metrics
    }

    pub fn refresh_insights(&self) {
        self.insights.replace(self.data.workflow_insights());
    }

    pub async fn view(&self) -> DashboardView {
        let filter = self.filter();
        DashboardView {
            tasks: self.tasks.filtered(&filter),
            counts: self.tasks.derive_counts(),
            filter,
            notifications: self.notifications.items().await,
            transmissions: self.transmissions.items().await,
            session: self.display.snapshot().await,
            theme: self.theme(),
            metrics: self.metrics.lock().await.clone(),
            insights: self.insights.list(),
        }
    }

    fn spawn_metrics_refresher(&self) -> JoinHandle<()> {
        let dashboard = self.clone();
        let every = self.config.metrics_refresh;
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let period = dashboard
                            .metrics
                            .lock()
                            .await
                            .as_ref()
                            .map(|metrics| metrics.period)
                            .unwrap_or(dashboard.config.metrics_period);
                        dashboard.refresh_metrics(period).await;
                    }
                    _ = cancel_token.cancelled() => break,
                }
            }
        })
    }
}
