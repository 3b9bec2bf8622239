//! Typed event bus shared by every store of one dashboard instance.
//!
//! Stores never dispatch globally; they hold an `Arc<dyn EventBus>` handed to
//! them at construction and emit after each committed mutation. Renderers
//! either subscribe ([`BroadcastBus`]) or poll ([`RecordingBus`]).

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::{
    data::TimePeriod,
    display::AnomalyAlert,
    settings::Theme,
    utils::sync::lock,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardEvent {
    TasksChanged,
    FilterChanged,
    NotificationsChanged,
    TransmissionsChanged,
    InsightsChanged,
    HealthUpdated { value: f64 },
    AnomalyRaised { alert: AnomalyAlert },
    AnomalyDismissed,
    FullscreenChanged { requested: bool },
    SidebarChanged { collapsed: bool },
    ThemeChanged { theme: Theme },
    MetricsRefreshed { period: TimePeriod },
    Notice { level: NoticeLevel, message: String },
}

pub trait EventBus: Send + Sync {
    fn emit(&self, event: DashboardEvent);
}

pub type SharedBus = Arc<dyn EventBus>;

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl EventBus for NullBus {
    fn emit(&self, _event: DashboardEvent) {}
}

/// Fan-out to any number of async subscribers. Lagging subscribers lose the
/// oldest events, they never block a store.
#[derive(Clone)]
pub struct BroadcastBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }
}

impl EventBus for BroadcastBus {
    fn emit(&self, event: DashboardEvent) {
        // No receivers is a normal state (headless runs, tests).
        let _ = self.sender.send(event);
    }
}

/// Buffers events until the consumer drains them.
#[derive(Default)]
pub struct RecordingBus {
    events: Mutex<Vec<DashboardEvent>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<DashboardEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn snapshot(&self) -> Vec<DashboardEvent> {
        lock(&self.events).clone()
    }
}

impl EventBus for RecordingBus {
    fn emit(&self, event: DashboardEvent) {
        lock(&self.events).push(event);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_each_event() {
        let bus = BroadcastBus::new(8);
        let mut renderer = bus.subscribe();
        let mut logger = bus.subscribe();

        bus.emit(DashboardEvent::TasksChanged);
        bus.emit(DashboardEvent::HealthUpdated { value: 96.5 });

        for rx in [&mut renderer, &mut logger] {
            assert_eq!(rx.recv().await.unwrap(), DashboardEvent::TasksChanged);
            assert_eq!(
                rx.recv().await.unwrap(),
                DashboardEvent::HealthUpdated { value: 96.5 }
            );
            assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        let bus = BroadcastBus::new(1);
        bus.emit(DashboardEvent::FilterChanged);

        let mut late = bus.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn lagging_subscriber_loses_the_oldest_events() {
        let bus = BroadcastBus::new(2);
        let mut slow = bus.subscribe();

        bus.emit(DashboardEvent::TasksChanged);
        bus.emit(DashboardEvent::FilterChanged);
        bus.emit(DashboardEvent::NotificationsChanged);

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(slow.recv().await.unwrap(), DashboardEvent::FilterChanged);
        assert_eq!(
            slow.recv().await.unwrap(),
            DashboardEvent::NotificationsChanged
        );
    }

    #[test]
    fn recording_bus_drains_in_emit_order() {
        let bus = RecordingBus::new();
        bus.emit(DashboardEvent::AnomalyDismissed);
        bus.emit(DashboardEvent::SidebarChanged { collapsed: true });

        assert_eq!(bus.snapshot().len(), 2);
        assert_eq!(
            bus.drain(),
            vec![
                DashboardEvent::AnomalyDismissed,
                DashboardEvent::SidebarChanged { collapsed: true }
            ]
        );
        assert!(bus.drain().is_empty());
    }
}
