//! Payloads managed by [`super::EphemeralItemManager`]. Position, color and
//! message are carried for the renderer; the manager only reads `id` and
//! `temporary`.

use serde::{Deserialize, Serialize};

use crate::events::DashboardEvent;

use super::manager::EphemeralItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub position: Option<Point>,
    pub temporary: bool,
}

impl Notification {
    pub fn new(id: impl Into<String>, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            message: message.into(),
            position: None,
            temporary: false,
        }
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point { x, y });
        self
    }
}

impl EphemeralItem for Notification {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_temporary(&self) -> bool {
        self.temporary
    }

    fn changed_event() -> DashboardEvent {
        DashboardEvent::NotificationsChanged
    }
}

/// Animated line between two desks on the office floorplan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionPath {
    pub id: String,
    pub from: Point,
    pub to: Point,
    pub color: String,
    pub temporary: bool,
}

impl TransmissionPath {
    pub fn new(id: impl Into<String>, from: Point, to: Point, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            color: color.into(),
            temporary: true,
        }
    }
}

impl EphemeralItem for TransmissionPath {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_temporary(&self) -> bool {
        self.temporary
    }

    fn changed_event() -> DashboardEvent {
        DashboardEvent::TransmissionsChanged
    }
}
