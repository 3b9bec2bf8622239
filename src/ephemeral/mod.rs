pub mod items;
pub mod manager;

pub use items::{Notification, NotificationKind, Point, TransmissionPath};
pub use manager::{
    EphemeralConfig, EphemeralItem, EphemeralItemManager, NOTIFICATION_LIFETIME_MS,
    TRANSMISSION_LIFETIME_MS,
};

pub type NotificationManager = EphemeralItemManager<Notification>;
pub type TransmissionManager = EphemeralItemManager<TransmissionPath>;
