pub mod config;
pub mod controller;
pub mod state;
pub mod surface;

pub use config::DisplayConfig;
pub use controller::DisplayStateController;
pub use state::{AnomalyAlert, AnomalySeverity, DisplaySession};
pub use surface::{FullscreenSurface, HeadlessSurface, SurfaceFuture};
