use std::{future::Future, pin::Pin};

use anyhow::Result;
use log::info;

/// Completion of a surface request; resolves once the display has accepted
/// or refused the change.
pub type SurfaceFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The external display the dashboard runs on. Requests may be refused
/// (no user gesture, kiosk policy, ...) and the refusal may arrive later;
/// the controller reports failures but keeps the user's requested state.
pub trait FullscreenSurface: Send + Sync {
    fn request_fullscreen(&self) -> SurfaceFuture<'_>;
    fn exit_fullscreen(&self) -> SurfaceFuture<'_>;
}

/// Surface for headless runs; accepts every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessSurface;

impl FullscreenSurface for HeadlessSurface {
    fn request_fullscreen(&self) -> SurfaceFuture<'_> {
        Box::pin(async {
            info!("headless surface: enter fullscreen");
            Ok::<(), anyhow::Error>(())
        })
    }

    fn exit_fullscreen(&self) -> SurfaceFuture<'_> {
        Box::pin(async {
            info!("headless surface: exit fullscreen");
            Ok::<(), anyhow::Error>(())
        })
    }
}
