//! Backend for platforms without a GDI capture path.
//!
//! Only [`CaptureBackend::startup`] is ever reached: it fails, so the
//! pipeline stops before any handle exists.

use std::path::Path;

use super::{BitmapHandle, CaptureBackend, DeviceContext, SessionToken};
use crate::encoder::{EncoderId, EncoderInfo};
use crate::errors::SaveStatus;
use crate::geometry::{CaptureRegion, ScreenMetrics};

#[derive(Debug, Default)]
pub struct UnsupportedBackend;

impl UnsupportedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBackend for UnsupportedBackend {
    fn startup(&self) -> Option<SessionToken> {
        log::debug!(
            "no screen capture backend for {}; GDI capture requires Windows",
            std::env::consts::OS
        );
        None
    }

    fn shutdown(&self, _token: SessionToken) {}

    fn screen_metrics(&self) -> ScreenMetrics {
        ScreenMetrics::default()
    }

    fn acquire_screen_dc(&self) -> Option<DeviceContext> {
        None
    }

    fn release_screen_dc(&self, _dc: DeviceContext) {}

    fn create_memory_dc(&self, _screen: DeviceContext) -> Option<DeviceContext> {
        None
    }

    fn delete_memory_dc(&self, _dc: DeviceContext) {}

    fn create_bitmap(&self, _screen: DeviceContext, _width: i32, _height: i32) -> Option<BitmapHandle> {
        None
    }

    fn delete_bitmap(&self, _bitmap: BitmapHandle) {}

    fn blit(
        &self,
        _memory: DeviceContext,
        _bitmap: BitmapHandle,
        _screen: DeviceContext,
        _region: &CaptureRegion,
    ) -> bool {
        false
    }

    fn image_encoders(&self) -> Vec<EncoderInfo> {
        Vec::new()
    }

    fn save_bitmap(
        &self,
        _bitmap: BitmapHandle,
        _path: &Path,
        _encoder: EncoderId,
    ) -> Result<(), SaveStatus> {
        // GDI+ `NotImplemented`
        Err(SaveStatus(6))
    }
}
