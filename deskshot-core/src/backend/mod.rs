//! The seam between the capture pipeline and the operating system.
//!
//! [`CaptureBackend`] is a thin, handle-level mirror of the GDI / GDI+
//! calls the pipeline makes.  Acquire calls hand back plain handle
//! newtypes; ownership and release ordering are the job of the guards in
//! [`crate::resources`], never of the backend.
//!
//! | Implementation | Platform | Purpose |
//! |----------------|----------|---------|
//! | [`GdiBackend`] | Windows | GDI `BitBlt` capture, GDI+ PNG encoding |
//! | [`UnsupportedBackend`] | everything else | fails at startup |
//! | `MockBackend` | tests | scripted failures and a resource event log |

use std::path::Path;

use crate::encoder::{EncoderId, EncoderInfo};
use crate::errors::SaveStatus;
use crate::geometry::{CaptureRegion, ScreenMetrics};

#[cfg(windows)]
mod gdi;
#[cfg(windows)]
pub use gdi::GdiBackend;

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use unsupported::UnsupportedBackend;

#[cfg(test)]
pub(crate) mod mock;

/// Imaging-subsystem token returned by [`CaptureBackend::startup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(pub usize);

/// Raw device-context handle (screen or memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceContext(pub usize);

/// Raw bitmap handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHandle(pub usize);

/// Display and imaging operations used by one capture run.
///
/// Acquire operations return `None` for a null/invalid handle.  Release
/// operations are called exactly once per successfully acquired handle.
pub trait CaptureBackend {
    /// Start the imaging subsystem.
    fn startup(&self) -> Option<SessionToken>;

    fn shutdown(&self, token: SessionToken);

    /// Read virtual-screen and primary-display metrics.
    fn screen_metrics(&self) -> ScreenMetrics;

    /// Device context for the whole screen.
    fn acquire_screen_dc(&self) -> Option<DeviceContext>;

    fn release_screen_dc(&self, dc: DeviceContext);

    /// Off-screen device context compatible with `screen`.
    fn create_memory_dc(&self, screen: DeviceContext) -> Option<DeviceContext>;

    fn delete_memory_dc(&self, dc: DeviceContext);

    /// Bitmap compatible with `screen`, `width` x `height` pixels.
    fn create_bitmap(&self, screen: DeviceContext, width: i32, height: i32) -> Option<BitmapHandle>;

    fn delete_bitmap(&self, bitmap: BitmapHandle);

    /// Copy `region` of `screen` into `bitmap` at `(0, 0)`, including
    /// layered and overlay windows.
    ///
    /// `bitmap` is selected into `memory` for the duration of the copy and
    /// deselected again before returning, on success and on failure.
    fn blit(
        &self,
        memory: DeviceContext,
        bitmap: BitmapHandle,
        screen: DeviceContext,
        region: &CaptureRegion,
    ) -> bool;

    /// Installed image encoders in enumeration order.
    ///
    /// An enumeration failure is reported as an empty list.
    fn image_encoders(&self) -> Vec<EncoderInfo>;

    /// Encode `bitmap` with `encoder` and write it to `path`.
    fn save_bitmap(
        &self,
        bitmap: BitmapHandle,
        path: &Path,
        encoder: EncoderId,
    ) -> Result<(), SaveStatus>;
}
