//! RAII guards for every handle a capture run acquires.
//!
//! Each guard releases its handle exactly once in `Drop`.  The guards form
//! a borrow chain: the bitmap borrows the memory DC, which borrows the
//! screen DC, which borrows the imaging session.  The borrow checker
//! therefore rejects dropping any guard before the ones acquired after it,
//! and scope exit tears them down as bitmap -> memory DC -> screen DC ->
//! imaging session.
//!
//! The `PhantomData<*const ()>` field enforces `!Send` + `!Sync`: GDI
//! handles belong to the thread that created them.

use std::marker::PhantomData;

use crate::backend::{BitmapHandle, CaptureBackend, DeviceContext, SessionToken};
use crate::errors::CaptureError;
use crate::geometry::CaptureRegion;

/// Started imaging subsystem (the GDI+ token).
#[must_use = "ImagingSession must be kept alive for the duration of the capture"]
pub struct ImagingSession<'b, B: CaptureBackend + ?Sized> {
    backend: &'b B,
    token: SessionToken,
    _not_send: PhantomData<*const ()>,
}

impl<'b, B: CaptureBackend + ?Sized> ImagingSession<'b, B> {
    pub fn start(backend: &'b B) -> Result<Self, CaptureError> {
        let token = backend.startup().ok_or(CaptureError::Startup)?;
        log::debug!("imaging subsystem started");
        Ok(Self {
            backend,
            token,
            _not_send: PhantomData,
        })
    }

    /// Device context for the whole screen.
    pub fn screen_context(&self) -> Result<ScreenContext<'_, B>, CaptureError> {
        let dc = self
            .backend
            .acquire_screen_dc()
            .ok_or(CaptureError::ScreenContext)?;
        log::debug!("screen DC acquired");
        Ok(ScreenContext {
            backend: self.backend,
            dc,
            _not_send: PhantomData,
        })
    }
}

impl<B: CaptureBackend + ?Sized> Drop for ImagingSession<'_, B> {
    fn drop(&mut self) {
        self.backend.shutdown(self.token);
        log::debug!("imaging subsystem shut down");
    }
}

/// Screen device context; released with `ReleaseDC`.
#[must_use]
pub struct ScreenContext<'s, B: CaptureBackend + ?Sized> {
    backend: &'s B,
    dc: DeviceContext,
    _not_send: PhantomData<*const ()>,
}

impl<B: CaptureBackend + ?Sized> ScreenContext<'_, B> {
    pub fn handle(&self) -> DeviceContext {
        self.dc
    }

    /// Off-screen device context compatible with this screen.
    pub fn memory_context(&self) -> Result<MemoryContext<'_, B>, CaptureError> {
        let dc = self
            .backend
            .create_memory_dc(self.dc)
            .ok_or(CaptureError::MemoryContext)?;
        log::debug!("memory DC created");
        Ok(MemoryContext {
            backend: self.backend,
            screen: self.dc,
            dc,
            _not_send: PhantomData,
        })
    }
}

impl<B: CaptureBackend + ?Sized> Drop for ScreenContext<'_, B> {
    fn drop(&mut self) {
        self.backend.release_screen_dc(self.dc);
        log::debug!("screen DC released");
    }
}

/// Memory device context; deleted with `DeleteDC`.
#[must_use]
pub struct MemoryContext<'s, B: CaptureBackend + ?Sized> {
    backend: &'s B,
    /// Screen DC this context was made compatible with.
    screen: DeviceContext,
    dc: DeviceContext,
    _not_send: PhantomData<*const ()>,
}

impl<B: CaptureBackend + ?Sized> MemoryContext<'_, B> {
    pub fn handle(&self) -> DeviceContext {
        self.dc
    }

    /// Bitmap compatible with the screen, sized to `region`.
    ///
    /// Created against the screen DC (a memory DC starts out monochrome),
    /// but borrows this context so it is always deleted first.
    pub fn compatible_bitmap(
        &self,
        region: &CaptureRegion,
    ) -> Result<CompatibleBitmap<'_, B>, CaptureError> {
        let bitmap = self
            .backend
            .create_bitmap(self.screen, region.width, region.height)
            .ok_or(CaptureError::Bitmap)?;
        log::debug!("{}x{} bitmap created", region.width, region.height);
        Ok(CompatibleBitmap {
            backend: self.backend,
            bitmap,
            _not_send: PhantomData,
        })
    }
}

impl<B: CaptureBackend + ?Sized> Drop for MemoryContext<'_, B> {
    fn drop(&mut self) {
        self.backend.delete_memory_dc(self.dc);
        log::debug!("memory DC deleted");
    }
}

/// Captured bitmap; deleted with `DeleteObject`.
#[must_use]
pub struct CompatibleBitmap<'s, B: CaptureBackend + ?Sized> {
    backend: &'s B,
    bitmap: BitmapHandle,
    _not_send: PhantomData<*const ()>,
}

impl<B: CaptureBackend + ?Sized> CompatibleBitmap<'_, B> {
    pub fn handle(&self) -> BitmapHandle {
        self.bitmap
    }
}

impl<B: CaptureBackend + ?Sized> Drop for CompatibleBitmap<'_, B> {
    fn drop(&mut self) {
        self.backend.delete_bitmap(self.bitmap);
        log::debug!("bitmap deleted");
    }
}
