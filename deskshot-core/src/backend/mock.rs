//! Scripted in-memory backend for tests.
//!
//! Records every acquire and release in an event log so tests can assert
//! that each handle is released exactly once and in the right order.  A
//! single pipeline step can be forced to fail with [`MockBackend::fail_at`].
//! Saving writes a real (blank) PNG of the bitmap's size via `image`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{BitmapHandle, CaptureBackend, DeviceContext, SessionToken};
use crate::encoder::{EncoderId, EncoderInfo};
use crate::errors::SaveStatus;
use crate::geometry::{CaptureRegion, ScreenMetrics};

/// Pipeline step that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Startup,
    ScreenDc,
    MemoryDc,
    Bitmap,
    Blit,
    Save,
}

/// One backend call, as recorded in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Startup,
    Shutdown,
    AcquireScreenDc,
    ReleaseScreenDc,
    CreateMemoryDc,
    DeleteMemoryDc,
    CreateBitmap { width: i32, height: i32 },
    DeleteBitmap,
    Blit(CaptureRegion),
    Save(PathBuf),
}

impl Event {
    fn is_release(&self) -> bool {
        matches!(
            self,
            Event::Shutdown | Event::ReleaseScreenDc | Event::DeleteMemoryDc | Event::DeleteBitmap
        )
    }
}

/// GDI+ `GenericError`.
const GENERIC_ERROR: i32 = 1;

pub struct MockBackend {
    metrics: ScreenMetrics,
    encoders: Vec<EncoderInfo>,
    fail_at: Option<Step>,
    events: RefCell<Vec<Event>>,
    next_handle: Cell<usize>,
    /// Live handles -> description, removed on release.
    live: RefCell<HashMap<usize, &'static str>>,
    bitmap_sizes: RefCell<HashMap<usize, (u32, u32)>>,
    /// Bitmap -> DC it was created compatible with.
    bitmap_parents: RefCell<HashMap<usize, DeviceContext>>,
}

impl MockBackend {
    /// Single 1920x1080 display with a stock GDI+ encoder list.
    pub fn new() -> Self {
        Self {
            metrics: ScreenMetrics::single(1920, 1080),
            encoders: vec![
                EncoderInfo {
                    id: EncoderId(0x557c_f400),
                    mime_type: "image/bmp".into(),
                    format_description: "BMP".into(),
                },
                EncoderInfo {
                    id: EncoderId(0x557c_f401),
                    mime_type: "image/jpeg".into(),
                    format_description: "JPEG".into(),
                },
                EncoderInfo {
                    id: EncoderId(0x557c_f406),
                    mime_type: "image/png".into(),
                    format_description: "PNG".into(),
                },
            ],
            fail_at: None,
            events: RefCell::new(Vec::new()),
            next_handle: Cell::new(0x100),
            live: RefCell::new(HashMap::new()),
            bitmap_sizes: RefCell::new(HashMap::new()),
            bitmap_parents: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: ScreenMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_encoders(mut self, encoders: Vec<EncoderInfo>) -> Self {
        self.encoders = encoders;
        self
    }

    pub fn fail_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Release events only, in the order they happened.
    pub fn releases(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_release())
            .cloned()
            .collect()
    }

    /// DC a live bitmap was created compatible with.
    pub fn bitmap_parent(&self, bitmap: BitmapHandle) -> Option<DeviceContext> {
        self.bitmap_parents.borrow().get(&bitmap.0).copied()
    }

    /// Number of handles acquired but not yet released.
    pub fn outstanding(&self) -> usize {
        self.live.borrow().len()
    }

    fn fails(&self, step: Step) -> bool {
        self.fail_at == Some(step)
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn acquire(&self, kind: &'static str) -> usize {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        self.live.borrow_mut().insert(handle, kind);
        handle
    }

    fn release(&self, handle: usize, kind: &'static str) {
        match self.live.borrow_mut().remove(&handle) {
            Some(k) if k == kind => {}
            Some(k) => panic!("released {kind} handle {handle:#x} that was a {k}"),
            None => panic!("{kind} handle {handle:#x} released twice or never acquired"),
        }
    }
}

impl CaptureBackend for MockBackend {
    fn startup(&self) -> Option<SessionToken> {
        if self.fails(Step::Startup) {
            return None;
        }
        self.record(Event::Startup);
        Some(SessionToken(self.acquire("token")))
    }

    fn shutdown(&self, token: SessionToken) {
        self.record(Event::Shutdown);
        self.release(token.0, "token");
    }

    fn screen_metrics(&self) -> ScreenMetrics {
        self.metrics
    }

    fn acquire_screen_dc(&self) -> Option<DeviceContext> {
        if self.fails(Step::ScreenDc) {
            return None;
        }
        self.record(Event::AcquireScreenDc);
        Some(DeviceContext(self.acquire("screen dc")))
    }

    fn release_screen_dc(&self, dc: DeviceContext) {
        self.record(Event::ReleaseScreenDc);
        self.release(dc.0, "screen dc");
    }

    fn create_memory_dc(&self, screen: DeviceContext) -> Option<DeviceContext> {
        assert!(self.live.borrow().contains_key(&screen.0), "screen DC not live");
        if self.fails(Step::MemoryDc) {
            return None;
        }
        self.record(Event::CreateMemoryDc);
        Some(DeviceContext(self.acquire("memory dc")))
    }

    fn delete_memory_dc(&self, dc: DeviceContext) {
        self.record(Event::DeleteMemoryDc);
        self.release(dc.0, "memory dc");
    }

    fn create_bitmap(&self, screen: DeviceContext, width: i32, height: i32) -> Option<BitmapHandle> {
        assert!(self.live.borrow().contains_key(&screen.0), "screen DC not live");
        // CreateCompatibleBitmap rejects empty bitmaps.
        if self.fails(Step::Bitmap) || width <= 0 || height <= 0 {
            return None;
        }
        self.record(Event::CreateBitmap { width, height });
        let handle = self.acquire("bitmap");
        self.bitmap_sizes
            .borrow_mut()
            .insert(handle, (width as u32, height as u32));
        self.bitmap_parents.borrow_mut().insert(handle, screen);
        Some(BitmapHandle(handle))
    }

    fn delete_bitmap(&self, bitmap: BitmapHandle) {
        self.record(Event::DeleteBitmap);
        self.release(bitmap.0, "bitmap");
        self.bitmap_sizes.borrow_mut().remove(&bitmap.0);
        self.bitmap_parents.borrow_mut().remove(&bitmap.0);
    }

    fn blit(
        &self,
        _memory: DeviceContext,
        _bitmap: BitmapHandle,
        _screen: DeviceContext,
        region: &CaptureRegion,
    ) -> bool {
        self.record(Event::Blit(*region));
        !self.fails(Step::Blit)
    }

    fn image_encoders(&self) -> Vec<EncoderInfo> {
        self.encoders.clone()
    }

    fn save_bitmap(
        &self,
        bitmap: BitmapHandle,
        path: &Path,
        encoder: EncoderId,
    ) -> Result<(), SaveStatus> {
        self.record(Event::Save(path.to_path_buf()));
        assert!(
            self.encoders.iter().any(|e| e.id == encoder),
            "save called with an encoder that was never listed"
        );
        if self.fails(Step::Save) {
            return Err(SaveStatus(GENERIC_ERROR));
        }

        let (width, height) = *self
            .bitmap_sizes
            .borrow()
            .get(&bitmap.0)
            .expect("save called with a deleted bitmap");
        image::RgbaImage::new(width, height)
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|_| SaveStatus(GENERIC_ERROR))
    }
}
