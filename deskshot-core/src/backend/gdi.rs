//! GDI capture + GDI+ encoding backend.
//!
//! # Capture
//!
//! 1. `GetSystemMetrics` for the virtual-screen rectangle and the primary
//!    display size.
//! 2. `GetDC(NULL)` for the screen, `CreateCompatibleDC` /
//!    `CreateCompatibleBitmap` for the off-screen target.
//! 3. `SelectObject` the bitmap into the memory DC, `BitBlt` with
//!    `SRCCOPY | CAPTUREBLT` so layered windows are included, then restore
//!    the previous selection.
//!
//! # Encoding
//!
//! GDI+ is driven through its flat API: `GdipGetImageEncoders` lists the
//! installed codecs, `GdipCreateBitmapFromHBITMAP` wraps the captured
//! bitmap and `GdipSaveImageToFile` writes it.  The GDI+ image is disposed
//! before the caller deletes the underlying `HBITMAP`.
//!
//! # Thread safety
//!
//! Every handle is created and released on the calling thread within one
//! [`crate::capture::capture_to_file`] call.  There is no shared global
//! state beyond the GDI+ token held by the session guard.

use std::ffi::c_void;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::core::{GUID, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, ReleaseDC,
    SelectObject, CAPTUREBLT, HBITMAP, HDC, HGDIOBJ, HPALETTE, ROP_CODE, SRCCOPY,
};
use windows::Win32::Graphics::GdiPlus;
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXSCREEN, SM_CXVIRTUALSCREEN, SM_CYSCREEN, SM_CYVIRTUALSCREEN,
    SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

use super::{BitmapHandle, CaptureBackend, DeviceContext, SessionToken};
use crate::encoder::{EncoderId, EncoderInfo};
use crate::errors::SaveStatus;
use crate::geometry::{CaptureRegion, ScreenMetrics};

// ---------------------------------------------------------------------------
// Handle conversions
// ---------------------------------------------------------------------------

fn hdc(dc: DeviceContext) -> HDC {
    HDC(dc.0 as *mut c_void)
}

fn hbitmap(bitmap: BitmapHandle) -> HBITMAP {
    HBITMAP(bitmap.0 as *mut c_void)
}

fn desktop() -> HWND {
    HWND(std::ptr::null_mut())
}

/// NUL-terminated UTF-16 copy of `path` for GDI+.
fn wide_path(path: &Path) -> Vec<u16> {
    path.as_os_str().encode_wide().chain(once(0)).collect()
}

/// Read a GDI+ codec string, treating null or invalid UTF-16 as empty.
fn read_codec_string(value: PCWSTR) -> String {
    if value.is_null() {
        return String::new();
    }
    unsafe { value.to_string() }.unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scoped helpers
// ---------------------------------------------------------------------------

/// Restores the memory DC's previous selection on drop.
struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(dc: HDC, bitmap: HBITMAP) -> Self {
        let previous = unsafe { SelectObject(dc, bitmap) };
        Self { dc, previous }
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
        }
    }
}

/// GDI+ image wrapping a captured `HBITMAP`; disposed on drop.
struct GdiplusImage(*mut GdiPlus::GpBitmap);

impl GdiplusImage {
    fn from_hbitmap(bitmap: HBITMAP) -> Result<Self, SaveStatus> {
        let mut image: *mut GdiPlus::GpBitmap = std::ptr::null_mut();
        let status =
            unsafe { GdiPlus::GdipCreateBitmapFromHBITMAP(bitmap, HPALETTE::default(), &mut image) };
        if status != GdiPlus::Ok || image.is_null() {
            log::debug!("GdipCreateBitmapFromHBITMAP failed: status {}", status.0);
            return Err(SaveStatus(status.0));
        }
        Ok(Self(image))
    }

    fn as_image(&self) -> *mut GdiPlus::GpImage {
        self.0 as *mut GdiPlus::GpImage
    }
}

impl Drop for GdiplusImage {
    fn drop(&mut self) {
        unsafe {
            GdiPlus::GdipDisposeImage(self.as_image());
        }
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Screen capture through GDI, PNG encoding through GDI+.
#[derive(Debug, Default)]
pub struct GdiBackend;

impl GdiBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBackend for GdiBackend {
    fn startup(&self) -> Option<SessionToken> {
        let input = GdiPlus::GdiplusStartupInput {
            GdiplusVersion: 1,
            ..Default::default()
        };
        let mut token: usize = 0;
        let status = unsafe { GdiPlus::GdiplusStartup(&mut token, &input, std::ptr::null_mut()) };
        if status != GdiPlus::Ok {
            log::debug!("GdiplusStartup failed: status {}", status.0);
            return None;
        }
        Some(SessionToken(token))
    }

    fn shutdown(&self, token: SessionToken) {
        unsafe { GdiPlus::GdiplusShutdown(token.0) };
    }

    fn screen_metrics(&self) -> ScreenMetrics {
        // Not cached -- resolution can change between runs.
        unsafe {
            ScreenMetrics {
                virtual_x: GetSystemMetrics(SM_XVIRTUALSCREEN),
                virtual_y: GetSystemMetrics(SM_YVIRTUALSCREEN),
                virtual_width: GetSystemMetrics(SM_CXVIRTUALSCREEN),
                virtual_height: GetSystemMetrics(SM_CYVIRTUALSCREEN),
                primary_width: GetSystemMetrics(SM_CXSCREEN),
                primary_height: GetSystemMetrics(SM_CYSCREEN),
            }
        }
    }

    fn acquire_screen_dc(&self) -> Option<DeviceContext> {
        let dc = unsafe { GetDC(desktop()) };
        if dc.is_invalid() {
            return None;
        }
        Some(DeviceContext(dc.0 as usize))
    }

    fn release_screen_dc(&self, dc: DeviceContext) {
        unsafe {
            ReleaseDC(desktop(), hdc(dc));
        }
    }

    fn create_memory_dc(&self, screen: DeviceContext) -> Option<DeviceContext> {
        let dc = unsafe { CreateCompatibleDC(hdc(screen)) };
        if dc.is_invalid() {
            return None;
        }
        Some(DeviceContext(dc.0 as usize))
    }

    fn delete_memory_dc(&self, dc: DeviceContext) {
        unsafe {
            let _ = DeleteDC(hdc(dc));
        }
    }

    fn create_bitmap(&self, screen: DeviceContext, width: i32, height: i32) -> Option<BitmapHandle> {
        let bitmap = unsafe { CreateCompatibleBitmap(hdc(screen), width, height) };
        if bitmap.is_invalid() {
            return None;
        }
        Some(BitmapHandle(bitmap.0 as usize))
    }

    fn delete_bitmap(&self, bitmap: BitmapHandle) {
        unsafe {
            let _ = DeleteObject(hbitmap(bitmap));
        }
    }

    fn blit(
        &self,
        memory: DeviceContext,
        bitmap: BitmapHandle,
        screen: DeviceContext,
        region: &CaptureRegion,
    ) -> bool {
        let memory = hdc(memory);
        let _selection = Selection::select(memory, hbitmap(bitmap));

        // CAPTUREBLT pulls in layered (WS_EX_LAYERED) and overlay windows.
        let rop = ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0);
        let copied = unsafe {
            BitBlt(
                memory,
                0,
                0,
                region.width,
                region.height,
                hdc(screen),
                region.x,
                region.y,
                rop,
            )
        };

        match copied {
            Ok(()) => true,
            Err(e) => {
                log::debug!("BitBlt failed: {e}");
                false
            }
        }
    }

    fn image_encoders(&self) -> Vec<EncoderInfo> {
        let mut count: u32 = 0;
        let mut size: u32 = 0;
        let status = unsafe { GdiPlus::GdipGetImageEncodersSize(&mut count, &mut size) };
        if status != GdiPlus::Ok || size == 0 {
            log::debug!("GdipGetImageEncodersSize: status {}, size {size}", status.0);
            return Vec::new();
        }

        // The codec array is followed by the strings it points at, so the
        // whole `size` bytes must stay alive while entries are read.  `u64`
        // storage keeps the array pointer-aligned.
        let words = (size as usize).div_ceil(std::mem::size_of::<u64>());
        let mut buffer: Vec<u64> = Vec::new();
        if buffer.try_reserve_exact(words).is_err() {
            log::debug!("could not allocate {size} bytes for the encoder list");
            return Vec::new();
        }
        buffer.resize(words, 0);
        let codecs = buffer.as_mut_ptr() as *mut GdiPlus::ImageCodecInfo;

        let status = unsafe { GdiPlus::GdipGetImageEncoders(count, size, codecs) };
        if status != GdiPlus::Ok {
            log::debug!("GdipGetImageEncoders failed: status {}", status.0);
            return Vec::new();
        }

        let codecs = unsafe { std::slice::from_raw_parts(codecs, count as usize) };
        codecs
            .iter()
            .map(|codec| EncoderInfo {
                id: EncoderId(codec.Clsid.to_u128()),
                mime_type: read_codec_string(codec.MimeType),
                format_description: read_codec_string(codec.FormatDescription),
            })
            .collect()
    }

    fn save_bitmap(
        &self,
        bitmap: BitmapHandle,
        path: &Path,
        encoder: EncoderId,
    ) -> Result<(), SaveStatus> {
        let image = GdiplusImage::from_hbitmap(hbitmap(bitmap))?;
        let file_name = wide_path(path);
        let clsid = GUID::from_u128(encoder.0);

        let status = unsafe {
            GdiPlus::GdipSaveImageToFile(
                image.as_image(),
                PCWSTR(file_name.as_ptr()),
                &clsid,
                std::ptr::null(),
            )
        };
        if status != GdiPlus::Ok {
            return Err(SaveStatus(status.0));
        }
        Ok(())
    }
}
