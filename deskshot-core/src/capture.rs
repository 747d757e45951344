//! Single-shot capture of the virtual desktop to a PNG file.
//!
//! # Pipeline
//!
//! 1. Start the imaging subsystem.
//! 2. Resolve the capture region (virtual screen, or primary display).
//! 3. Acquire the screen DC, a compatible memory DC and bitmap.
//! 4. Blit the region into the bitmap, layered windows included.
//! 5. Resolve the output path (argument or timestamped default).
//! 6. Look up the PNG encoder.
//! 7. Create the destination directory if needed and save.
//!
//! Every handle lives in a guard from [`crate::resources`]; an early `?`
//! unwinds whatever was acquired so far in reverse order.  Nothing touches
//! the filesystem before step 7.
//!
//! # Examples
//!
//! ```no_run
//! # #[cfg(windows)]
//! # {
//! use deskshot_core::backend::GdiBackend;
//! use deskshot_core::capture::capture_to_file;
//!
//! let outcome = capture_to_file(&GdiBackend::new(), None).expect("capture failed");
//! println!("{} ({}x{})", outcome.path.display(), outcome.width, outcome.height);
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::backend::CaptureBackend;
use crate::encoder::{find_encoder, PNG_MIME_TYPE};
use crate::errors::CaptureError;
use crate::geometry::CaptureRegion;
use crate::naming::default_file_name;
use crate::resources::ImagingSession;

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Path the PNG was written to.
    pub path: PathBuf,
    pub width: i32,
    pub height: i32,
}

/// `output` if given, otherwise `screenshot_<YYYYMMDD>_<HHMMSS>.png` in
/// the current directory.
pub fn resolve_output_path(output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_file_name()),
    }
}

/// Create the parent directory of `path` when it names one that is missing.
fn ensure_parent_dir(path: &Path) -> Result<(), CaptureError> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.is_dir() {
        return Ok(());
    }
    log::debug!("creating output directory {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|source| CaptureError::OutputDir {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Capture every attached monitor as one bitmap and save it as a PNG.
///
/// `output` is the destination path; `None` picks a timestamped name in
/// the current directory.  On error, every handle acquired so far has
/// been released by the time this returns, and
/// [`CaptureError::exit_code`] identifies the failed step.
pub fn capture_to_file<B: CaptureBackend + ?Sized>(
    backend: &B,
    output: Option<&Path>,
) -> Result<CaptureOutcome, CaptureError> {
    let session = ImagingSession::start(backend)?;

    let region = CaptureRegion::resolve(&backend.screen_metrics());
    log::debug!(
        "capture region {}x{} at ({}, {})",
        region.width,
        region.height,
        region.x,
        region.y
    );

    let screen = session.screen_context()?;
    let memory = screen.memory_context()?;
    let bitmap = memory.compatible_bitmap(&region)?;

    if !backend.blit(memory.handle(), bitmap.handle(), screen.handle(), &region) {
        return Err(CaptureError::Blit);
    }
    log::debug!("screen copied into bitmap");

    let path = resolve_output_path(output);

    let encoders = backend.image_encoders();
    log::debug!("{} image encoder(s) installed", encoders.len());
    let encoder = find_encoder(&encoders, PNG_MIME_TYPE).ok_or(CaptureError::EncoderNotFound)?;

    ensure_parent_dir(&path)?;
    backend
        .save_bitmap(bitmap.handle(), &path, encoder)
        .map_err(|status| CaptureError::Save {
            path: path.clone(),
            status,
        })?;
    log::info!("saved {}x{} capture to {}", region.width, region.height, path.display());

    Ok(CaptureOutcome {
        path,
        width: region.width,
        height: region.height,
    })
}
