//! Error types for `deskshot_core`.
//!
//! Every pipeline failure is funnelled through [`CaptureError`], which uses
//! `thiserror` for `Display` and `Error` derives.  Each variant maps to one
//! process exit code via [`CaptureError::exit_code`]; the CLI prints the
//! `Display` text and exits with that code.

use std::path::PathBuf;

use thiserror::Error;

/// Non-`Ok` status reported by the imaging subsystem's save call.
///
/// Carries the raw GDI+ `Status` value so it can be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStatus(pub i32);

/// Top-level error type for a capture run.
///
/// Variants are declared in pipeline order.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to initialize GDI+")]
    Startup,

    #[error("Failed to acquire screen DC")]
    ScreenContext,

    #[error("Failed to create memory DC")]
    MemoryContext,

    #[error("Failed to create bitmap")]
    Bitmap,

    /// The block copy from the screen into the memory bitmap failed.
    #[error("Failed to capture screen")]
    Blit,

    #[error("PNG encoder not found")]
    EncoderNotFound,

    /// The destination directory did not exist and could not be created.
    #[error("Failed to create output directory {}: {source}", .dir.display())]
    OutputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save PNG to {} (status={})", .path.display(), .status.0)]
    Save { path: PathBuf, status: SaveStatus },
}

impl CaptureError {
    /// Process exit code for this failure (`1`-`7`, in pipeline order).
    pub fn exit_code(&self) -> i32 {
        match self {
            CaptureError::Startup => 1,
            CaptureError::ScreenContext => 2,
            CaptureError::MemoryContext => 3,
            CaptureError::Bitmap => 4,
            CaptureError::Blit => 5,
            CaptureError::EncoderNotFound => 6,
            CaptureError::OutputDir { .. } | CaptureError::Save { .. } => 7,
        }
    }
}
