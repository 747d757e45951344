//! `deskshot_core` -- virtual-desktop capture to PNG.
//!
//! Captures every attached monitor as one bitmap through GDI and saves it
//! with the GDI+ PNG encoder.  Consumed by `deskshot-cli`.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `CaptureError` enum via `thiserror`, exit-code mapping |
//! | [`geometry`] | Screen metrics and capture-region fallback |
//! | [`naming`] | Timestamped default file names via `chrono` |
//! | [`encoder`] | Encoder list scan by MIME type |
//! | [`backend`] | `CaptureBackend` trait and the GDI / GDI+ implementation |
//! | [`resources`] | RAII guards for the token, DCs and bitmap |
//! | [`capture`] | The single-shot capture pipeline |

pub mod backend;
pub mod capture;
pub mod encoder;
pub mod errors;
pub mod geometry;
pub mod naming;
pub mod resources;
