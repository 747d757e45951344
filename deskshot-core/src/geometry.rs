//! Display geometry: raw screen metrics and the capture region derived from them.
//!
//! The backend reads [`ScreenMetrics`] in one shot; [`CaptureRegion::resolve`]
//! is a pure function of that snapshot so the fallback rule can be tested
//! without a display.

/// Primary and virtual screen metrics as reported by the display subsystem.
///
/// Values are raw `GetSystemMetrics` results and may be zero or negative
/// when the query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenMetrics {
    pub virtual_x: i32,
    pub virtual_y: i32,
    pub virtual_width: i32,
    pub virtual_height: i32,
    pub primary_width: i32,
    pub primary_height: i32,
}

impl ScreenMetrics {
    /// Metrics for a single display with no virtual-screen offset.
    pub fn single(width: i32, height: i32) -> Self {
        Self {
            virtual_x: 0,
            virtual_y: 0,
            virtual_width: width,
            virtual_height: height,
            primary_width: width,
            primary_height: height,
        }
    }
}

/// Axis-aligned rectangle to copy, in screen coordinates.
///
/// `x` / `y` can be negative when a secondary monitor sits left of or
/// above the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CaptureRegion {
    /// Pick the virtual-screen rectangle, or the primary display when either
    /// virtual dimension is non-positive.
    ///
    /// The fallback is a degradation, not an error: it is logged at `debug`
    /// only, the primary dimensions are returned as-is and a zero-size result
    /// surfaces later as a bitmap creation failure.
    pub fn resolve(metrics: &ScreenMetrics) -> Self {
        if metrics.virtual_width > 0 && metrics.virtual_height > 0 {
            return Self {
                x: metrics.virtual_x,
                y: metrics.virtual_y,
                width: metrics.virtual_width,
                height: metrics.virtual_height,
            };
        }

        log::debug!(
            "virtual screen metrics are non-positive ({}x{}); using primary display {}x{}",
            metrics.virtual_width,
            metrics.virtual_height,
            metrics.primary_width,
            metrics.primary_height
        );
        Self {
            x: 0,
            y: 0,
            width: metrics.primary_width,
            height: metrics.primary_height,
        }
    }
}
