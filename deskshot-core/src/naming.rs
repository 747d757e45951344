//! Default output file names.

use chrono::{DateTime, Local};

/// `strftime` pattern for the timestamp embedded in default file names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build `screenshot_<YYYYMMDD>_<HHMMSS>.png` for the given local time.
///
/// One-second resolution: two calls within the same second collide.
pub fn default_file_name_at(now: &DateTime<Local>) -> String {
    format!("screenshot_{}.png", now.format(TIMESTAMP_FORMAT))
}

/// [`default_file_name_at`] for the current local wall-clock time.
pub fn default_file_name() -> String {
    default_file_name_at(&Local::now())
}
