use std::time::Duration;

const SECS_PER_DAY: u64 = 86_400;

/// Format a play time as `[Dd ]H:MM:SS`.
///
/// The day component and its suffix are omitted when zero. Hours are not
/// padded; minutes and seconds always take two digits. Sub-second precision
/// is truncated.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / SECS_PER_DAY;
    let hours = total % SECS_PER_DAY / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{days}d {hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}
