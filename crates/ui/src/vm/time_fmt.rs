/// Header clock label: whole seconds with an `s` suffix.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{seconds}s")
}

/// Completion summary label, e.g. `4m 05s`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    if minutes == 0 {
        format!("{remainder}s")
    } else {
        format!("{minutes}m {remainder:02}s")
    }
}
