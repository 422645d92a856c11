//! Size formatting for display fields.

const KB_PER_MB: i64 = 1024;
const MB_PER_GB: i64 = 1024;

/// Format a size in kilobytes as a human-readable string.
///
/// Uses the largest unit with a non-zero whole count (`GB`, then `MB`,
/// then `KB`). Zero and negative sizes render as `"0 KB"`.
///
/// # Examples
///
/// ```
/// use vmdetails_core::units::kb_to_str;
///
/// assert_eq!(kb_to_str(512), "512 KB");
/// assert_eq!(kb_to_str(2048), "2 MB");
/// assert_eq!(kb_to_str(4 * 1024 * 1024), "4 GB");
/// ```
pub fn kb_to_str(kb: i64) -> String {
    if kb <= 0 {
        return "0 KB".to_string();
    }

    let mb = kb / KB_PER_MB;
    let gb = mb / MB_PER_GB;

    if gb > 0 {
        format!("{} GB", gb)
    } else if mb > 0 {
        format!("{} MB", mb)
    } else {
        format!("{} KB", kb)
    }
}
