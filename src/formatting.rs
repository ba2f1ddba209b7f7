//! Small text helpers used by the statistics and reports.

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human readable byte count with one decimal: `1536` → `1.5KB`.
///
/// Sizes past the last unit stay in GB.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", size, SIZE_UNITS[unit])
}

/// Number of lines that contain something other than whitespace.
pub fn count_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}
