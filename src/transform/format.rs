//! Time and filename formatting

use chrono::NaiveDate;

/// Format milliseconds as zero-padded `MM:SS`
///
/// Truncates toward zero (1999 ms is `00:01`). Minutes are not wrapped, so an
/// hour and a half renders as `90:00`.
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Build an export filename: `<slug>-<YYYY-MM-DD>.<ext>`
///
/// The slug is the lowercased name with every run of non-alphanumeric
/// characters collapsed to a single `-`; an empty slug becomes `recording`.
pub fn generate_filename(name: &str, ext: &str, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("recording");
    }

    let ext = ext.trim_start_matches('.');
    format!("{}-{}.{}", slug, date.format("%Y-%m-%d"), ext)
}
