use time::OffsetDateTime;

/// How long ago `then` was, truncated to whole minutes:
/// `"N minutes"`, `"H hours, M minutes"` or `"D days, H hours, M minutes"`.
pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let diff = now - then;
    let minutes = diff.whole_minutes();
    let hours = diff.whole_hours();
    if hours == 0 {
        format!("{minutes} minutes")
    } else if hours < 24 {
        format!("{} hours, {} minutes", hours, minutes % 60)
    } else {
        format!("{} days, {} hours, {} minutes", hours / 24, hours % 24, minutes % 60)
    }
}
