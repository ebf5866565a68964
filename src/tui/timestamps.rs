use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// "Last generated" label: relative under a day, local date and time beyond
pub fn format_last_generated(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    format_in_zone(timestamp, now, &Local)
}

fn format_in_zone<Tz: TimeZone>(
    timestamp: &DateTime<Utc>,
    now: &DateTime<Utc>,
    zone: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let seconds = now.signed_duration_since(*timestamp).num_seconds();

    if (0..86_400).contains(&seconds) {
        let minutes = seconds / 60;
        let hours = minutes / 60;
        return if hours > 0 {
            format!("{}h ago", hours)
        } else if minutes > 0 {
            format!("{}m ago", minutes)
        } else {
            "just now".to_string()
        };
    }

    // Year shown only when it differs in the zone the date is printed in
    let local = timestamp.with_timezone(zone);
    if local.year() == now.with_timezone(zone).year() {
        local.format("%b %-d %H:%M").to_string()
    } else {
        local.format("%b %-d, %Y %H:%M").to_string()
    }
}
