use chrono::{DateTime, Datelike, Local, Utc};

/// Upload time for the history sidebar:
/// - Relative within a day: "just now", "12m ago", "3h ago"
/// - Otherwise local date and time: "Jan 15 14:03", "Dec 3, 2024 09:30"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(*timestamp).num_seconds();

    if (0..86_400).contains(&seconds) {
        format_relative(seconds)
    } else {
        format_absolute(&timestamp.with_timezone(&Local), &now.with_timezone(&Local))
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

fn format_absolute(timestamp: &DateTime<Local>, now: &DateTime<Local>) -> String {
    if timestamp.year() == now.year() {
        timestamp.format("%b %-d %H:%M").to_string()
    } else {
        timestamp.format("%b %-d, %Y %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_just_now() {
        let now = Utc::now();
        assert_eq!(format_timestamp_at(&(now - Duration::seconds(30)), &now), "just now");
    }

    #[test]
    fn test_minutes_and_hours() {
        let now = Utc::now();
        assert_eq!(format_timestamp_at(&(now - Duration::minutes(45)), &now), "45m ago");
        assert_eq!(format_timestamp_at(&(now - Duration::hours(3)), &now), "3h ago");
    }

    #[test]
    fn test_older_than_a_day_is_absolute() {
        let now = Utc::now();
        let timestamp = now - Duration::days(3);
        let formatted = format_timestamp_at(&timestamp, &now);
        assert!(!formatted.ends_with("ago"));
        assert!(formatted.contains(':'));
    }

    #[test]
    fn test_different_year_includes_year() {
        let now = Utc::now();
        let timestamp = now - Duration::days(400);
        let formatted = format_timestamp_at(&timestamp, &now);
        let year = timestamp.with_timezone(&Local).year().to_string();
        assert!(formatted.contains(&year));
    }

    #[test]
    fn test_future_timestamp_is_absolute() {
        let now = Utc::now();
        let formatted = format_timestamp_at(&(now + Duration::hours(2)), &now);
        assert!(!formatted.ends_with("ago"));
    }
}
