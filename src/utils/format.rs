use crate::models::TimeOfDay;

/// Format a duration in minutes to "Xh Ym" or "Ym"
pub fn format_duration_minutes(minutes: u32) -> String {
    if minutes == 0 {
        return "now".to_string();
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a time as "hh:mm AM" / "hh:mm PM" (midnight is 12 AM)
pub fn format_am_pm(t: TimeOfDay) -> String {
    let suffix = if t.hours >= 12 { "PM" } else { "AM" };
    let hour = match t.hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", hour, t.minutes, suffix)
}

/// Format an optional time, "-" when the slot is not observed
pub fn format_optional(t: Option<TimeOfDay>) -> String {
    t.map(format_am_pm).unwrap_or_else(|| "-".to_string())
}

/// Format a distance in meters as "850 m" or "3.2 km"
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
