//! Time labels shown next to chat messages.

use chrono::{DateTime, Local, TimeZone};

const TIME_FORMAT: &str = "%-I:%M %p";

/// Render an ISO-8601 timestamp as `h:mm AM/PM` in local time.
///
/// Unparsable input renders as an empty string.
pub fn format_time(timestamp: &str) -> String {
    format_time_in(timestamp, &Local)
}

/// Render an ISO-8601 timestamp as `h:mm AM/PM` in `zone`.
pub fn format_time_in<Tz>(timestamp: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.with_timezone(zone).format(TIME_FORMAT).to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::format_time_in;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_twelve_hour_clock() {
        assert_eq!(format_time_in("2024-05-01T15:04:09Z", &Utc), "3:04 PM");
        assert_eq!(format_time_in("2024-05-01T00:30:00.123Z", &Utc), "12:30 AM");
        assert_eq!(format_time_in("2024-05-01T11:59:00Z", &Utc), "11:59 AM");
    }

    #[test]
    fn converts_into_the_target_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("offset");
        assert_eq!(format_time_in("2024-05-01T10:00:00Z", &ist), "3:30 PM");
    }

    #[test]
    fn renders_message_timestamps() {
        let mut message = learnchat_protocol::ChatMessage::bot("hi");
        message.timestamp = "2024-05-01T21:07:00.250Z".parse().expect("timestamp");
        assert_eq!(format_time_in(&message.timestamp.to_rfc3339(), &Utc), "9:07 PM");
    }

    #[test]
    fn unparsable_input_is_blank() {
        assert_eq!(format_time_in("yesterday", &Utc), "");
        assert_eq!(format_time_in("", &Utc), "");
    }
}
