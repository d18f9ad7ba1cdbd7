use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// `2023-10-21 23:21:42`, always UTC on the wire.
pub const DEVICE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn parse_device_time(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    Ok(PrimitiveDateTime::parse(s.trim(), DEVICE_TIME_FORMAT)?.assume_utc())
}

/// Renders a timestamp back in the device format, for logs.
pub fn format_device_time(t: OffsetDateTime) -> String {
    t.format(DEVICE_TIME_FORMAT).unwrap_or_else(|_| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn parses_device_format_as_utc() {
        let t = parse_device_time("2023-10-21 23:21:42").unwrap();
        assert_eq!(t, datetime!(2023-10-21 23:21:42 UTC));
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(parse_device_time("2023-10-21T23:21:42Z").is_err());
        assert!(parse_device_time("21/10/2023 23:21").is_err());
        assert!(parse_device_time("").is_err());
    }

    #[test]
    fn formats_round_trip() {
        let t = datetime!(2023-10-21 23:17:40 UTC);
        assert_eq!(format_device_time(t), "2023-10-21 23:17:40");
    }
}
