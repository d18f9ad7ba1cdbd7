//! One log line per record of an accepted transmission.

use tagwatch_alert::Subject;
use tagwatch_geo::{Point, ZoneCatalogHandle};
use tagwatch_proto::timestamp::format_device_time;
use tagwatch_proto::{reason_text, Record};
use time::OffsetDateTime;
use tracing::info;

use crate::timeago::time_ago;

pub fn record_line(subject: &Subject, record: &Record, zones: &ZoneCatalogHandle, now: OffsetDateTime) -> String {
    let head = format!(
        "{}/{}  {} ({} ago) \"{}\"",
        subject.serial,
        subject.shout(),
        format_device_time(record.device_time),
        time_ago(record.device_time, now),
        reason_text(record.reason_code),
    );
    match record.location() {
        Some(fix) => format!(
            "{}  {} ({} ago) {:.7},{:.7} \"{}\"",
            head,
            format_device_time(fix.fix_time),
            time_ago(fix.fix_time, now),
            fix.latitude,
            fix.longitude,
            zones.name_for(Point::from_lat_lon(fix.latitude, fix.longitude)),
        ),
        None => head,
    }
}

pub fn log_records(subject: &Subject, records: &[Record], zones: &ZoneCatalogHandle, now: OffsetDateTime) {
    for record in records {
        info!("ingest: {}", record_line(subject, record, zones, now));
    }
}
