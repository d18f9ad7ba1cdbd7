use tagwatch_geo::{Boundaries, Point};
use tagwatch_notify::Notifier;
use tagwatch_proto::LocationFix;
use tracing::debug;

use crate::oneshot::{AlertKey, OneShot, Rule};
use crate::{notify, Evaluation, Subject};

pub const OFF_PROPERTY: &str = "offProperty";
pub const OUTSIDE_SAFE_ZONE: &str = "outsideSafeZone";

/// Runs the property and safe-zone conditions for one subject. Each sets when
/// the fix is outside its boundary and resets when it is back in. `zone_text`
/// is the message body for all four notifications.
pub async fn evaluate_geofence(
    engine: &OneShot,
    notifier: &dyn Notifier,
    boundaries: &Boundaries,
    subject: &Subject,
    fix: &LocationFix,
    zone_text: &str,
) -> [Evaluation; 2] {
    let here = Point::from_lat_lon(fix.latitude, fix.longitude);
    let off_property = !boundaries.property.contains(here);
    let outside_safe_zone = !boundaries.safe_zone.contains(here);
    let name = subject.shout();
    debug!(
        "geofence: {} at {},{} off_property={} outside_safe_zone={}",
        name, fix.latitude, fix.longitude, off_property, outside_safe_zone
    );

    let property_key = AlertKey::new(subject.key(), OFF_PROPERTY);
    let property = Rule::new(off_property, !off_property)
        .on_set(notify(notifier, format!("{name} is off the property"), zone_text.to_string()))
        .on_reset(notify(notifier, format!("{name} is back on the property"), zone_text.to_string()));
    let property_result = engine.evaluate(&property_key, property).await;

    let safe_key = AlertKey::new(subject.key(), OUTSIDE_SAFE_ZONE);
    let safe = Rule::new(outside_safe_zone, !outside_safe_zone)
        .on_set(notify(notifier, format!("{name} is getting far from the house"), zone_text.to_string()))
        .on_reset(notify(notifier, format!("{name} is back close to the house"), zone_text.to_string()));
    let safe_result = engine.evaluate(&safe_key, safe).await;

    [
        Evaluation { key: property_key, result: property_result },
        Evaluation { key: safe_key, result: safe_result },
    ]
}
