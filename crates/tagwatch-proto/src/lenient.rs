use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;

/// Integer field that also accepts floating point input and truncates it.
///
/// Older stores kept every number as a double, so replayed transmissions can
/// carry `7494.0` where the firmware sent `7494`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LenientInt(pub i64);

impl<'de> Deserialize<'de> for LenientInt {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        int(d).map(LenientInt)
    }
}

pub(crate) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(IntVisitor)
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a finite number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if !v.is_finite() || v.abs() >= i64::MAX as f64 {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        Ok(v.trunc() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "int")]
        n: i64,
    }

    fn parse(s: &str) -> Result<i64, serde_json::Error> {
        serde_json::from_str::<Holder>(s).map(|h| h.n)
    }

    #[test]
    fn accepts_integers() {
        assert_eq!(parse(r#"{"n": 7494}"#).unwrap(), 7494);
        assert_eq!(parse(r#"{"n": -12}"#).unwrap(), -12);
    }

    #[test]
    fn truncates_floats() {
        assert_eq!(parse(r#"{"n": 7494.0}"#).unwrap(), 7494);
        assert_eq!(parse(r#"{"n": 4641.9}"#).unwrap(), 4641);
        assert_eq!(parse(r#"{"n": -3.7}"#).unwrap(), -3);
    }

    #[test]
    fn rejects_strings() {
        assert!(parse(r#"{"n": "12"}"#).is_err());
    }
}
