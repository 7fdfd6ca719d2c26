//! `serde` support.
//!
//! [`RequestId`] serializes as its string form (`"GHC-2025-03-007"`) and
//! [`Period`] as `{"year": 2025, "month": 3}`. Deserialization re-validates
//! both, so an out-of-range month or a malformed identifier is rejected.

use core::fmt;

use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Period, RequestId};

impl Serialize for RequestId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = RequestId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a request identifier like GHC-2025-03-007")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_str(Visitor)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "Period")]
struct RawPeriod {
    year: u16,
    month: u8,
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        RawPeriod {
            year: self.year(),
            month: self.month(),
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = RawPeriod::deserialize(d)?;
        Self::new(raw.year, raw.month).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_a_json_string() {
        let id = RequestId::from_components(Period::new(2025, 3).unwrap(), 7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""GHC-2025-03-007""#);
        assert_eq!(serde_json::from_str::<RequestId>(&json).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_request_ids() {
        assert!(serde_json::from_str::<RequestId>(r#""GHC-2025-3-007""#).is_err());
        assert!(serde_json::from_str::<RequestId>("7").is_err());
    }

    #[test]
    fn period_is_an_object() {
        let period = Period::new(2025, 3).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"year":2025,"month":3}"#);
        assert_eq!(serde_json::from_str::<Period>(&json).unwrap(), period);
    }

    #[test]
    fn rejects_out_of_range_periods() {
        assert!(serde_json::from_str::<Period>(r#"{"year":2025,"month":13}"#).is_err());
    }
}
