// Time codec: the API sends timestamps as bare integers of Unix seconds.
// `UnixTime` keeps an absolute UTC instant in memory and converts to and
// from that wire form. Sub-second precision is dropped on encode.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Returned when a wire timestamp is not a base-10 integer, or names a
/// second that cannot be represented as a calendar instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed unix timestamp {input:?}")]
pub struct FormatError {
    pub input: String,
}

/// An instant encoded on the wire as Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTime(DateTime<Utc>);

impl UnixTime {
    /// Build from a second count since the Unix epoch.
    pub fn from_secs(secs: i64) -> Result<Self, FormatError> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(UnixTime)
            .ok_or_else(|| FormatError {
                input: secs.to_string(),
            })
    }

    pub fn secs(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Decimal ASCII of the epoch second count, no fraction and no quotes.
    pub fn encode(&self) -> String {
        self.secs().to_string()
    }

    /// Parse raw bytes as a signed base-10 integer of seconds.
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let malformed = || FormatError {
            input: String::from_utf8_lossy(data).into_owned(),
        };
        let text = std::str::from_utf8(data).map_err(|_| malformed())?;
        let secs: i64 = text.parse().map_err(|_| malformed())?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(UnixTime)
            .ok_or_else(malformed)
    }
}

impl From<DateTime<Utc>> for UnixTime {
    fn from(t: DateTime<Utc>) -> Self {
        UnixTime(t)
    }
}

impl From<UnixTime> for DateTime<Utc> {
    fn from(t: UnixTime) -> Self {
        t.0
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for UnixTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.secs())
    }
}

struct UnixTimeVisitor;

impl<'de> Visitor<'de> for UnixTimeVisitor {
    type Value = UnixTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer number of unix seconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<UnixTime, E> {
        UnixTime::from_secs(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<UnixTime, E> {
        let secs = i64::try_from(v).map_err(|_| {
            E::custom(FormatError {
                input: v.to_string(),
            })
        })?;
        self.visit_i64(secs)
    }
}

impl<'de> Deserialize<'de> for UnixTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_i64(UnixTimeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encode_is_plain_seconds() {
        let t = UnixTime::from(Utc.with_ymd_and_hms(2018, 3, 1, 12, 0, 0).unwrap());
        assert_eq!(t.encode(), "1519905600");
    }

    #[test]
    fn decode_roundtrips_seconds() {
        for n in [0i64, 1, -1, 1_519_905_600, -86_400, 4_102_444_800] {
            let t = UnixTime::from_secs(n).unwrap();
            let back = UnixTime::decode(t.encode().as_bytes()).unwrap();
            assert_eq!(back.secs(), n);
        }
    }

    #[test]
    fn encode_drops_subsecond_precision() {
        let t = UnixTime::from(DateTime::<Utc>::from_timestamp(1_000, 999_000_000).unwrap());
        let back = UnixTime::decode(t.encode().as_bytes()).unwrap();
        assert_eq!(back.secs(), 1_000);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = UnixTime::decode(b"\"12\"").unwrap_err();
        assert_eq!(err.input, "\"12\"");
        assert!(UnixTime::decode(b"1.5").is_err());
        assert!(UnixTime::decode(b"").is_err());
        assert!(UnixTime::decode(&i64::MAX.to_string().into_bytes()).is_err());
    }

    #[test]
    fn json_uses_bare_integer() {
        let t: UnixTime = serde_json::from_str("1519905600").unwrap();
        assert_eq!(t.secs(), 1_519_905_600);
        assert_eq!(serde_json::to_string(&t).unwrap(), "1519905600");
        assert!(serde_json::from_str::<UnixTime>("\"1519905600\"").is_err());
    }
}
