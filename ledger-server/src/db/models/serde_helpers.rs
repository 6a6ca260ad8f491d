//! Common serde helpers for documents coming back from SurrealDB
//!
//! Record ids deserialize from both formats:
//! - string format `"table:id"` (from in-process JSON)
//! - SurrealDB native format (from the database)
//!
//! All dates cross the store boundary as i64 Unix millis and surface in the
//! domain as `chrono::DateTime<Utc>`, so every model converts the same way.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize a list field treating both `null` and absence as empty
///
/// Upstream documents may predate the field entirely or carry an explicit
/// null; readers always get a real vector.
pub fn null_to_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Internal helper accepting both string and native RecordId formats
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// `Option<RecordId>` serialized as an optional "table:id" string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_str(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<FlexibleRecordId>::deserialize(d)?.map(|flex| flex.0))
    }
}

/// `DateTime<Utc>` serialized as i64 Unix millis
pub mod datetime_millis {
    use super::*;

    pub fn serialize<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_i64(dt.timestamp_millis())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(d)?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", millis)))
    }
}

/// `Option<DateTime<Utc>>` serialized as optional i64 Unix millis
pub mod option_datetime_millis {
    use super::*;

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => s.serialize_some(&dt.timestamp_millis()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(d)? {
            Some(millis) => Utc
                .timestamp_millis_opt(millis)
                .single()
                .map(Some)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("timestamp out of range: {}", millis))
                }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "null_to_empty")]
        items: Vec<i32>,
        #[serde(with = "datetime_millis")]
        at: DateTime<Utc>,
    }

    #[test]
    fn null_and_missing_items_become_empty() {
        let doc: Doc = serde_json::from_str(r#"{"items":null,"at":0}"#).unwrap();
        assert!(doc.items.is_empty());
        let doc: Doc = serde_json::from_str(r#"{"at":0}"#).unwrap();
        assert!(doc.items.is_empty());
    }

    #[test]
    fn datetime_round_trips_through_millis() {
        let doc: Doc = serde_json::from_str(r#"{"items":[1],"at":1735689600000}"#).unwrap();
        assert_eq!(doc.at.timestamp_millis(), 1_735_689_600_000);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("1735689600000"));
    }
}
