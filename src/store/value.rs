use super::StoreError;
use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::Error as SerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// A Firestore document as it appears on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl Document {
    /// The document id, i.e. the last segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Parses the document fields into a typed value.
    ///
    /// Unknown or malformed field shapes fail here rather than being cast
    /// through; the boundary validates.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let json = from_fields(self.fields)?;
        Ok(serde_json::from_value(json)?)
    }
}

/// The subset of Firestore's typed values this app stores and reads.
///
/// Externally tagged serde representation matches the wire format directly,
/// e.g. `{"stringValue": "hello"}` or `{"arrayValue": {"values": [...]}}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    StringValue(String),
    // Firestore sends integers as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    BooleanValue(bool),
    TimestampValue(String),
    NullValue(()),
    ArrayValue { values: Vec<FieldValue> },
    MapValue { fields: HashMap<String, FieldValue> },
}

/// Converts a serializable struct into a Firestore field map.
pub fn to_fields<T: Serialize>(value: &T) -> Result<HashMap<String, FieldValue>, StoreError> {
    match serde_json::to_value(value)? {
        Json::Object(map) => map
            .into_iter()
            .map(|(k, v)| Ok((k, encode_value(v)?)))
            .collect(),
        _ => Err(StoreError::Serialization(SerError::custom(
            "only objects can be stored as documents",
        ))),
    }
}

pub(crate) fn encode_value(json: Json) -> Result<FieldValue, StoreError> {
    Ok(match json {
        Json::Null => FieldValue::NullValue(()),
        Json::Bool(b) => FieldValue::BooleanValue(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::IntegerValue(i.to_string())
            } else if let Some(u) = n.as_u64() {
                FieldValue::IntegerValue(u.to_string())
            } else if let Some(f) = n.as_f64() {
                FieldValue::DoubleValue(f)
            } else {
                return Err(StoreError::Serialization(SerError::custom(format!(
                    "unsupported number: {}",
                    n
                ))));
            }
        }
        Json::String(s) => FieldValue::StringValue(s),
        Json::Array(items) => FieldValue::ArrayValue {
            values: items
                .into_iter()
                .map(encode_value)
                .collect::<Result<_, _>>()?,
        },
        Json::Object(map) => FieldValue::MapValue {
            fields: map
                .into_iter()
                .map(|(k, v)| Ok((k, encode_value(v)?)))
                .collect::<Result<_, StoreError>>()?,
        },
    })
}

/// Converts a Firestore field map back into plain JSON.
pub fn from_fields(fields: HashMap<String, FieldValue>) -> Result<Json, StoreError> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key, decode_value(value)?);
    }
    Ok(Json::Object(map))
}

fn decode_value(value: FieldValue) -> Result<Json, StoreError> {
    Ok(match value {
        FieldValue::StringValue(s) => Json::String(s),
        FieldValue::IntegerValue(s) => {
            let i: i64 = s.parse().map_err(|e| {
                StoreError::Serialization(DeError::custom(format!(
                    "bad integer value '{}': {}",
                    s, e
                )))
            })?;
            Json::Number(i.into())
        }
        FieldValue::DoubleValue(d) => Json::Number(serde_json::Number::from_f64(d).ok_or_else(
            || StoreError::Serialization(DeError::custom(format!("non-finite double: {}", d))),
        )?),
        FieldValue::BooleanValue(b) => Json::Bool(b),
        FieldValue::TimestampValue(s) => Json::String(s),
        FieldValue::NullValue(()) => Json::Null,
        FieldValue::ArrayValue { values } => Json::Array(
            values
                .into_iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        ),
        FieldValue::MapValue { fields } => from_fields(fields)?,
    })
}
