//! Device — a registered hardware record.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::id::DeviceId;

/// A device stored in the registry.
///
/// The id is assigned by the registry; every other field is client-controlled
/// and lives in [`DeviceAttributes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(flatten)]
    pub attributes: DeviceAttributes,
}

impl Device {
    /// Combine a registry-assigned id with client-supplied attributes.
    #[must_use]
    pub fn new(id: DeviceId, attributes: DeviceAttributes) -> Self {
        Self { id, attributes }
    }
}

/// The client-controlled part of a [`Device`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub ram: String,
    pub rom: String,
}

impl DeviceAttributes {
    /// Decode a request body into device attributes.
    ///
    /// Decoding is lenient about shape: keys match case-insensitively (the
    /// last of several spellings wins), unknown keys are ignored, missing or
    /// `null` text fields become empty strings and a `null` body yields an
    /// all-empty device. An `id` key must hold an integer but is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] for malformed JSON, an empty body, a non-object
    /// body, or a field of the wrong type.
    pub fn from_json(body: &[u8]) -> Result<Self, DecodeError> {
        let Some(FoldedObject(object)) = serde_json::from_slice::<Option<FoldedObject>>(body)?
        else {
            return Ok(Self::default());
        };
        let payload: DevicePayload = serde_json::from_value(Value::Object(object))?;
        Ok(payload.into())
    }
}

/// A JSON object with its keys lowercased, later members overwriting earlier
/// ones that fold to the same key.
struct FoldedObject(Map<String, Value>);

impl<'de> Deserialize<'de> for FoldedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FoldedVisitor;

        impl<'de> Visitor<'de> for FoldedVisitor {
            type Value = FoldedObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FoldedObject, A::Error> {
                let mut object = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    object.insert(key.to_lowercase(), value);
                }
                Ok(FoldedObject(object))
            }
        }

        deserializer.deserialize_map(FoldedVisitor)
    }
}

/// Wire shape accepted on create and update.
#[derive(Default, Deserialize)]
#[serde(default)]
struct DevicePayload {
    #[serde(rename = "id")]
    _id: Option<i64>,
    brand: Option<String>,
    model: Option<String>,
    color: Option<String>,
    ram: Option<String>,
    rom: Option<String>,
}

impl From<DevicePayload> for DeviceAttributes {
    fn from(payload: DevicePayload) -> Self {
        Self {
            brand: payload.brand.unwrap_or_default(),
            model: payload.model.unwrap_or_default(),
            color: payload.color.unwrap_or_default(),
            ram: payload.ram.unwrap_or_default(),
            rom: payload.rom.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> DeviceAttributes {
        DeviceAttributes {
            brand: "Acme".to_string(),
            model: "X1".to_string(),
            color: "black".to_string(),
            ram: "4GB".to_string(),
            rom: "64GB".to_string(),
        }
    }

    #[test]
    fn should_decode_full_payload() {
        let body = br#"{"brand":"Acme","model":"X1","color":"black","ram":"4GB","rom":"64GB"}"#;
        let attributes = DeviceAttributes::from_json(body).unwrap();
        assert_eq!(attributes, acme());
    }

    #[test]
    fn should_ignore_client_supplied_id() {
        let body = br#"{"id":99,"brand":"Acme","model":"X1","color":"black","ram":"4GB","rom":"64GB"}"#;
        let attributes = DeviceAttributes::from_json(body).unwrap();
        assert_eq!(attributes, acme());
    }

    #[test]
    fn should_default_missing_and_null_fields_to_empty() {
        let body = br#"{"brand":"Acme","model":null,"extra":true}"#;
        let attributes = DeviceAttributes::from_json(body).unwrap();
        assert_eq!(attributes.brand, "Acme");
        assert_eq!(attributes.model, "");
        assert_eq!(attributes.rom, "");
    }

    #[test]
    fn should_match_keys_case_insensitively() {
        let body = br#"{"Brand":"Acme","MODEL":"X1","cOlOr":"black","Ram":"4GB","ROM":"64GB"}"#;
        let attributes = DeviceAttributes::from_json(body).unwrap();
        assert_eq!(attributes, acme());
    }

    #[test]
    fn should_keep_last_spelling_of_folded_key() {
        let body = br#"{"brand":"Globex","BRAND":"Acme"}"#;
        let attributes = DeviceAttributes::from_json(body).unwrap();
        assert_eq!(attributes.brand, "Acme");
    }

    #[test]
    fn should_type_check_id_under_any_casing() {
        let result = DeviceAttributes::from_json(br#"{"ID":"one","brand":"Acme"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_decode_null_body_as_empty_device() {
        let attributes = DeviceAttributes::from_json(b"null").unwrap();
        assert_eq!(attributes, DeviceAttributes::default());
    }

    #[test]
    fn should_reject_type_mismatch() {
        let result = DeviceAttributes::from_json(br#"{"brand":5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_non_integer_id() {
        let result = DeviceAttributes::from_json(br#"{"id":"one","brand":"Acme"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_malformed_and_empty_bodies() {
        assert!(DeviceAttributes::from_json(b"{\"brand\":").is_err());
        assert!(DeviceAttributes::from_json(b"").is_err());
        assert!(DeviceAttributes::from_json(b"[\"Acme\"]").is_err());
    }

    #[test]
    fn should_serialize_flat_json_shape() {
        let device = Device::new(DeviceId::FIRST, acme());
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "brand": "Acme",
                "model": "X1",
                "color": "black",
                "ram": "4GB",
                "rom": "64GB",
            })
        );
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let device = Device::new(DeviceId::new(3), acme());
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, device);
    }
}
