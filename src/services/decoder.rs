//! Response decoding
//!
//! Decodes raw response bodies into typed envelopes. The service sometimes
//! sends an empty list field as `null` or `{}`; when strict decoding fails,
//! the payload is parsed untyped, those fields are rewritten to `[]` on each
//! element of `_embedded.items`, and decoding is retried once. The in-band
//! error envelope takes precedence over any decoded payload.

use crate::models::{ItemsEnvelope, MutationItem, ServiceError};
use crate::services::validator::Validate;
use crate::utils::error::{CrmError, CrmResult};
use crate::utils::logging::truncate_body;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Item fields that may arrive as `null` / `{}` instead of an empty array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repair {
    keys: &'static [&'static str],
}

impl Repair {
    /// No repair
    pub const NONE: Repair = Repair { keys: &[] };

    pub const fn fields(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Rewrite the configured fields of every `_embedded.items` element,
    /// returning how many values changed
    pub fn apply(&self, payload: &mut Value) -> usize {
        let Some(items) = payload
            .get_mut("_embedded")
            .and_then(|e| e.get_mut("items"))
        else {
            return 0;
        };

        let elements: Vec<&mut Value> = match items {
            Value::Array(list) => list.iter_mut().collect(),
            Value::Object(map) => map.values_mut().collect(),
            _ => return 0,
        };

        let mut changed = 0;
        for element in elements {
            let Value::Object(fields) = element else {
                continue;
            };
            for key in self.keys {
                if let Some(value) = fields.get_mut(*key) {
                    if is_empty_placeholder(value) {
                        *value = Value::Array(Vec::new());
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

fn is_empty_placeholder(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Whether the body carries no payload at all
pub fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Decode `body` into `T`, falling back to one repair pass
///
/// A failed repair surfaces the original decode error.
pub fn decode<T: DeserializeOwned>(body: &[u8], repair: &Repair) -> Result<T, serde_json::Error> {
    let original = match serde_json::from_slice(body) {
        Ok(decoded) => return Ok(decoded),
        Err(e) => e,
    };
    if repair.is_empty() {
        return Err(original);
    }

    let Ok(mut tree) = serde_json::from_slice::<Value>(body) else {
        return Err(original);
    };
    let changed = repair.apply(&mut tree);
    if changed == 0 {
        return Err(original);
    }

    match serde_json::from_value(tree) {
        Ok(decoded) => {
            warn!("Repaired {} empty collection field(s) after: {}", changed, original);
            Ok(decoded)
        }
        Err(retry) => {
            debug!("Repair did not help: {}", retry);
            Err(original)
        }
    }
}

/// Look for a populated error envelope in a raw body
pub fn probe_error(body: &[u8]) -> Option<ServiceError> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    ServiceError::probe(&payload)
}

/// Decode with error-envelope precedence
fn decode_checked<T: DeserializeOwned>(body: &[u8], repair: &Repair) -> CrmResult<T> {
    match decode::<T>(body, repair) {
        Ok(decoded) => match probe_error(body) {
            Some(err) => {
                warn!("Service reported error {:?}: {}", err.code, err.message);
                Err(err.into())
            }
            None => Ok(decoded),
        },
        Err(e) => match probe_error(body) {
            Some(err) => {
                warn!("Service reported error {:?}: {}", err.code, err.message);
                Err(err.into())
            }
            None => {
                debug!("Undecodable body: {}", truncate_body(body, 300));
                Err(CrmError::Decode(e))
            }
        },
    }
}

/// Decode a list response
///
/// Returns `Ok(None)` for an empty body, `EmptyResult` when the items
/// collection is empty, and validates every item.
pub fn decode_items<T>(body: &[u8], repair: &Repair) -> CrmResult<Option<Vec<T>>>
where
    T: DeserializeOwned + Validate,
{
    if is_blank(body) {
        debug!("Empty body, no result");
        return Ok(None);
    }

    let items = decode_checked::<ItemsEnvelope<T>>(body, repair)?.into_items();
    if items.is_empty() {
        return Err(CrmError::EmptyResult);
    }
    items.validate()?;

    debug!("Decoded {} item(s)", items.len());
    Ok(Some(items))
}

/// Decode an add/update response into the id of the affected entity
pub fn decode_mutation(body: &[u8]) -> CrmResult<i64> {
    if is_blank(body) {
        return Err(CrmError::EmptyResult);
    }

    let items = decode_checked::<ItemsEnvelope<MutationItem>>(body, &Repair::NONE)?.into_items();
    let first = items.into_iter().next().ok_or(CrmError::EmptyResult)?;
    first.validate()?;
    Ok(first.id)
}

/// Decode a single-object response
///
/// Returns `Ok(None)` for an empty body.
pub fn decode_object<T>(body: &[u8]) -> CrmResult<Option<T>>
where
    T: DeserializeOwned + Validate,
{
    if is_blank(body) {
        debug!("Empty body, no result");
        return Ok(None);
    }

    let decoded = decode_checked::<T>(body, &Repair::NONE)?;
    decoded.validate()?;
    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validator::{Rules, ValidationError};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: i64,
        #[serde(default)]
        tags: Vec<String>,
    }

    impl Validate for Item {
        fn validate(&self) -> Result<(), ValidationError> {
            Rules::new("Item").required("id", &self.id).finish()
        }
    }

    const TAGS: Repair = Repair::fields(&["tags"]);

    fn bytes(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_blank_body_is_no_result() {
        assert!(decode_items::<Item>(b"", &TAGS).unwrap().is_none());
        assert!(decode_items::<Item>(b"  \n", &TAGS).unwrap().is_none());
    }

    #[test]
    fn test_null_tags_are_repaired() {
        let body = bytes(json!({"_embedded": {"items": [{"id": 1, "tags": null}, {"id": 2, "tags": {}}]}}));
        let items = decode_items::<Item>(&body, &TAGS).unwrap().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].tags.is_empty());
    }

    #[test]
    fn test_repair_only_touches_item_fields() {
        let mut tree = json!({
            "tags": null,
            "_embedded": {"items": [{"id": 1, "meta": {"tags": null}, "tags": null}]}
        });
        assert_eq!(TAGS.apply(&mut tree), 1);
        assert!(tree["tags"].is_null());
        assert!(tree["_embedded"]["items"][0]["meta"]["tags"].is_null());
        assert_eq!(tree["_embedded"]["items"][0]["tags"], json!([]));
    }

    #[test]
    fn test_unrelated_failure_keeps_original_error() {
        let body = bytes(json!({"_embedded": {"items": [{"id": "not-a-number", "tags": null}]}}));
        let direct = serde_json::from_slice::<ItemsEnvelope<Item>>(&body).unwrap_err();

        let err = decode::<ItemsEnvelope<Item>>(&body, &TAGS).unwrap_err();
        assert_eq!(err.to_string(), direct.to_string());
    }

    #[test]
    fn test_error_envelope_wins() {
        let body = bytes(json!({
            "_embedded": {"items": [{"id": 1}]},
            "response": {"error": "Access denied", "error_code": "403"}
        }));
        let err = decode_items::<Item>(&body, &TAGS).unwrap_err();
        assert!(matches!(err, CrmError::Service { ref code, .. } if code.as_deref() == Some("403")));
    }

    #[test]
    fn test_error_envelope_on_decode_failure() {
        let body = bytes(json!({"response": {"error": "Unknown method", "error_code": 400}}));
        let err = decode_mutation(&body).unwrap_err();
        assert!(matches!(err, CrmError::Service { .. }));
    }

    #[test]
    fn test_empty_items_is_empty_result() {
        let body = bytes(json!({"_links": {}, "_embedded": {"items": []}}));
        let err = decode_items::<Item>(&body, &TAGS).unwrap_err();
        assert!(matches!(err, CrmError::EmptyResult));
    }

    #[test]
    fn test_items_are_validated() {
        let body = bytes(json!({"_embedded": {"items": [{"id": 3}, {"id": 0}]}}));
        let err = decode_items::<Item>(&body, &TAGS).unwrap_err();
        match err {
            CrmError::Validation(v) => assert_eq!(v.fields(), vec!["[1].id"]),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_mutation_id() {
        let body = bytes(json!({"_embedded": {"items": [{"id": 4021, "_links": {"self": {"href": "/api/v2/leads?id=4021"}}}]}}));
        assert_eq!(decode_mutation(&body).unwrap(), 4021);

        let body = bytes(json!({"_embedded": {"items": []}}));
        assert!(matches!(decode_mutation(&body), Err(CrmError::EmptyResult)));

        let body = bytes(json!({"_links": {}}));
        assert!(matches!(decode_mutation(&body), Err(CrmError::EmptyResult)));
    }

    #[test]
    fn test_blank_object_is_no_result() {
        assert!(decode_object::<Item>(b"").unwrap().is_none());
        assert_eq!(decode_object::<Item>(br#"{"id": 5}"#).unwrap().unwrap().id, 5);
    }

    #[test]
    fn test_repaired_map_keeps_document_order() {
        let body = br#"{"_embedded": {"items": {"9": {"id": 9, "tags": null}, "10": {"id": 10, "tags": {}}}}}"#;
        let items = decode_items::<Item>(body, &TAGS).unwrap().unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![9, 10]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_items::<Item>(b"<html>502</html>", &TAGS).unwrap_err();
        assert!(matches!(err, CrmError::Decode(_)));
    }
}
