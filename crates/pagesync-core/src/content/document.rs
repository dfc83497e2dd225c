//! The editable content tree of one section.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::image::ImageRef;
use crate::error::DocumentError;

/// Content of one section: top-level scalar text fields plus named
/// collections of item records (field name → scalar).
///
/// Shape is not validated. Every mutation returns a fresh document of the
/// same shape: names are replaced in place, never added, removed or renamed.
/// The input document is left untouched, so a previously handed-out copy
/// never observes a later edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument(Map<String, Value>);

impl ContentDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a document from a JSON value. Fails unless `value` is an object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Top-level scalar field.
    pub fn scalar(&self, field: &str) -> Result<&Value, DocumentError> {
        let value = self
            .0
            .get(field)
            .ok_or_else(|| DocumentError::MissingField(field.to_string()))?;
        ensure_scalar(field, value)?;
        Ok(value)
    }

    /// Top-level scalar field as text; `None` when missing or not a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn collection_len(&self, collection: &str) -> Result<usize, DocumentError> {
        Ok(self.collection(collection)?.len())
    }

    pub fn item_field(
        &self,
        collection: &str,
        index: usize,
        field: &str,
    ) -> Result<&Value, DocumentError> {
        let items = self.collection(collection)?;
        let len = items.len();
        let record = items
            .get(index)
            .ok_or_else(|| DocumentError::IndexOutOfRange {
                collection: collection.to_string(),
                index,
                len,
            })?
            .as_object()
            .ok_or_else(|| DocumentError::NotARecord {
                collection: collection.to_string(),
                index,
            })?;
        let value = record
            .get(field)
            .ok_or_else(|| DocumentError::MissingField(format!("{collection}[{index}].{field}")))?;
        ensure_scalar(field, value)?;
        Ok(value)
    }

    pub fn image_reference(
        &self,
        collection: &str,
        index: usize,
        field: &str,
    ) -> Result<ImageRef, DocumentError> {
        let value = self.item_field(collection, index, field)?;
        Ok(ImageRef::parse(scalar_text(value)))
    }

    fn collection(&self, collection: &str) -> Result<&Vec<Value>, DocumentError> {
        self.0
            .get(collection)
            .ok_or_else(|| DocumentError::MissingField(collection.to_string()))?
            .as_array()
            .ok_or_else(|| DocumentError::NotACollection(collection.to_string()))
    }

    // ============================================================================
    // Mutations (each returns a new document)
    // ============================================================================

    /// Replaces a top-level scalar field.
    pub fn with_scalar_field(
        &self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        self.scalar(field)?;
        let mut next = self.clone();
        next.0.insert(field.to_string(), Value::String(value.into()));
        Ok(next)
    }

    /// Replaces `field` of item `index` in `collection`.
    pub fn with_item_field(
        &self,
        collection: &str,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let mut next = self.clone();
        let slot = item_field_mut(&mut next.0, collection, index, field)?;
        *slot = Value::String(value.into());
        Ok(next)
    }

    /// Points an item's image field at `image`.
    pub fn with_image_reference(
        &self,
        collection: &str,
        index: usize,
        field: &str,
        image: &ImageRef,
    ) -> Result<Self, DocumentError> {
        self.with_item_field(collection, index, field, image.as_uri())
    }
}

/// Text shown in an editor for a scalar value. `null` edits as empty text.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn ensure_scalar(field: &str, value: &Value) -> Result<(), DocumentError> {
    if value.is_array() || value.is_object() {
        return Err(DocumentError::NotAScalar(field.to_string()));
    }
    Ok(())
}

fn item_field_mut<'a>(
    fields: &'a mut Map<String, Value>,
    collection: &str,
    index: usize,
    field: &str,
) -> Result<&'a mut Value, DocumentError> {
    let items = fields
        .get_mut(collection)
        .ok_or_else(|| DocumentError::MissingField(collection.to_string()))?
        .as_array_mut()
        .ok_or_else(|| DocumentError::NotACollection(collection.to_string()))?;
    let len = items.len();
    let record = items
        .get_mut(index)
        .ok_or_else(|| DocumentError::IndexOutOfRange {
            collection: collection.to_string(),
            index,
            len,
        })?
        .as_object_mut()
        .ok_or_else(|| DocumentError::NotARecord {
            collection: collection.to_string(),
            index,
        })?;
    let slot = record
        .get_mut(field)
        .ok_or_else(|| DocumentError::MissingField(format!("{collection}[{index}].{field}")))?;
    ensure_scalar(field, slot)?;
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ContentDocument {
        ContentDocument::from_value(json!({
            "title": "Blockchain Technology",
            "description": "Transparency for reef restoration.",
            "cards": [
                {"title": "Ledger", "image": "Uploads/blockchain.webp", "text": "Recorded."},
                {"title": "Smart Contracts", "image": "Uploads/handshake.jpg", "text": "Verified."}
            ],
            "steps": [
                {"title": "Purchase tokens", "description": "Buy a token."}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_set_item_field_then_read_back() {
        let doc = sample();
        let next = doc.with_item_field("cards", 1, "title", "Contracts").unwrap();

        assert_eq!(next.item_field("cards", 1, "title").unwrap(), "Contracts");
        // everything else is unchanged
        assert_eq!(next.item_field("cards", 0, "title").unwrap(), "Ledger");
        assert_eq!(next.item_field("cards", 1, "text").unwrap(), "Verified.");
        assert_eq!(next.text("title"), Some("Blockchain Technology"));
        assert_eq!(next.collection_len("steps").unwrap(), 1);
    }

    #[test]
    fn test_mutation_does_not_alias_input() {
        let doc = sample();
        let before = doc.clone();
        let _next = doc.with_item_field("cards", 0, "text", "Changed").unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_set_scalar_field() {
        let doc = sample();
        let next = doc.with_scalar_field("title", "Reef Ledger").unwrap();
        assert_eq!(next.text("title"), Some("Reef Ledger"));
        assert_eq!(next.field_names().count(), doc.field_names().count());
    }

    #[test]
    fn test_set_scalar_on_collection_fails() {
        let err = sample().with_scalar_field("cards", "nope").unwrap_err();
        assert_eq!(err, DocumentError::NotAScalar("cards".into()));
    }

    #[test]
    fn test_set_unknown_field_fails_without_adding() {
        let err = sample().with_scalar_field("subtitle", "x").unwrap_err();
        assert_eq!(err, DocumentError::MissingField("subtitle".into()));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = sample().with_item_field("steps", 3, "title", "x").unwrap_err();
        assert_eq!(
            err,
            DocumentError::IndexOutOfRange {
                collection: "steps".into(),
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn test_missing_collection() {
        let err = sample().with_item_field("faq", 0, "title", "x").unwrap_err();
        assert_eq!(err, DocumentError::MissingField("faq".into()));
    }

    #[test]
    fn test_image_reference_round_trip() {
        let doc = sample();
        let blob = ImageRef::Transient("blob:http://localhost:5000/abc".into());
        let next = doc.with_image_reference("cards", 0, "image", &blob).unwrap();
        assert_eq!(next.image_reference("cards", 0, "image").unwrap(), blob);
        assert_eq!(
            doc.image_reference("cards", 0, "image").unwrap(),
            ImageRef::Stable("Uploads/blockchain.webp".into())
        );
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(ContentDocument::from_value(json!(["not", "a", "document"])).is_err());
    }
}
