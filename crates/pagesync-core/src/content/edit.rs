//! Owned document state and edit sessions.
//!
//! A field becomes editable with [`EditableDocument::begin_edit`], which hands
//! out an [`EditDraft`]. Keystrokes only touch the draft; the model changes
//! once, when the draft is committed (the on-blur moment in a UI).

use super::document::{ContentDocument, scalar_text};
use super::image::ImageRef;
use crate::error::DocumentError;

/// Address of one editable scalar in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Scalar {
        field: String,
    },
    Item {
        collection: String,
        index: usize,
        field: String,
    },
}

impl FieldPath {
    pub fn scalar(field: impl Into<String>) -> Self {
        FieldPath::Scalar {
            field: field.into(),
        }
    }

    pub fn item(collection: impl Into<String>, index: usize, field: impl Into<String>) -> Self {
        FieldPath::Item {
            collection: collection.into(),
            index,
            field: field.into(),
        }
    }
}

/// Uncommitted text for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    path: FieldPath,
    original: String,
    text: String,
    base_revision: u64,
}

impl EditDraft {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Text of the field when editing began.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.original
    }

    /// Document revision the draft was started from.
    pub fn base_revision(&self) -> u64 {
        self.base_revision
    }
}

/// The document a single view owns, plus a revision counter.
///
/// Not shared: two views of the same section each hold their own copy and
/// never see each other's edits.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableDocument {
    current: ContentDocument,
    revision: u64,
}

impl EditableDocument {
    /// Starts from the view's seed document.
    pub fn new(seed: ContentDocument) -> Self {
        Self {
            current: seed,
            revision: 0,
        }
    }

    pub fn document(&self) -> &ContentDocument {
        &self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swaps in a whole new document (fetch completion). Edits committed
    /// against the previous document are discarded.
    pub fn replace(&mut self, document: ContentDocument) {
        self.current = document;
        self.revision += 1;
    }

    pub fn set_scalar_field(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let next = self.current.with_scalar_field(field, value)?;
        self.commit(next);
        Ok(())
    }

    pub fn set_item_field(
        &mut self,
        collection: &str,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let next = self.current.with_item_field(collection, index, field, value)?;
        self.commit(next);
        Ok(())
    }

    pub fn set_image_reference(
        &mut self,
        collection: &str,
        index: usize,
        field: &str,
        image: &ImageRef,
    ) -> Result<(), DocumentError> {
        let next = self
            .current
            .with_image_reference(collection, index, field, image)?;
        self.commit(next);
        Ok(())
    }

    /// Opens an edit session on `path`, seeded with the field's current text.
    pub fn begin_edit(&self, path: FieldPath) -> Result<EditDraft, DocumentError> {
        let value = match &path {
            FieldPath::Scalar { field } => self.current.scalar(field)?,
            FieldPath::Item {
                collection,
                index,
                field,
            } => self.current.item_field(collection, *index, field)?,
        };
        let original = scalar_text(value);
        Ok(EditDraft {
            path,
            text: original.clone(),
            original,
            base_revision: self.revision,
        })
    }

    /// Applies a finished draft to the current document.
    ///
    /// An unchanged draft commits nothing and leaves the revision alone.
    pub fn commit_edit(&mut self, draft: EditDraft) -> Result<&ContentDocument, DocumentError> {
        if draft.is_dirty() {
            let EditDraft { path, text, .. } = draft;
            match path {
                FieldPath::Scalar { field } => self.set_scalar_field(&field, text)?,
                FieldPath::Item {
                    collection,
                    index,
                    field,
                } => self.set_item_field(&collection, index, &field, text)?,
            }
        }
        Ok(&self.current)
    }

    fn commit(&mut self, next: ContentDocument) {
        self.current = next;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editable() -> EditableDocument {
        EditableDocument::new(
            ContentDocument::from_value(json!({
                "title": "Blockchain Technology",
                "cards": [{"title": "Ledger", "image": "Uploads/a.webp", "text": "Recorded."}]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_keystrokes_do_not_touch_model() {
        let model = editable();
        let mut draft = model.begin_edit(FieldPath::item("cards", 0, "title")).unwrap();
        draft.set_text("L");
        draft.set_text("Le");
        assert_eq!(model.document().item_field("cards", 0, "title").unwrap(), "Ledger");
        assert_eq!(model.revision(), 0);
    }

    #[test]
    fn test_commit_applies_once() {
        let mut model = editable();
        let mut draft = model.begin_edit(FieldPath::item("cards", 0, "title")).unwrap();
        assert_eq!(draft.original(), "Ledger");
        draft.set_text("Reef Ledger");

        let doc = model.commit_edit(draft).unwrap();
        assert_eq!(doc.item_field("cards", 0, "title").unwrap(), "Reef Ledger");
        assert_eq!(model.revision(), 1);
    }

    #[test]
    fn test_unchanged_draft_is_noop() {
        let mut model = editable();
        let draft = model.begin_edit(FieldPath::scalar("title")).unwrap();
        model.commit_edit(draft).unwrap();
        assert_eq!(model.revision(), 0);
    }

    #[test]
    fn test_begin_edit_on_collection_fails() {
        let model = editable();
        assert_eq!(
            model.begin_edit(FieldPath::scalar("cards")).unwrap_err(),
            DocumentError::NotAScalar("cards".into())
        );
    }

    #[test]
    fn test_replace_discards_earlier_edits() {
        let mut model = editable();
        model.set_scalar_field("title", "Edited early").unwrap();

        let server = ContentDocument::from_value(json!({
            "title": "From server",
            "cards": []
        }))
        .unwrap();
        model.replace(server.clone());

        assert_eq!(model.document(), &server);
        assert_eq!(model.revision(), 2);
    }

    #[test]
    fn test_failed_mutation_keeps_revision() {
        let mut model = editable();
        assert!(model.set_item_field("cards", 5, "title", "x").is_err());
        assert_eq!(model.revision(), 0);
    }
}
