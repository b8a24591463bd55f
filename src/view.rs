//! View capability injected into the search pipeline.
//!
//! The pipeline never touches a concrete screen. It reads inputs, writes error
//! slots, mutates the result panel and toggles the busy indicator through
//! [`View`]. [`Document`] is the in-memory implementation shared by every
//! front-end; presentation layers take snapshots of it and draw them.

use crate::model::{Field, ResultBlock, ResultPanel};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait View: Send + Sync {
    fn field_value(&self, field: Field) -> Option<String>;
    fn set_field_value(&self, field: Field, value: Option<String>);

    fn set_error(&self, field: Field, message: &str);
    fn clear_error(&self, field: Field);

    /// Remove every block from the quote list.
    fn clear_results(&self);
    fn show_result_error(&self, message: &str);
    fn hide_result_error(&self);
    fn append_block(&self, block: ResultBlock);

    fn attach_spinner(&self);
    fn detach_spinner(&self);
}

/// Plain copy of the document state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentState {
    pub fields: BTreeMap<Field, String>,
    pub errors: BTreeMap<Field, String>,
    pub panel: ResultPanel,
    pub spinners: usize,
}

impl DocumentState {
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_busy(&self) -> bool {
        self.spinners > 0
    }
}

/// Shared, cheaply cloneable document. Writers are serialized by the lock;
/// the last writer wins.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<Mutex<DocumentState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<'a>(values: impl IntoIterator<Item = (Field, &'a str)>) -> Self {
        let doc = Self::new();
        for (field, value) in values {
            doc.set_field_value(field, Some(value.to_string()));
        }
        doc
    }

    pub fn snapshot(&self) -> DocumentState {
        self.lock().clone()
    }

    /// Edit a field in place, as typing into the control would.
    pub fn edit_field(&self, field: Field, f: impl FnOnce(&mut String)) {
        let mut state = self.lock();
        let value = state.fields.entry(field).or_default();
        f(value);
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl View for Document {
    fn field_value(&self, field: Field) -> Option<String> {
        self.lock().fields.get(&field).cloned()
    }

    fn set_field_value(&self, field: Field, value: Option<String>) {
        let mut state = self.lock();
        match value {
            Some(v) => {
                state.fields.insert(field, v);
            }
            None => {
                state.fields.remove(&field);
            }
        }
    }

    fn set_error(&self, field: Field, message: &str) {
        self.lock().errors.insert(field, message.to_string());
    }

    fn clear_error(&self, field: Field) {
        self.lock().errors.remove(&field);
    }

    fn clear_results(&self) {
        self.lock().panel.blocks.clear();
    }

    fn show_result_error(&self, message: &str) {
        self.lock().panel.error = Some(message.to_string());
    }

    fn hide_result_error(&self) {
        self.lock().panel.error = None;
    }

    fn append_block(&self, block: ResultBlock) {
        self.lock().panel.blocks.push(block);
    }

    fn attach_spinner(&self) {
        self.lock().spinners += 1;
    }

    fn detach_spinner(&self) {
        let mut state = self.lock();
        state.spinners = state.spinners.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let doc = Document::new();
        let other = doc.clone();
        other.set_field_value(Field::Origin, Some("JFK".into()));
        assert_eq!(doc.field_value(Field::Origin).as_deref(), Some("JFK"));
    }

    #[test]
    fn detach_never_underflows() {
        let doc = Document::new();
        doc.detach_spinner();
        assert_eq!(doc.snapshot().spinners, 0);
        doc.attach_spinner();
        assert!(doc.snapshot().is_busy());
        doc.detach_spinner();
        assert!(!doc.snapshot().is_busy());
    }

    #[test]
    fn edit_field_appends_to_value() {
        let doc = Document::with_fields([(Field::Origin, "JF")]);
        doc.edit_field(Field::Origin, |v| v.push('K'));
        doc.edit_field(Field::Destination, |v| v.push('L'));
        let state = doc.snapshot();
        assert_eq!(state.fields.get(&Field::Origin).map(String::as_str), Some("JFK"));
        assert_eq!(state.fields.get(&Field::Destination).map(String::as_str), Some("L"));
    }
}
