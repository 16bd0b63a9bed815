//! Optional-field access into loosely shaped API JSON.
//!
//! Dataverse responses omit whole blocks depending on the dataset's state and
//! the installation's metadata schema, so every lookup here takes a JSON
//! pointer (`/latestVersion/files`) and falls back to a default when any
//! step of the path is absent or of the wrong type.

use serde_json::Value;

pub trait FieldAccess {
  fn field(&self, pointer: &str) -> Option<&Value>;

  /// String at `pointer`; numbers and booleans are rendered, anything else is empty.
  fn text(&self, pointer: &str) -> String {
    match self.field(pointer) {
      Some(Value::String(s)) => s.clone(),
      Some(Value::Number(n)) => n.to_string(),
      Some(Value::Bool(b)) => b.to_string(),
      _ => String::new(),
    }
  }

  fn count(&self, pointer: &str) -> u64 {
    match self.field(pointer) {
      Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
      Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
      _ => 0,
    }
  }

  fn list(&self, pointer: &str) -> &[Value] {
    self
      .field(pointer)
      .and_then(Value::as_array)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }
}

impl FieldAccess for Value {
  fn field(&self, pointer: &str) -> Option<&Value> {
    if pointer.is_empty() {
      Some(self)
    } else {
      self.pointer(pointer)
    }
  }
}

/// Finds the metadata field with the given `typeName` in a list of citation fields.
pub fn find_typed<'a>(fields: &'a [Value], type_name: &str) -> Option<&'a Value> {
  fields
    .iter()
    .find(|field| field.get("typeName").and_then(Value::as_str) == Some(type_name))
}
