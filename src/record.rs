//! Record identity and field access.
//!
//! The pipeline never knows the concrete shape of a row. It asks for
//! "the field named X" through [`TableRecord`], so the same stages serve
//! the dynamic [`Record`] map loaded from JSON and the typed roster
//! structs in [`crate::roster`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the identity field.
pub const ID_FIELD: &str = "id";

/// Unique record identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(i64::from(n))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

impl From<&RecordId> for Value {
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// A row the pipeline can filter, search, sort, summarize and export.
pub trait TableRecord {
    /// Stable unique identifier.
    fn id(&self) -> RecordId;

    /// Look up a field by name. Absent fields return `None`.
    fn field(&self, name: &str) -> Option<Cow<'_, Value>>;

    /// Stringified field, with absent fields as the empty string.
    fn field_text(&self, name: &str) -> String {
        self.field(name).map(|v| v.to_text()).unwrap_or_default()
    }

    /// Numeric field, `None` when absent or not a number.
    fn field_number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(|v| v.as_number())
    }
}

impl<T: TableRecord + ?Sized> TableRecord for &T {
    fn id(&self) -> RecordId {
        (**self).id()
    }

    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        (**self).field(name)
    }
}

/// A record with arbitrary named fields, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field. Setting `id` is ignored; identity is fixed at creation.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name != ID_FIELD {
            self.fields.insert(name, value.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field names other than `id`, in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl TableRecord for Record {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        if name == ID_FIELD {
            return Some(Cow::Owned(Value::from(&self.id)));
        }
        self.fields.get(name).map(Cow::Borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_lookup() {
        let r = Record::new(1).with("status", "Active").with("rating", 4.8);
        assert_eq!(r.field_text("status"), "Active");
        assert_eq!(r.field_number("rating"), Some(4.8));
        assert_eq!(r.field_text("missing"), "");
        assert!(r.field("missing").is_none());
    }

    #[test]
    fn test_id_is_a_field() {
        let r = Record::new("hr-7");
        assert_eq!(r.field_text("id"), "hr-7");
        assert_eq!(r.id(), RecordId::from("hr-7"));
    }

    #[test]
    fn test_set_id_is_ignored() {
        let mut r = Record::new(3);
        r.set("id", 99_i64);
        assert_eq!(r.id(), RecordId::Int(3));
        assert_eq!(r.field_names().count(), 0);
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{"id": 2, "name": "Dana Lee", "skills": ["Payroll", "Benefits"], "salary": 72000}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.id(), RecordId::Int(2));
        assert_eq!(r.field_text("skills"), "Payroll, Benefits");
        assert_eq!(r.field_number("salary"), Some(72000.0));
    }

    #[test]
    fn test_text_id_deserializes() {
        let r: Record = serde_json::from_str(r#"{"id": "EMP-001"}"#).unwrap();
        assert_eq!(r.id(), RecordId::Text("EMP-001".to_string()));
    }

    #[test]
    fn test_reference_delegates() {
        let r = Record::new(5).with("department", "HR");
        let by_ref: &Record = &r;
        assert_eq!(TableRecord::field_text(&by_ref, "department"), "HR");
        assert_eq!(TableRecord::id(&by_ref), RecordId::Int(5));
    }
}
