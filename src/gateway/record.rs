//! Backend records as the client sees them.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field names accepted as the record identifier, in lookup order
pub const ID_FIELDS: [&str; 2] = ["id", "_id"];

/// Prefix used for optimistic placeholders that have no server id yet
pub const PLACEHOLDER_PREFIX: &str = "pending-";

/// An opaque backend record with a mandatory identifier.
///
/// Field values are kept as the backend sent them; only the identifier is
/// interpreted. Numeric identifiers are normalized to their decimal string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Record {
    id: String,
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object, locating its identifier
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, String> {
        let id = ID_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).and_then(id_from_value))
            .ok_or_else(|| "record has no 'id' field".to_string())?;
        Ok(Self { id, fields })
    }

    /// Create a client-side placeholder for a record the server has not
    /// acknowledged yet
    pub fn placeholder(mut fields: Map<String, Value>) -> Self {
        let id = format!("{}{}", PLACEHOLDER_PREFIX, uuid::Uuid::new_v4());
        fields.insert("id".to_string(), Value::String(id.clone()));
        Self { id, fields }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(PLACEHOLDER_PREFIX)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value rendered for display; strings are shown without quotes
    pub fn display_field(&self, field: &str) -> Option<String> {
        self.fields.get(field).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Copy of this record with `updates` applied on top.
    ///
    /// The identifier is kept even if `updates` tries to change it.
    pub fn merged(&self, updates: &Map<String, Value>) -> Self {
        let mut fields = self.fields.clone();
        for (key, value) in updates {
            if ID_FIELDS.contains(&key.as_str()) {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }
        Self {
            id: self.id.clone(),
            fields,
        }
    }
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<Value> for Record {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Record::from_fields(fields),
            other => Err(format!("expected a JSON object, got {other}")),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
