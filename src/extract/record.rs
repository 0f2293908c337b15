//! Business listing records and their identity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column order used by every export format.
pub const RECORD_FIELDS: [&str; 6] = [
    "name",
    "address",
    "phone",
    "email",
    "services",
    "website_url",
];

/// One business listing. Only `name` is required; absent fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub services: Option<String>,
    pub website_url: Option<String>,
}

/// Normalized (name, address) pair. Records sharing a key are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    name: String,
    address: String,
}

impl DedupKey {
    pub fn new(name: &str, address: Option<&str>) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            address: address.unwrap_or_default().trim().to_lowercase(),
        }
    }
}

impl BusinessRecord {
    /// Build a record from one element of the model's JSON array.
    ///
    /// Returns `None` for non-objects and for objects whose name is missing
    /// or blank.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let name = field(object, &["name"])?;
        Some(Self {
            name,
            address: field(object, &["address"]),
            phone: field(object, &["phone"]),
            email: field(object, &["email"]),
            services: field(object, &["services"]),
            website_url: field(object, &["website_url", "website"]),
        })
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.name, self.address.as_deref())
    }

    /// Field values in [`RECORD_FIELDS`] order, absent values as empty strings.
    pub fn columns(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.address.as_deref().unwrap_or_default(),
            self.phone.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default(),
            self.services.as_deref().unwrap_or_default(),
            self.website_url.as_deref().unwrap_or_default(),
        ]
    }
}

fn field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(coerce)
}

/// Flatten a JSON value to display text. Blank strings count as absent.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(coerce).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let record = BusinessRecord::from_value(&json!({
            "name": "  Acme Plumbing ",
            "address": "123 Main St",
            "phone": "555-0100",
            "email": null,
            "services": ["drains", "water heaters"],
            "website": "https://acme.example.com"
        }))
        .unwrap();

        assert_eq!(record.name, "Acme Plumbing");
        assert_eq!(record.email, None);
        assert_eq!(record.services.as_deref(), Some("drains, water heaters"));
        assert_eq!(record.website_url.as_deref(), Some("https://acme.example.com"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(BusinessRecord::from_value(&json!({"name": "   ", "phone": "555"})).is_none());
        assert!(BusinessRecord::from_value(&json!({"address": "1 Elm St"})).is_none());
        assert!(BusinessRecord::from_value(&json!({"name": null})).is_none());
    }

    #[test]
    fn test_non_objects_are_rejected() {
        assert!(BusinessRecord::from_value(&json!("Acme Plumbing")).is_none());
        assert!(BusinessRecord::from_value(&json!(["Acme"])).is_none());
        assert!(BusinessRecord::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_numbers_become_text() {
        let record = BusinessRecord::from_value(&json!({"name": 7, "phone": 5550100})).unwrap();
        assert_eq!(record.name, "7");
        assert_eq!(record.phone.as_deref(), Some("5550100"));
    }

    #[test]
    fn test_dedup_key_normalizes_case_and_space() {
        let a = DedupKey::new("Acme Plumbing", Some("123 Main St"));
        let b = DedupKey::new("  ACME plumbing", Some("123 main st  "));
        assert_eq!(a, b);
        assert_eq!(DedupKey::new("Acme", None), DedupKey::new("acme", Some("")));
        assert_ne!(a, DedupKey::new("Acme Plumbing", None));
    }

    #[test]
    fn test_serializes_all_six_keys() {
        let record = BusinessRecord::from_value(&json!({"name": "Acme"})).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for key in RECORD_FIELDS {
            assert!(object.contains_key(key));
        }
        assert_eq!(object["phone"], Value::Null);
    }
}
