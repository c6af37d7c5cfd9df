//! Untrusted request body, decoded from JSON or URL-encoded form fields.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single submitted value. Form posts and JSON bodies can both carry either
/// a scalar or a list (`services[]=a&services[]=b`, `"services": ["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(FieldValue::List(
                items.into_iter().filter_map(scalar_to_string).collect(),
            )),
            other => scalar_to_string(other).map(FieldValue::Text),
        }
    }

    /// Scalar text, `None` for lists.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::List(_) => None,
        }
    }

    /// Normalizes either shape into an ordered sequence.
    pub fn to_list(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(value) => vec![value.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    fields: BTreeMap<String, FieldValue>,
}

impl RawSubmission {
    /// Decodes a request body: a JSON object first, URL-encoded fields when
    /// the body is not JSON or decodes to an empty object.
    pub fn from_body(body: &[u8]) -> Self {
        match Self::from_json(body) {
            Some(raw) => raw,
            None => Self::from_form(body),
        }
    }

    pub fn from_json(body: &[u8]) -> Option<Self> {
        let object: serde_json::Map<String, Value> = serde_json::from_slice(body).ok()?;
        if object.is_empty() {
            return None;
        }

        let fields = object
            .into_iter()
            .filter_map(|(key, value)| FieldValue::from_json(value).map(|value| (key, value)))
            .collect();

        Some(Self { fields })
    }

    /// Repeated plain keys keep the last value; `key[]` keys accumulate into
    /// a list stored under `key`.
    pub fn from_form(body: &[u8]) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();
        let mut fields = BTreeMap::new();

        for (key, value) in pairs {
            match key.strip_suffix("[]") {
                Some(key) => {
                    let entry = fields
                        .entry(key.to_owned())
                        .or_insert_with(|| FieldValue::List(Vec::new()));
                    match entry {
                        FieldValue::List(values) => values.push(value),
                        FieldValue::Text(_) => *entry = FieldValue::List(vec![value]),
                    }
                }
                None => {
                    fields.insert(key, FieldValue::Text(value));
                }
            }
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RawSubmission {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
