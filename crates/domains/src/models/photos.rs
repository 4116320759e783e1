use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Ordered list of stored file paths (pet photos, report photos,
/// forum images). Updates append; nothing in the workflow replaces
/// or reorders existing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoList(Vec<String>);

impl PhotoList {
    pub fn new(paths: Vec<String>) -> Self {
        Self(paths.into_iter().map(normalize_path).collect())
    }

    /// Appends `path` after every existing entry.
    pub fn push(&mut self, path: impl Into<String>) {
        self.0.push(normalize_path(path.into()));
    }

    /// Returns a copy of `self` with `path` appended, or `self` unchanged.
    pub fn merged_with(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.push(path);
        }
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes a stored JSON value. Anything other than an array of
    /// strings is rejected; callers decide whether to recover.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DomainError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        DomainError::Validation(format!("photo entry is not a string: {item}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::new),
            // Legacy rows hold the array serialized inside a JSON string.
            serde_json::Value::String(raw) => Self::from_text(raw),
            other => Err(DomainError::Validation(format!(
                "photo field is not an array: {other}"
            ))),
        }
    }

    /// Decodes the legacy text form (`["uploads\\a.jpg", ...]`).
    pub fn from_text(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Vec<String>>(raw)
            .map(Self::new)
            .map_err(|e| DomainError::Validation(format!("unparseable photo field: {e}")))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.0.clone())
    }
}

impl From<Vec<String>> for PhotoList {
    fn from(paths: Vec<String>) -> Self {
        Self::new(paths)
    }
}

impl IntoIterator for PhotoList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Windows upload paths were stored with backslashes.
fn normalize_path(path: String) -> String {
    if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path
    }
}
