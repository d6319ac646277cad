use crate::{MediaFetchError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, scheme-qualified locator for a content item.
///
/// Not a filesystem path: `content://media/external/images/media/42`,
/// `content://mms/part/7` and `file:///tmp/a.png` are all references. Beyond
/// the scheme, the value is only compared and logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Parse a reference, requiring a `scheme:` prefix.
    ///
    /// The scheme must start with an ASCII letter and contain only letters,
    /// digits, `+`, `-` and `.`.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match value.split_once(':') {
            Some((scheme, _)) if is_valid_scheme(scheme) => Ok(Self(value)),
            _ => Err(MediaFetchError::validation(format!(
                "Resource reference has no scheme: {}",
                value
            ))),
        }
    }

    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map(|(scheme, _)| scheme).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ResourceRef {
    type Error = MediaFetchError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ResourceRef> for String {
    fn from(value: ResourceRef) -> Self {
        value.0
    }
}

/// Known keys of a [`FieldMap`].
///
/// The first five are filled while resolving; the rest are added by
/// pre-catalog enrichment when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Uri,
    SourceMimeType,
    Title,
    SizeBytes,
    Path,
    Width,
    Height,
    SourceRotationDegrees,
    SourceDateTakenMillis,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Uri => "uri",
            FieldKey::SourceMimeType => "sourceMimeType",
            FieldKey::Title => "title",
            FieldKey::SizeBytes => "sizeBytes",
            FieldKey::Path => "path",
            FieldKey::Width => "width",
            FieldKey::Height => "height",
            FieldKey::SourceRotationDegrees => "sourceRotationDegrees",
            FieldKey::SourceDateTakenMillis => "sourceDateTakenMillis",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamically-typed value stored in a [`FieldMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Insertion-ordered field name to value mapping, the payload of a
/// successful fetch.
pub type FieldMap = IndexMap<String, FieldValue>;

/// Typed access to a [`FieldMap`] through [`FieldKey`].
///
/// Lookups never fail: a missing key or a value of the wrong type is `None`.
pub trait FieldMapExt {
    fn set(&mut self, key: FieldKey, value: impl Into<FieldValue>);
    fn get_field(&self, key: FieldKey) -> Option<&FieldValue>;
    fn get_str(&self, key: FieldKey) -> Option<&str>;
    fn get_i64(&self, key: FieldKey) -> Option<i64>;
}

impl FieldMapExt for FieldMap {
    fn set(&mut self, key: FieldKey, value: impl Into<FieldValue>) {
        self.insert(key.as_str().to_string(), value.into());
    }

    fn get_field(&self, key: FieldKey) -> Option<&FieldValue> {
        self.get(key.as_str())
    }

    fn get_str(&self, key: FieldKey) -> Option<&str> {
        self.get_field(key).and_then(FieldValue::as_str)
    }

    fn get_i64(&self, key: FieldKey) -> Option<i64> {
        self.get_field(key).and_then(FieldValue::as_i64)
    }
}
