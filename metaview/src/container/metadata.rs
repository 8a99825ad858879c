use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{error::HeaderCodecError, header::METADATA_KEY};

/// Metadata as the application sees it: string keys to arbitrary JSON.
pub type Metadata = Map<String, Value>;

/// A single `__metadata__` entry after best-effort re-typing.
///
/// String entries holding valid JSON come back as `Structured`, every other
/// string stays `Raw`. Numbers keep their source text, so values beyond the
/// range of `u64` or `f64` are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Structured(Value),
    Raw(String),
}

impl MetadataValue {
    fn from_entry(value: &Value) -> Self {
        match value {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => Self::Structured(parsed),
                Err(_) => Self::Raw(text.clone()),
            },
            other => Self::Structured(other.clone()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Structured(value) => value.clone(),
            Self::Raw(text) => Value::String(text.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedMetadata {
    pub metadata: IndexMap<String, MetadataValue>,
    pub formatted_metadata: Metadata,
}

impl ExtractedMetadata {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// The structured view flattened back into plain JSON.
    pub fn structured(&self) -> Metadata {
        self.metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

pub fn extract_metadata(
    raw_header: &Map<String, Value>
) -> Result<ExtractedMetadata, HeaderCodecError> {
    let entries = match raw_header.get(METADATA_KEY) {
        None | Some(Value::Null) => return Err(HeaderCodecError::NoMetadata),
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            return Err(HeaderCodecError::malformed(format!(
                "{METADATA_KEY} is not an object"
            )));
        },
    };
    if entries.is_empty() {
        return Err(HeaderCodecError::NoMetadata);
    }

    let metadata = entries
        .iter()
        .map(|(key, value)| (key.clone(), MetadataValue::from_entry(value)))
        .collect();
    Ok(ExtractedMetadata {
        metadata,
        formatted_metadata: entries.clone(),
    })
}

/// Converts metadata into the string-to-string form the container stores.
///
/// Strings are kept as they are, everything else becomes compact JSON.
pub fn format_metadata(metadata: &Metadata) -> Map<String, Value> {
    metadata
        .iter()
        .map(|(key, value)| {
            let formatted = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), Value::String(formatted))
        })
        .collect()
}

/// Turns any serializable value into a metadata object.
pub fn to_metadata<T: Serialize + ?Sized>(
    value: &T
) -> Result<Metadata, HeaderCodecError> {
    match serde_json::to_value(value).map_err(HeaderCodecError::Serialization)? {
        Value::Object(metadata) => Ok(metadata),
        _ => Err(HeaderCodecError::MetadataNotObject),
    }
}
