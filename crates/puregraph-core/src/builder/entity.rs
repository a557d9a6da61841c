use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

/// One serialized element as handed over by the storage layer
///
/// `content` is the element's protocol JSON. Its `name`/`package` keys, when
/// present, must agree with `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementEntity {
    pub path: String,
    pub classifier_path: String,
    #[serde(default)]
    pub content: Value,
}

impl ElementEntity {
    pub fn new(
        path: impl Into<String>,
        classifier_path: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            path: path.into(),
            classifier_path: classifier_path.into(),
            content,
        }
    }

    /// Parse a JSON array of entities
    ///
    /// # Errors
    ///
    /// Returns `Serialization` when the text is not an entity array.
    pub fn list_from_json(text: &str) -> Result<Vec<ElementEntity>> {
        Ok(serde_json::from_str(text)?)
    }
}
