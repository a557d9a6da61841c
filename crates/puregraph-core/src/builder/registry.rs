//! Element builder registry
//!
//! Dispatch from an entity's classifier path to the builder for its kind.
//! The core kinds are registered by [`ElementBuilderRegistry::with_core_builders`];
//! plugins add their own kinds through [`ElementBuilderRegistry::register`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::context::LinkContext;
use super::core_builders;
use super::protocol::strip_source_information;
use crate::errors::{GraphError, Result};
use crate::model::{ElementBody, ElementKind, ExtensionElement};

/// Builds the elements of one kind
pub trait ElementBuilder {
    fn kind(&self) -> ElementKind;

    /// Classifier path this builder is registered under
    fn classifier_path(&self) -> &str;

    /// Registration body; an empty skeleton unless the kind has no references
    ///
    /// # Errors
    ///
    /// Implementations that parse here return `InvalidContent`.
    fn first_pass(&self, _path: &str, _content: &Value) -> Result<ElementBody> {
        Ok(ElementBody::skeleton(&self.kind()))
    }

    /// Full body with every reference field linked
    ///
    /// Reference failures go to `ctx`; only content that cannot be read at
    /// all is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidContent` when `content` does not match the protocol.
    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody>;
}

#[derive(Default)]
pub struct ElementBuilderRegistry {
    builders: BTreeMap<String, Box<dyn ElementBuilder>>,
}

impl fmt::Debug for ElementBuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBuilderRegistry")
            .field("classifiers", &self.builders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ElementBuilderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a builder for every core element kind
    pub fn with_core_builders() -> Self {
        let mut registry = Self::new();
        for builder in core_builders::all() {
            registry.insert(builder);
        }
        registry
    }

    /// Add a builder, returning the one it replaces for the same classifier
    ///
    /// # Errors
    ///
    /// Returns `ReservedName` when an extension kind is named after a core
    /// kind label; its elements would be indistinguishable from core ones.
    pub fn register(
        &mut self,
        builder: Box<dyn ElementBuilder>,
    ) -> Result<Option<Box<dyn ElementBuilder>>> {
        if let ElementKind::Extension(name) = builder.kind() {
            if !matches!(name.parse::<ElementKind>(), Ok(ElementKind::Extension(_))) {
                return Err(GraphError::ReservedName {
                    name,
                    path: builder.classifier_path().to_string(),
                });
            }
        }
        Ok(self.insert(builder))
    }

    fn insert(&mut self, builder: Box<dyn ElementBuilder>) -> Option<Box<dyn ElementBuilder>> {
        self.builders
            .insert(builder.classifier_path().to_string(), builder)
    }

    pub fn get(&self, classifier_path: &str) -> Option<&dyn ElementBuilder> {
        self.builders.get(classifier_path).map(|b| b.as_ref())
    }

    /// Registered classifier paths, sorted
    pub fn classifier_paths(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

/// Generic builder for plugin-contributed kinds
///
/// Keeps the protocol content as raw JSON and links the listed top-level
/// fields, each holding a path string or an array of path strings.
#[derive(Debug, Clone)]
pub struct ExtensionElementBuilder {
    kind_name: String,
    classifier_path: String,
    reference_fields: Vec<String>,
}

impl ExtensionElementBuilder {
    pub fn new(kind_name: impl Into<String>, classifier_path: impl Into<String>) -> Self {
        Self {
            kind_name: kind_name.into(),
            classifier_path: classifier_path.into(),
            reference_fields: Vec::new(),
        }
    }

    pub fn with_reference_field(mut self, field: impl Into<String>) -> Self {
        self.reference_fields.push(field.into());
        self
    }
}

impl ElementBuilder for ExtensionElementBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Extension(self.kind_name.clone())
    }

    fn classifier_path(&self) -> &str {
        &self.classifier_path
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let mut content = content.clone();
        strip_source_information(&mut content);
        let Value::Object(mut fields) = content else {
            return Err(GraphError::InvalidContent {
                path: ctx.element_path().to_string(),
                reason: "extension content must be an object".to_string(),
            });
        };
        fields.remove("name");
        fields.remove("package");

        let mut references = Vec::new();
        for field in &self.reference_fields {
            let Some(value) = fields.remove(field) else {
                continue;
            };
            let inputs = match value {
                Value::String(input) => vec![input],
                Value::Array(items) => {
                    let mut inputs = Vec::with_capacity(items.len());
                    for (position, item) in items.into_iter().enumerate() {
                        match item {
                            Value::String(input) => inputs.push(input),
                            other => ctx.invalid(format!(
                                "field '{}' item {} must be an element path, got {}",
                                field, position, other
                            )),
                        }
                    }
                    inputs
                }
                _ => {
                    ctx.invalid(format!("field '{}' must hold element paths", field));
                    continue;
                }
            };
            for input in inputs {
                if let Some(reference) = ctx.resolve(field, &input, &[]) {
                    references.push((field.clone(), reference));
                }
            }
        }

        Ok(ElementBody::Extension(ExtensionElement {
            kind_name: self.kind_name.clone(),
            content: Value::Object(fields),
            references,
        }))
    }
}
