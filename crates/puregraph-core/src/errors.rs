use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Path/namespace
    InvalidPath,
    ReservedName,
    DuplicatePath,
    NotFound,
    WrongKind,

    // Build
    UnknownElementKind,
    UnresolvedReference,
    AmbiguousReference,
    InvalidContent,
    BuildFailed,

    // Integration/IO
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::ReservedName => "ERR_RESERVED_NAME",
            ExErrorKind::DuplicatePath => "ERR_DUPLICATE_PATH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::WrongKind => "ERR_WRONG_KIND",
            ExErrorKind::UnknownElementKind => "ERR_UNKNOWN_ELEMENT_KIND",
            ExErrorKind::UnresolvedReference => "ERR_UNRESOLVED_REFERENCE",
            ExErrorKind::AmbiguousReference => "ERR_AMBIGUOUS_REFERENCE",
            ExErrorKind::InvalidContent => "ERR_INVALID_CONTENT",
            ExErrorKind::BuildFailed => "ERR_BUILD_FAILED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus the element path and reference field that
/// the failure was observed on, so a caller can present every problem of a
/// failed build with full context.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    element_path: Option<String>,
    field: Option<String>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            element_path: None,
            field: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add element path context
    pub fn with_element_path(mut self, path: impl Into<String>) -> Self {
        self.element_path = Some(path.into());
        self
    }

    /// Add reference field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add candidate paths (used for AmbiguousReference)
    pub fn with_candidates(mut self, paths: Vec<String>) -> Self {
        self.candidates = Some(paths);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the element path context, if any
    pub fn element_path(&self) -> Option<&str> {
        self.element_path.as_deref()
    }

    /// Get the reference field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get candidate paths, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.element_path {
            write!(f, " (element: {})", path)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for graph construction and queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    // ===== Path Errors =====
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Can't use reserved name '{name}' in path '{path}'")]
    ReservedName { name: String, path: String },

    // ===== Structural Errors =====
    /// Two elements claim the same full path. `entities` holds the input
    /// positions of the clashing entities when raised during a build.
    #[error("Duplicate element path: {path}")]
    DuplicatePath { path: String, entities: Vec<usize> },

    #[error("Can't find element '{segment}' in path '{path}'")]
    ElementNotFound { segment: String, path: String },

    #[error("Element '{path}' is a {actual}, expected {expected}")]
    WrongElementKind {
        path: String,
        expected: String,
        actual: String,
    },

    // ===== Build Errors =====
    #[error("No element builder registered for classifier '{classifier_path}' (element '{path}')")]
    UnknownElementKind {
        classifier_path: String,
        path: String,
    },

    #[error("Can't resolve reference '{reference}' in field '{field}' of element '{element}'")]
    UnresolvedReference {
        reference: String,
        element: String,
        field: String,
    },

    #[error("Reference '{reference}' in element '{element}' is ambiguous: {candidates:?}")]
    AmbiguousReference {
        reference: String,
        element: String,
        candidates: Vec<String>,
    },

    #[error("Invalid content for element '{path}': {reason}")]
    InvalidContent { path: String, reason: String },

    #[error("Graph build did not succeed ({error_count} error(s))")]
    BuildFailed { error_count: usize },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GraphError {
    /// Whether this error aborts the registration pass
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GraphError::InvalidPath { .. }
                | GraphError::ReservedName { .. }
                | GraphError::DuplicatePath { .. }
                | GraphError::UnknownElementKind { .. }
        )
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<GraphError> for ExError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidPath { path, reason } => ExError::new(ExErrorKind::InvalidPath)
                .with_element_path(path)
                .with_message(reason),

            GraphError::ReservedName { name, path } => ExError::new(ExErrorKind::ReservedName)
                .with_element_path(path)
                .with_message(format!("Reserved name '{}'", name)),

            GraphError::DuplicatePath { path, entities } => {
                ExError::new(ExErrorKind::DuplicatePath)
                    .with_element_path(path)
                    .with_message(format!("Duplicate element path (entities {:?})", entities))
            }

            GraphError::ElementNotFound { segment, path } => ExError::new(ExErrorKind::NotFound)
                .with_element_path(path)
                .with_message(format!("Can't find element '{}'", segment)),

            GraphError::WrongElementKind {
                path,
                expected,
                actual,
            } => ExError::new(ExErrorKind::WrongKind)
                .with_element_path(path)
                .with_message(format!("Expected {}, found {}", expected, actual)),

            GraphError::UnknownElementKind {
                classifier_path,
                path,
            } => ExError::new(ExErrorKind::UnknownElementKind)
                .with_op("register_element")
                .with_element_path(path)
                .with_message(format!("Unknown classifier '{}'", classifier_path)),

            GraphError::UnresolvedReference {
                reference,
                element,
                field,
            } => ExError::new(ExErrorKind::UnresolvedReference)
                .with_op("link_element")
                .with_element_path(element)
                .with_field(field)
                .with_message(format!("Can't resolve '{}'", reference)),

            GraphError::AmbiguousReference {
                reference,
                element,
                candidates,
            } => ExError::new(ExErrorKind::AmbiguousReference)
                .with_op("link_element")
                .with_element_path(element)
                .with_message(format!("Reference '{}' is ambiguous", reference))
                .with_candidates(candidates),

            GraphError::InvalidContent { path, reason } => {
                ExError::new(ExErrorKind::InvalidContent)
                    .with_element_path(path)
                    .with_message(reason)
            }

            GraphError::BuildFailed { error_count } => ExError::new(ExErrorKind::BuildFailed)
                .with_message(format!("Build failed with {} error(s)", error_count)),

            GraphError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            GraphError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let dup = GraphError::DuplicatePath {
            path: "model::Foo".to_string(),
            entities: vec![0, 1],
        };
        assert!(dup.is_fatal());

        let unresolved = GraphError::UnresolvedReference {
            reference: "model::Missing".to_string(),
            element: "model::Foo".to_string(),
            field: "generalizations".to_string(),
        };
        assert!(!unresolved.is_fatal());
    }

    #[test]
    fn test_display_includes_context() {
        let err: ExError = GraphError::UnresolvedReference {
            reference: "Missing".to_string(),
            element: "model::Foo".to_string(),
            field: "properties.bar".to_string(),
        }
        .into();

        let text = err.to_string();
        assert!(text.starts_with("[ERR_UNRESOLVED_REFERENCE]"));
        assert!(text.contains("model::Foo"));
        assert!(text.contains("properties.bar"));
    }
}
