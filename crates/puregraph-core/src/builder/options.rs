use serde::{Deserialize, Serialize};

/// Knobs for a graph build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Unqualified references inside a section must resolve through the
    /// section's imports; no global suffix fallback
    pub strict_section_resolution: bool,
    /// Install the built-in primitive types before building
    pub include_core_model: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            strict_section_resolution: false,
            include_core_model: true,
        }
    }
}
