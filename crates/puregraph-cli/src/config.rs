//! CLI settings
//!
//! ```toml
//! log_profile = "production"
//!
//! [builder]
//! strict_section_resolution = true
//! include_core_model = true
//! ```

use std::path::Path;

use puregraph_core::logging_facility::Profile;
use puregraph_core::BuilderOptions;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(deserialize_with = "profile_from_str")]
    pub log_profile: Profile,
    pub builder: BuilderOptions,
}

fn profile_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Profile, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl Settings {
    /// Read settings from `path`, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("can't read config {}: {}", path.display(), e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(text)?)
    }
}
