//! Prompt preset management module
//!
//! Presets are named, immutable field sets that seed the form in one step.

use crate::fields::{FieldError, FieldSet};

pub mod builtin;

pub use builtin::get_builtin_presets;

/// A named, complete field set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Display name
    pub name: String,
    /// The field values this preset applies
    pub fields: FieldSet,
}

impl Preset {
    pub fn new(name: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Lower-case, hyphen-separated form of the name ("Bug Fix" -> "bug-fix")
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Check if the preset answers to `query` by name or slug
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.slug() == slugify(query)
    }
}

/// Catalogue of the presets available to a session
pub struct PresetCatalogue {
    presets: Vec<Preset>,
}

impl Default for PresetCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetCatalogue {
    /// Create a catalogue holding the built-in presets
    pub fn new() -> Self {
        Self {
            presets: get_builtin_presets(),
        }
    }

    pub fn list_all(&self) -> &[Preset] {
        &self.presets
    }

    /// Get a preset by name or slug
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.matches_name(name))
    }

    pub fn require(&self, name: &str) -> Result<&Preset, FieldError> {
        self.get(name)
            .ok_or_else(|| FieldError::UnknownPreset(name.trim().to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_preset_names() {
        let catalogue = PresetCatalogue::new();
        assert_eq!(catalogue.names(), vec!["Bug Fix", "Lesson Plan", "Marketing Copy"]);
    }

    #[test]
    fn test_lookup_by_name_and_slug() {
        let catalogue = PresetCatalogue::new();
        assert_eq!(catalogue.get("Bug Fix").unwrap().fields.role, "Senior software engineer");
        assert_eq!(catalogue.get("bug fix").unwrap().name, "Bug Fix");
        assert_eq!(catalogue.get("lesson-plan").unwrap().name, "Lesson Plan");
        assert_eq!(catalogue.get("marketing_copy").unwrap().name, "Marketing Copy");
        assert!(catalogue.get("haiku").is_none());
    }

    #[test]
    fn test_require_unknown_preset() {
        let catalogue = PresetCatalogue::new();
        let err = catalogue.require("haiku").unwrap_err();
        assert_eq!(err.to_string(), "unknown preset 'haiku'");
    }

    #[test]
    fn test_presets_are_complete() {
        for preset in get_builtin_presets() {
            assert!(
                preset.fields.iter().all(|(_, value)| !value.is_empty()),
                "preset {} has an empty field",
                preset.name
            );
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Bug Fix"), "bug-fix");
        assert_eq!(slugify("  Marketing   Copy "), "marketing-copy");
        assert_eq!(slugify("lesson_plan"), "lesson-plan");
    }
}
