//! Prompt field model
//!
//! Defines the eight named prompt fields, the always-complete `FieldSet`
//! record and the mutable `FieldStore` that an editing session owns.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::templates::Preset;

/// Errors raised while addressing or loading fields
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown field '{0}' (expected one of: {list})", list = Field::names().join(", "))]
    UnknownField(String),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("no presets available")]
    NoPresets,
    #[error("invalid field file: {0}")]
    InvalidFieldFile(#[from] serde_json::Error),
}

/// One of the eight prompt fields, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Role,
    Audience,
    Tone,
    Goal,
    Task,
    Style,
    Constraints,
    Extras,
}

impl Field {
    /// All fields in canonical order
    pub const ALL: [Field; 8] = [
        Field::Role,
        Field::Audience,
        Field::Tone,
        Field::Goal,
        Field::Task,
        Field::Style,
        Field::Constraints,
        Field::Extras,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Role => "role",
            Field::Audience => "audience",
            Field::Tone => "tone",
            Field::Goal => "goal",
            Field::Task => "task",
            Field::Style => "style",
            Field::Constraints => "constraints",
            Field::Extras => "extras",
        }
    }

    /// Capitalized label used by the form display
    pub fn label(&self) -> &'static str {
        match self {
            Field::Role => "Role",
            Field::Audience => "Audience",
            Field::Tone => "Tone",
            Field::Goal => "Goal",
            Field::Task => "Task",
            Field::Style => "Style",
            Field::Constraints => "Constraints",
            Field::Extras => "Extras",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Field::as_str).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| FieldError::UnknownField(s.trim().to_string()))
    }
}

/// A complete set of field values.
///
/// Every field is always present; an empty string means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    pub role: String,
    pub audience: String,
    pub tone: String,
    pub goal: String,
    pub task: String,
    pub style: String,
    pub constraints: String,
    pub extras: String,
}

impl FieldSet {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Role => &self.role,
            Field::Audience => &self.audience,
            Field::Tone => &self.tone,
            Field::Goal => &self.goal,
            Field::Task => &self.task,
            Field::Style => &self.style,
            Field::Constraints => &self.constraints,
            Field::Extras => &self.extras,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Role => &mut self.role,
            Field::Audience => &mut self.audience,
            Field::Tone => &mut self.tone,
            Field::Goal => &mut self.goal,
            Field::Task => &mut self.task,
            Field::Style => &mut self.style,
            Field::Constraints => &mut self.constraints,
            Field::Extras => &mut self.extras,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Iterate `(field, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Build a set from string keys. Unknown keys fail the whole build.
    pub fn from_map<K, V, I>(entries: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::default();
        for (key, value) in entries {
            let field: Field = key.as_ref().parse()?;
            set.set(field, value);
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, value)| value.is_empty())
    }
}

/// The mutable field state owned by one editing session
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    fields: FieldSet,
}

impl FieldStore {
    /// Create a store with every field empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a single field by name. The value is stored verbatim.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<Field, FieldError> {
        let field: Field = name.parse()?;
        self.fields.set(field, value);
        tracing::debug!(field = field.as_str(), "field updated");
        Ok(field)
    }

    /// Read a single field by name
    pub fn field(&self, name: &str) -> Result<&str, FieldError> {
        let field: Field = name.parse()?;
        Ok(self.fields.get(field))
    }

    pub fn get(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    /// Swap in a complete field set
    pub fn replace_all(&mut self, fields: FieldSet) {
        self.fields = fields;
        tracing::debug!("all fields replaced");
    }

    /// Replace all fields from string keys; missing keys become empty.
    /// On an unknown key the store is left untouched.
    pub fn replace_from_map<K, V, I>(&mut self, entries: I) -> Result<(), FieldError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = FieldSet::from_map(entries)?;
        self.replace_all(fields);
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        tracing::debug!(preset = %preset.name, "applying preset");
        self.replace_all(preset.fields.clone());
    }

    /// Apply a preset chosen uniformly at random from `presets`
    pub fn random_preset<'a, R: Rng + ?Sized>(
        &mut self,
        presets: &'a [Preset],
        rng: &mut R,
    ) -> Result<&'a Preset, FieldError> {
        let preset = presets.choose(rng).ok_or(FieldError::NoPresets)?;
        self.apply_preset(preset);
        Ok(preset)
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        self.fields = FieldSet::default();
    }

    pub fn snapshot(&self) -> &FieldSet {
        &self.fields
    }
}
