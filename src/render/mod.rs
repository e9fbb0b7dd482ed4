//! Prompt rendering
//!
//! Turns a `FieldSet` into the final prompt text. Rendering is pure: the same
//! field set always yields the same bytes.

use crate::fields::{Field, FieldSet};

/// Fallback phrase used when a field is left blank
pub fn default_for(field: Field) -> &'static str {
    match field {
        Field::Role => "an AI assistant",
        Field::Audience => "general users",
        Field::Tone => "neutral",
        Field::Goal => "help the user",
        Field::Task => "Answer the query clearly.",
        Field::Style => "Use simple language.",
        Field::Constraints => "Stay factual and concise.",
        Field::Extras => "N/A",
    }
}

/// The stored value, or the field's default when blank
pub fn resolve(fields: &FieldSet, field: Field) -> &str {
    let value = fields.get(field);
    if value.trim().is_empty() {
        default_for(field)
    } else {
        value
    }
}

/// Render a field set into the prompt template
pub fn render(fields: &FieldSet) -> String {
    let v = |field| resolve(fields, field);

    let prompt = format!(
        "You are: {role}.\n\
         Audience: {audience}.\n\
         Tone: {tone}.\n\
         Goal: {goal}.\n\
         \n\
         Task:\n\
         - {task}\n\
         \n\
         Constraints:\n\
         - {constraints}\n\
         \n\
         Style & Format:\n\
         - {style}\n\
         \n\
         Extras:\n\
         - {extras}",
        role = v(Field::Role),
        audience = v(Field::Audience),
        tone = v(Field::Tone),
        goal = v(Field::Goal),
        task = v(Field::Task),
        constraints = v(Field::Constraints),
        style = v(Field::Style),
        extras = v(Field::Extras),
    );

    prompt.trim().to_string()
}
