//! Built-in prompt presets
//!
//! One-click starting points covering common prompt shapes.

use super::Preset;
use crate::fields::FieldSet;

/// Get all built-in presets, in display order
pub fn get_builtin_presets() -> Vec<Preset> {
    vec![bug_fix(), lesson_plan(), marketing_copy()]
}

/// Debugging a production issue
fn bug_fix() -> Preset {
    Preset::new(
        "Bug Fix",
        FieldSet {
            role: "Senior software engineer".to_string(),
            audience: "Intermediate developers".to_string(),
            tone: "Direct and practical".to_string(),
            goal: "Identify root cause and propose a fix".to_string(),
            task: "Analyze error logs and propose patch".to_string(),
            style: "Bulleted steps with code blocks".to_string(),
            constraints: "No speculation; cite code lines".to_string(),
            extras: "Target file: UserRepo.js".to_string(),
        },
    )
}

/// Classroom lesson planning
fn lesson_plan() -> Preset {
    Preset::new(
        "Lesson Plan",
        FieldSet {
            role: "Teacher".to_string(),
            audience: "High school students".to_string(),
            tone: "Friendly and encouraging".to_string(),
            goal: "Teach the concept clearly".to_string(),
            task: "Create a 45-minute lesson plan".to_string(),
            style: "Outline with numbered steps".to_string(),
            constraints: "Use real-world examples".to_string(),
            extras: "Topic: Photosynthesis".to_string(),
        },
    )
}

/// Short-form marketing copy
fn marketing_copy() -> Preset {
    Preset::new(
        "Marketing Copy",
        FieldSet {
            role: "Copywriter".to_string(),
            audience: "Busy professionals".to_string(),
            tone: "Persuasive and upbeat".to_string(),
            goal: "Increase click-through rate".to_string(),
            task: "Write 5 headlines + 3 CTAs".to_string(),
            style: "Punchy, active voice".to_string(),
            constraints: "Max 12 words per headline".to_string(),
            extras: "Product: Habit-tracking app".to_string(),
        },
    )
}
