//! CLI module for command-line argument parsing and command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::fields::{Field, FieldStore};

#[derive(Parser)]
#[command(name = "promptforge")]
#[command(about = "Build structured AI prompts from a handful of labeled fields")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging (RUST_LOG is honored otherwise)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommands; without one an interactive form session starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a prompt once and print, copy or save it
    Render(RenderArgs),
    /// Preset catalogue
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Serve clipboard contents from stdin until they are replaced
    #[command(name = "__serve-clipboard", hide = true)]
    ServeClipboard,
}

/// Field values given on the command line
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Who the assistant should be
    #[arg(long)]
    pub role: Option<String>,
    /// Who the answer is for
    #[arg(long)]
    pub audience: Option<String>,
    /// Voice of the answer
    #[arg(long)]
    pub tone: Option<String>,
    /// What the answer should achieve
    #[arg(long)]
    pub goal: Option<String>,
    /// The concrete task
    #[arg(long)]
    pub task: Option<String>,
    /// Style and format requirements
    #[arg(long)]
    pub style: Option<String>,
    /// Hard constraints
    #[arg(long)]
    pub constraints: Option<String>,
    /// Anything else
    #[arg(long)]
    pub extras: Option<String>,
}

impl FieldArgs {
    /// Fields that were given, in canonical order
    pub fn given(&self) -> Vec<(Field, &str)> {
        let values = [
            (Field::Role, &self.role),
            (Field::Audience, &self.audience),
            (Field::Tone, &self.tone),
            (Field::Goal, &self.goal),
            (Field::Task, &self.task),
            (Field::Style, &self.style),
            (Field::Constraints, &self.constraints),
            (Field::Extras, &self.extras),
        ];
        values
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
            .collect()
    }

    /// Write every given field into the store
    pub fn apply_to(&self, store: &mut FieldStore) {
        for (field, value) in self.given() {
            store.set(field, value);
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Start from a preset (name or slug, e.g. "Bug Fix" or bug-fix)
    #[arg(short, long, conflicts_with_all = ["random", "from"])]
    pub preset: Option<String>,

    /// Start from a randomly chosen preset
    #[arg(short, long)]
    pub random: bool,

    /// Start from a JSON file of field values
    #[arg(short, long, conflicts_with = "random")]
    pub from: Option<PathBuf>,

    /// Copy the prompt to the clipboard
    #[arg(short, long)]
    pub copy: bool,

    /// Save the prompt to a file in the output directory
    #[arg(short, long)]
    pub download: bool,

    /// Output directory for --download (overrides config)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// File name for --download (overrides config)
    #[arg(long)]
    pub file_name: Option<String>,

    /// Overwrite an existing file without asking
    #[arg(long)]
    pub force: bool,

    /// Print the resolved field values as JSON instead of the prompt
    #[arg(long, conflicts_with_all = ["copy", "download"])]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// List all presets
    List,
    /// Show a preset and the prompt it renders
    Show {
        /// Preset name or slug
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Reset configuration to defaults
    Reset,
    /// Set the directory downloaded prompts are written to
    SetOutputDir {
        /// Target directory
        dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_flags_parse() {
        let cli = Cli::parse_from([
            "promptforge",
            "render",
            "--preset",
            "Bug Fix",
            "--role",
            "Staff engineer",
            "--copy",
        ]);
        let Some(Commands::Render(args)) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.preset.as_deref(), Some("Bug Fix"));
        assert!(args.copy);
        assert_eq!(args.fields.given(), vec![(Field::Role, "Staff engineer")]);
    }

    #[test]
    fn test_preset_conflicts_with_random() {
        let result = Cli::try_parse_from(["promptforge", "render", "--preset", "Bug Fix", "--random"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_conflicts_with_exports() {
        for flag in ["--copy", "--download"] {
            let result = Cli::try_parse_from(["promptforge", "render", "--json", flag]);
            assert!(result.is_err(), "--json with {flag} should be rejected");
        }
        assert!(Cli::try_parse_from(["promptforge", "render", "--json"]).is_ok());
    }

    #[test]
    fn test_clipboard_server_command_is_hidden() {
        let cli = Cli::parse_from(["promptforge", crate::export::clipboard::SERVE_CLIPBOARD_COMMAND]);
        assert!(matches!(cli.command, Some(Commands::ServeClipboard)));

        let help = Cli::command().render_help().to_string();
        assert!(!help.contains("__serve-clipboard"));
    }

    #[test]
    fn test_field_args_apply_verbatim() {
        let args = FieldArgs {
            tone: Some("  calm  ".to_string()),
            ..Default::default()
        };
        let mut store = FieldStore::new();
        args.apply_to(&mut store);
        assert_eq!(store.get(Field::Tone), "  calm  ");
        assert_eq!(store.get(Field::Role), "");
    }
}
