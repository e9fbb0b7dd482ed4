//! Interactive form session
//!
//! A line-editor loop over one `FieldStore`: every edit re-renders the prompt,
//! and the result can be copied or saved at any point.

use crate::config::Config;
use crate::export::clipboard::copy_with_status;
use crate::export::{ClipboardSink, FileSink, CONTENT_TYPE};
use crate::fields::{Field, FieldStore};
use crate::render::{self, render};
use crate::templates::PresetCatalogue;
use anyhow::{anyhow, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Help,
    Fields,
    Set { field: String, value: String },
    Get { field: String },
    Unset { field: String },
    Preset { name: Option<String> },
    Presets,
    Random,
    Clear,
    Show,
    Copy,
    Download { file_name: Option<String> },
    Exit,
    Empty,
}

/// Parse one input line into a command
///
/// `field: value` is accepted as shorthand for `/set field value`. Values are
/// kept as typed after the separating whitespace, trailing spaces included.
pub fn parse_command(input: &str) -> Result<FormCommand> {
    let line = input.trim_start();
    let trimmed = line.trim_end();
    if trimmed.is_empty() {
        return Ok(FormCommand::Empty);
    }
    if trimmed == "exit" || trimmed == "quit" {
        return Ok(FormCommand::Exit);
    }

    if !line.starts_with('/') {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().parse::<Field>().is_ok() {
                return Ok(FormCommand::Set {
                    field: key.trim().to_string(),
                    value: value.trim_start().to_string(),
                });
            }
        }
        return Err(anyhow!(
            "Unrecognized input. Use '<field>: <value>' or /help for commands"
        ));
    }

    let (cmd, raw_args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args = raw_args.trim();

    let command = match cmd {
        "/help" => FormCommand::Help,
        "/fields" => FormCommand::Fields,
        "/set" => {
            let rest = raw_args.trim_start();
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim_start()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(anyhow!("Usage: /set <field> <value>"));
            }
            FormCommand::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "/get" => {
            if args.is_empty() {
                return Err(anyhow!("Usage: /get <field>"));
            }
            FormCommand::Get {
                field: args.to_string(),
            }
        }
        "/unset" => {
            if args.is_empty() {
                return Err(anyhow!("Usage: /unset <field>"));
            }
            FormCommand::Unset {
                field: args.to_string(),
            }
        }
        "/preset" => FormCommand::Preset {
            name: (!args.is_empty()).then(|| args.to_string()),
        },
        "/presets" => FormCommand::Presets,
        "/random" => FormCommand::Random,
        "/clear" => FormCommand::Clear,
        "/show" => FormCommand::Show,
        "/copy" => FormCommand::Copy,
        "/download" => FormCommand::Download {
            file_name: (!args.is_empty()).then(|| args.to_string()),
        },
        _ => {
            return Err(anyhow!(
                "Unknown command: {}. Type /help for available commands",
                cmd
            ))
        }
    };

    Ok(command)
}

/// What the loop should do after a command ran
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    /// Fields changed; show the new prompt
    Rerender,
    Continue,
    Exit,
}

/// One editing session over a field store
pub struct FormSession<C, F> {
    store: FieldStore,
    catalogue: PresetCatalogue,
    clipboard: C,
    file_sink: F,
    config: Config,
}

impl<C: ClipboardSink, F: FileSink> FormSession<C, F> {
    pub fn new(config: Config, clipboard: C, file_sink: F) -> Self {
        Self {
            store: FieldStore::new(),
            catalogue: PresetCatalogue::new(),
            clipboard,
            file_sink,
            config,
        }
    }

    /// The prompt for the current field values
    pub fn output(&self) -> String {
        render(self.store.snapshot())
    }

    /// Start interactive form mode
    pub async fn run(&mut self) -> Result<()> {
        self.display_welcome();
        self.display_prompt();

        let mut editor = LineEditor::open()?;

        loop {
            let prompt = format!("\n{} ", "Edit:".bright_blue().bold());
            let Some(line) = editor.read(&prompt)? else {
                println!("👋 Goodbye!");
                break;
            };

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("❌ {e}");
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Exit) => {
                    println!("👋 Goodbye!");
                    break;
                }
                Ok(Flow::Rerender) => self.display_prompt(),
                Ok(Flow::Continue) => {}
                Err(e) => println!("❌ Command error: {e}"),
            }
        }

        Ok(())
    }

    /// Apply one command to the session
    pub async fn execute(&mut self, command: FormCommand) -> Result<Flow> {
        let flow = match command {
            FormCommand::Empty => Flow::Continue,
            FormCommand::Exit => Flow::Exit,
            FormCommand::Help => {
                display_help();
                Flow::Continue
            }
            FormCommand::Fields => {
                self.display_fields();
                Flow::Continue
            }
            FormCommand::Show => Flow::Rerender,
            FormCommand::Set { field, value } => {
                let field = self.store.set_field(&field, value)?;
                println!("✏️  {} updated", field.label().bright_green());
                Flow::Rerender
            }
            FormCommand::Get { field } => {
                let value = self.store.field(&field)?;
                println!("{value}");
                Flow::Continue
            }
            FormCommand::Unset { field } => {
                let field = self.store.set_field(&field, "")?;
                println!("🧹 {} cleared", field.label().bright_green());
                Flow::Rerender
            }
            FormCommand::Preset { name: Some(name) } => {
                let preset = self.catalogue.require(&name)?;
                self.store.apply_preset(preset);
                println!("📝 Applied preset: {}", preset.name.bright_green());
                Flow::Rerender
            }
            FormCommand::Preset { name: None } => {
                let names = self.catalogue.names();
                let selection = dialoguer::Select::new()
                    .with_prompt("Choose a preset")
                    .items(&names)
                    .default(0)
                    .interact_opt()?;
                match selection {
                    Some(index) => {
                        let preset = &self.catalogue.list_all()[index];
                        self.store.apply_preset(preset);
                        println!("📝 Applied preset: {}", preset.name.bright_green());
                        Flow::Rerender
                    }
                    None => Flow::Continue,
                }
            }
            FormCommand::Presets => {
                display_presets(&self.catalogue);
                Flow::Continue
            }
            FormCommand::Random => {
                let mut rng = rand::thread_rng();
                let preset = self
                    .store
                    .random_preset(self.catalogue.list_all(), &mut rng)?;
                println!("🎲 Random preset: {}", preset.name.bright_green());
                Flow::Rerender
            }
            FormCommand::Clear => {
                self.store.clear();
                println!("🗑️  All fields cleared");
                Flow::Rerender
            }
            FormCommand::Copy => {
                let output = self.output();
                match copy_with_status(&mut self.clipboard, &output) {
                    Ok(status) => println!("✅ {}", status.bright_green()),
                    Err(status) => println!("⚠️  {}", status.bright_red()),
                }
                Flow::Continue
            }
            FormCommand::Download { file_name } => {
                let file_name = file_name.unwrap_or_else(|| self.config.file_name.clone());
                self.download(&file_name).await?;
                Flow::Continue
            }
        };

        Ok(flow)
    }

    async fn download(&mut self, file_name: &str) -> Result<()> {
        let target = self.file_sink.target(file_name);
        if self.config.confirm_overwrite && target.exists() {
            let overwrite = dialoguer::Confirm::new()
                .with_prompt(format!("{} exists. Overwrite?", target.display()))
                .default(false)
                .interact()?;
            if !overwrite {
                println!("❌ Download cancelled");
                return Ok(());
            }
        }

        let path = self.file_sink.save(&self.output(), file_name).await?;
        println!(
            "💾 Prompt saved to {} ({})",
            path.display().to_string().bright_green(),
            CONTENT_TYPE
        );
        Ok(())
    }

    /// Display welcome message
    fn display_welcome(&self) {
        println!("{}", "🚀 Promptforge - AI Prompt Generator".bright_cyan().bold());
        println!("Presets: {}", self.catalogue.names().join(", ").bright_yellow());
        println!(
            "Downloads: {}",
            self.config.output_dir.display().to_string().bright_yellow()
        );
        println!("{}", "─".repeat(60).bright_black());
        println!("Type '<field>: <value>' to edit, '/help' for commands, 'exit' to quit");
    }

    /// Display the current field values
    fn display_fields(&self) {
        println!("📋 Fields:");
        for (field, value) in self.store.snapshot().iter() {
            if value.trim().is_empty() {
                println!(
                    "  {:<12} {}",
                    field.label().bright_cyan(),
                    format!("(default: {})", render::default_for(field)).bright_black()
                );
            } else {
                println!("  {:<12} {}", field.label().bright_cyan(), value);
            }
        }
    }

    /// Display the rendered prompt
    fn display_prompt(&self) {
        println!("\n{}", "Generated Prompt:".bright_white().bold());
        println!("{}", "─".repeat(60).bright_black());
        println!("{}", self.output());
        println!("{}", "─".repeat(60).bright_black());

        if self.store.snapshot().is_empty() {
            println!(
                "{}",
                "All fields are empty. Try /preset or /random to start from an example."
                    .bright_black()
            );
        } else if self.config.show_defaults_hint {
            let defaulted = defaulted_fields(&self.store);
            if !defaulted.is_empty() {
                println!(
                    "{}",
                    format!("Using defaults for: {}", defaulted.join(", ")).bright_black()
                );
            }
        }
    }
}

/// Names of fields currently falling back to their defaults
pub fn defaulted_fields(store: &FieldStore) -> Vec<&'static str> {
    store
        .snapshot()
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.as_str())
        .collect()
}

fn display_help() {
    println!("📋 Available commands:");
    println!("  <field>: <value>         - Set a field (e.g. 'role: Teacher')");
    println!("  /set <field> <value>     - Set a field");
    println!("  /get <field>             - Print a field's raw value");
    println!("  /unset <field>           - Clear a field back to its default");
    println!("  /fields                  - Show current field values");
    println!("  (values are stored as typed, trailing spaces included)");
    println!("  /preset [name]           - Apply a preset (menu when no name)");
    println!("  /presets                 - List presets");
    println!("  /random                  - Apply a random preset");
    println!("  /clear                   - Clear all fields");
    println!("  /show                    - Show the generated prompt");
    println!("  /copy                    - Copy the prompt to the clipboard");
    println!("  /download [file]         - Save the prompt to a file");
    println!("  exit | quit              - Leave");
    println!();
    println!("Fields: {}", Field::names().join(", "));
}

/// Print the preset catalogue with every field value
pub fn display_presets(catalogue: &PresetCatalogue) {
    println!("📋 Available Presets:");
    for preset in catalogue.list_all() {
        println!();
        println!(
            "{} {}",
            preset.name.bright_green().bold(),
            format!("({})", preset.slug()).bright_black()
        );
        for (field, value) in preset.fields.iter() {
            println!("  {:<12} {}", field.label().bright_cyan(), value);
        }
    }
}

/// Line editor with a persistent input history
struct LineEditor {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl LineEditor {
    fn open() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|dir| dir.join("promptforge/history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Read one line; `None` on Ctrl-C or Ctrl-D
    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                if let Some(ref path) = self.history_path {
                    let _ = self.editor.save_history(path);
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow!("Failed to read line: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::MemoryClipboard;
    use crate::export::DirectoryFileSink;

    fn session(dir: &std::path::Path) -> FormSession<MemoryClipboard, DirectoryFileSink> {
        let config = Config {
            output_dir: dir.to_path_buf(),
            confirm_overwrite: false,
            ..Config::default()
        };
        FormSession::new(config, MemoryClipboard::default(), DirectoryFileSink::new(dir))
    }

    #[test]
    fn test_parse_shorthand_set() {
        assert_eq!(
            parse_command("role: Teacher").unwrap(),
            FormCommand::Set {
                field: "role".to_string(),
                value: "Teacher".to_string()
            }
        );
        // only the first colon splits
        assert_eq!(
            parse_command("extras: Topic: Photosynthesis").unwrap(),
            FormCommand::Set {
                field: "extras".to_string(),
                value: "Topic: Photosynthesis".to_string()
            }
        );
    }

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(
            parse_command("/set audience Busy professionals").unwrap(),
            FormCommand::Set {
                field: "audience".to_string(),
                value: "Busy professionals".to_string()
            }
        );
        assert_eq!(
            parse_command("/preset Bug Fix").unwrap(),
            FormCommand::Preset {
                name: Some("Bug Fix".to_string())
            }
        );
        assert_eq!(parse_command("/preset").unwrap(), FormCommand::Preset { name: None });
        assert_eq!(parse_command("/random").unwrap(), FormCommand::Random);
        assert_eq!(
            parse_command("/download out.txt").unwrap(),
            FormCommand::Download {
                file_name: Some("out.txt".to_string())
            }
        );
        assert_eq!(parse_command("  ").unwrap(), FormCommand::Empty);
        assert_eq!(parse_command("quit").unwrap(), FormCommand::Exit);
    }

    #[test]
    fn test_parse_keeps_trailing_whitespace_in_values() {
        assert_eq!(
            parse_command("extras: notes   ").unwrap(),
            FormCommand::Set {
                field: "extras".to_string(),
                value: "notes   ".to_string()
            }
        );
        assert_eq!(
            parse_command("/set tone  calm  ").unwrap(),
            FormCommand::Set {
                field: "tone".to_string(),
                value: "calm  ".to_string()
            }
        );
        assert_eq!(
            parse_command("/set role").unwrap(),
            FormCommand::Set {
                field: "role".to_string(),
                value: String::new()
            }
        );
        assert_eq!(parse_command("/help  ").unwrap(), FormCommand::Help);
        assert_eq!(parse_command("  exit  ").unwrap(), FormCommand::Exit);
    }

    #[tokio::test]
    async fn test_shorthand_value_round_trips_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session
            .execute(parse_command("extras: notes   ").unwrap())
            .await
            .unwrap();
        assert_eq!(session.store.get(Field::Extras), "notes   ");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_command("/frobnicate").is_err());
        assert!(parse_command("hello there").is_err());
        assert!(parse_command("mood: happy").is_err());
        assert!(parse_command("/unset").is_err());
    }

    #[tokio::test]
    async fn test_set_and_render_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        for line in ["role: Teacher", "audience: High school students"] {
            let flow = session.execute(parse_command(line).unwrap()).await.unwrap();
            assert_eq!(flow, Flow::Rerender);
        }

        let output = session.output();
        assert!(output.contains("Tone: neutral."));
        assert!(output.contains("Goal: help the user."));
        assert_eq!(
            defaulted_fields(&session.store),
            vec!["tone", "goal", "task", "style", "constraints", "extras"]
        );
    }

    #[tokio::test]
    async fn test_unknown_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let command = FormCommand::Set {
            field: "mood".to_string(),
            value: "happy".to_string(),
        };
        assert!(session.execute(command).await.is_err());
    }

    #[tokio::test]
    async fn test_preset_then_unset() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());

        session
            .execute(parse_command("/preset lesson-plan").unwrap())
            .await
            .unwrap();
        assert!(session.output().contains("You are: Teacher."));

        session.execute(parse_command("/unset role").unwrap()).await.unwrap();
        assert!(session.output().contains("You are: an AI assistant."));
        assert!(session.output().contains("Audience: High school students."));
    }

    #[tokio::test]
    async fn test_random_applies_a_known_preset() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.execute(FormCommand::Random).await.unwrap();

        let catalogue = PresetCatalogue::new();
        assert!(catalogue
            .list_all()
            .iter()
            .any(|p| &p.fields == session.store.snapshot()));
    }

    #[tokio::test]
    async fn test_copy_uses_clipboard_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.execute(FormCommand::Copy).await.unwrap();
        assert_eq!(session.clipboard.contents.as_deref(), Some(session.output().as_str()));
    }

    #[tokio::test]
    async fn test_copy_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session.clipboard.fail = true;
        let flow = session.execute(FormCommand::Copy).await.unwrap();
        assert_eq!(flow, Flow::Continue);
    }

    #[tokio::test]
    async fn test_download_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        session
            .execute(parse_command("/preset Marketing Copy").unwrap())
            .await
            .unwrap();
        session
            .execute(FormCommand::Download { file_name: None })
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("ai-prompt.txt")).unwrap();
        assert_eq!(written, session.output());
    }
}
