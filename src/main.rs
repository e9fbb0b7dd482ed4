//! Promptforge - build structured AI prompts in the terminal
//!
//! Fill in role, audience, tone, goal, task, style, constraints and extras,
//! start from a preset or a random one, and copy or save the rendered prompt.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::*;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod export;
mod fields;
mod render;
mod session;
mod templates;

use cli::{Cli, Commands, ConfigAction, PresetAction, RenderArgs};
use config::Config;
use export::clipboard::copy_with_status;
use export::{ClipboardSink, DirectoryFileSink, FileSink, SystemClipboard};
use fields::{FieldError, FieldStore};
use session::FormSession;
use templates::PresetCatalogue;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Render(args)) => {
            let config = Config::load().await?;
            let mut clipboard = SystemClipboard::detached();
            handle_render_command(args, config, &mut clipboard).await?;
        }
        Some(Commands::Presets { action }) => {
            handle_presets_command(action);
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action).await?;
        }
        Some(Commands::ServeClipboard) => {
            handle_serve_clipboard()?;
        }
        None => {
            let config = Config::load().await?;
            let file_sink = DirectoryFileSink::new(config.output_dir.clone());
            let mut session = FormSession::new(config, SystemClipboard::new(), file_sink);
            session.run().await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("promptforge=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Resolve the starting field set and apply command-line overrides
async fn resolve_fields(args: &RenderArgs, catalogue: &PresetCatalogue) -> Result<FieldStore> {
    let mut store = FieldStore::new();

    if let Some(ref name) = args.preset {
        store.apply_preset(catalogue.require(name)?);
    } else if args.random {
        let mut rng = rand::thread_rng();
        let preset = store.random_preset(catalogue.list_all(), &mut rng)?;
        eprintln!("🎲 Random preset: {}", preset.name.bright_green());
    } else if let Some(ref path) = args.from {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read field file {}", path.display()))?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(FieldError::from)?;
        store.replace_from_map(entries)?;
    }

    args.fields.apply_to(&mut store);
    Ok(store)
}

/// Handle one-shot render commands
async fn handle_render_command<C: ClipboardSink>(
    args: RenderArgs,
    config: Config,
    clipboard: &mut C,
) -> Result<()> {
    let catalogue = PresetCatalogue::new();
    let store = resolve_fields(&args, &catalogue).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(store.snapshot())?);
        return Ok(());
    }

    let output = render::render(store.snapshot());
    println!("{output}");

    let mut copy_failed = false;
    if args.copy {
        match copy_with_status(clipboard, &output) {
            Ok(status) => eprintln!("✅ {}", status.bright_green()),
            Err(status) => {
                eprintln!("⚠️  {}", status.bright_red());
                copy_failed = true;
            }
        }
    }

    if args.download {
        download_prompt(&args, &config, &output).await?;
    }

    if copy_failed {
        return Err(anyhow!("Clipboard copy failed"));
    }

    Ok(())
}

/// Save the prompt for `render --download`; returns the written path,
/// or `None` when the user declined to overwrite
async fn download_prompt(args: &RenderArgs, config: &Config, output: &str) -> Result<Option<PathBuf>> {
    let dir = args.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let file_name = args.file_name.clone().unwrap_or_else(|| config.file_name.clone());
    let sink = DirectoryFileSink::new(dir);

    let target = sink.target(&file_name);
    if target.exists() && !args.force && config.confirm_overwrite {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", target.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            eprintln!("❌ Download cancelled");
            return Ok(None);
        }
    }

    let path = sink.save(output, &file_name).await?;
    eprintln!(
        "💾 Prompt saved to {} ({})",
        path.display().to_string().bright_green(),
        export::CONTENT_TYPE
    );
    Ok(Some(path))
}

/// Background half of `render --copy`: own the clipboard until replaced
fn handle_serve_clipboard() -> Result<()> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read clipboard contents from stdin")?;
    export::clipboard::serve_until_replaced(text)?;
    Ok(())
}

/// Handle preset catalogue commands
fn handle_presets_command(action: PresetAction) {
    let catalogue = PresetCatalogue::new();

    match action {
        PresetAction::List => session::display_presets(&catalogue),
        PresetAction::Show { name } => match catalogue.get(&name) {
            Some(preset) => {
                println!("📄 Preset: {}", preset.name.bright_green().bold());
                println!("Slug: {}", preset.slug().bright_cyan());
                println!();
                println!("{}", "─".repeat(60).bright_black());
                println!("{}", render::render(&preset.fields));
                println!("{}", "─".repeat(60).bright_black());
            }
            None => {
                println!("❌ Preset '{name}' not found");
                println!("Available: {}", catalogue.names().join(", "));
            }
        },
    }
}

/// Handle configuration commands
async fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => Config::load().await?.display(),
        ConfigAction::Reset => {
            // works even when the current file no longer parses
            let mut config = Config::default();
            config.reset().await?;
            println!("✅ Configuration reset successfully!");
        }
        ConfigAction::SetOutputDir { dir } => {
            let mut config = Config::load().await?;
            config.set_output_dir(dir).await?;
            println!(
                "✅ Output directory set to {}",
                config.output_dir.display().to_string().bright_green()
            );
        }
    }

    Ok(())
}
