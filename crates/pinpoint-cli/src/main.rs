//! Pinpoint CLI - visual UI feedback for AI coding assistants
//!
//! Usage:
//!   pinpoint init                              Create .pinpoint/config.toml
//!   pinpoint capture <snapshot> <sel> --note   Annotate an element in a page snapshot
//!   pinpoint inspect <snapshot> <sel>          Print the captured element context
//!   pinpoint list <url>                        List annotations for a page
//!   pinpoint export <url>                      Print the prompt for a page
//!   pinpoint history                           Show exported prompts

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pinpoint_capture::{normalize_note, truncate_selector, validate, PickerSession};
use pinpoint_core::{Annotation, ElementContext, PinpointConfig};
use pinpoint_dom::{Document, PageSnapshot};
use pinpoint_service::{Message, Response, Router};
use pinpoint_storage::AnnotationStore;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Width of the selector column in listings
const SELECTOR_DISPLAY_WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(author, version, about = "Visual UI feedback for AI coding assistants")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding .pinpoint/ (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init,

    /// Annotate the element matching a selector in a page snapshot
    Capture {
        /// Page snapshot JSON file
        snapshot: PathBuf,

        /// CSS selector locating the element
        selector: String,

        /// Feedback for the element
        #[arg(short, long)]
        note: String,
    },

    /// Print the context that would be captured for an element
    Inspect {
        /// Page snapshot JSON file
        snapshot: PathBuf,

        /// CSS selector locating the element
        selector: String,
    },

    /// List annotations for a page
    List { url: String },

    /// Count annotations for a page
    Count { url: String },

    /// Delete one annotation
    Delete { url: String, id: String },

    /// Delete every annotation for a page
    Clear { url: String },

    /// Generate the prompt for a page and record it in history
    Export { url: String },

    /// Show exported prompts, newest first
    History {
        /// Only prompts for this page
        #[arg(long)]
        url: Option<String>,

        /// Print the full prompt text of each entry
        #[arg(long)]
        full: bool,
    },

    /// Delete all history entries
    HistoryClear,

    /// Delete one history entry
    HistoryDelete { id: String },

    /// Toggle the picker state
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Init = cli.command {
        return cmd_init(&cli.data_dir);
    }

    let config = PinpointConfig::load_or_default(&cli.data_dir)
        .context("Failed to load .pinpoint/config.toml")?;
    let router = Router::new(
        AnnotationStore::from_config(&config, &cli.data_dir),
        config.prompt.clone(),
    );

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Capture {
            snapshot,
            selector,
            note,
        } => cmd_capture(&router, &config, &snapshot, &selector, &note).await,
        Commands::Inspect { snapshot, selector } => {
            cmd_inspect(&config, &snapshot, &selector).await
        }
        Commands::List { url } => cmd_list(&router, url).await,
        Commands::Count { url } => {
            match router.handle(Message::GetAnnotationCount { url }, "").await {
                Response::Count { count } => println!("{}", count),
                other => return unexpected(other),
            }
            Ok(())
        }
        Commands::Delete { url, id } => {
            match router
                .handle(Message::DeleteAnnotation { id: id.clone() }, &url)
                .await
            {
                Response::Success { success: true } => println!("Deleted {}", id),
                Response::Success { success: false } => bail!("No annotation {} for {}", id, url),
                other => return unexpected(other),
            }
            Ok(())
        }
        Commands::Clear { url } => {
            match router
                .handle(Message::ClearAnnotations { url: url.clone() }, "")
                .await
            {
                Response::Success { .. } => println!("Cleared annotations for {}", url),
                other => return unexpected(other),
            }
            Ok(())
        }
        Commands::Export { url } => cmd_export(&router, url).await,
        Commands::History { url, full } => cmd_history(router.store(), url, full).await,
        Commands::HistoryClear => {
            router.store().clear_history().await?;
            println!("Cleared history");
            Ok(())
        }
        Commands::HistoryDelete { id } => {
            if !router.store().delete_history_entry(&id).await? {
                bail!("No history entry {}", id);
            }
            println!("Deleted history entry {}", id);
            Ok(())
        }
        Commands::Toggle => {
            match router.handle(Message::TogglePicker, "").await {
                Response::Active { active } => {
                    println!("Picker {}", if active { "on" } else { "off" })
                }
                other => return unexpected(other),
            }
            Ok(())
        }
    }
}

fn cmd_init(data_dir: &Path) -> Result<()> {
    let config_path = PinpointConfig::path(data_dir);
    if config_path.exists() {
        println!("Already initialized: {:?}", config_path);
        return Ok(());
    }

    PinpointConfig::write_default(data_dir).context("Failed to write config")?;
    info!("Initialized Pinpoint in {:?}", data_dir);

    println!("Initialized Pinpoint in {:?}", data_dir);
    println!("Created:");
    println!("  .pinpoint/config.toml");
    Ok(())
}

async fn load_snapshot(path: &Path) -> Result<(PageSnapshot, Document)> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {:?}", path))?;
    let snapshot = PageSnapshot::from_json(&content).context("Failed to parse snapshot")?;
    let doc = Document::from_snapshot(&snapshot).context("Failed to build document")?;
    Ok((snapshot, doc))
}

/// Locate `selector` in the snapshot and pick it like a click would
async fn pick(
    config: &PinpointConfig,
    snapshot_path: &Path,
    selector: &str,
) -> Result<(PageSnapshot, ElementContext)> {
    let (snapshot, mut doc) = load_snapshot(snapshot_path).await?;
    let Some(node) = doc.query_selector(selector)? else {
        bail!("No element matches {:?}", selector);
    };

    let mut session = PickerSession::new(config);
    let Some(context) = session.click(&mut doc, node)? else {
        bail!("{:?} is part of Pinpoint's own UI", selector);
    };
    session.end(&mut doc)?;

    if !validate(&doc, &context.selector, node) {
        warn!("Synthesized selector {} does not resolve back to the element", context.selector);
    }
    Ok((snapshot, context))
}

async fn cmd_capture(
    router: &Router,
    config: &PinpointConfig,
    snapshot: &Path,
    selector: &str,
    note: &str,
) -> Result<()> {
    let Some(note) = normalize_note(note) else {
        bail!("Feedback note is empty");
    };
    let (snapshot, context) = pick(config, snapshot, selector).await?;

    let annotation = Annotation::new(note, context);
    let id = annotation.id.clone();
    let label = annotation.context.display_label().to_string();
    let element_selector = annotation.context.selector.clone();

    match router
        .handle(Message::SaveAnnotation(annotation), &snapshot.url)
        .await
    {
        Response::Success { success: true } => {}
        other => return unexpected(other),
    }

    println!("Saved annotation {}", id);
    println!("  Page:     {}", snapshot.url);
    println!("  Element:  {}", label);
    println!("  Selector: {}", element_selector);
    Ok(())
}

async fn cmd_inspect(config: &PinpointConfig, snapshot: &Path, selector: &str) -> Result<()> {
    let (_, context) = pick(config, snapshot, selector).await?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

async fn cmd_list(router: &Router, url: String) -> Result<()> {
    let annotations = match router
        .handle(Message::GetAnnotations { url: url.clone() }, "")
        .await
    {
        Response::Annotations { annotations } => annotations,
        other => return unexpected(other),
    };

    if annotations.is_empty() {
        println!("No annotations for {}", url);
        return Ok(());
    }

    println!("Annotations for {} ({})", url, annotations.len());
    println!("{}", "=".repeat(40));
    for (index, annotation) in annotations.iter().enumerate() {
        println!(
            "{}. {} [{}]",
            index + 1,
            annotation.context.display_label(),
            annotation.id
        );
        println!(
            "   {}",
            truncate_selector(&annotation.context.selector, SELECTOR_DISPLAY_WIDTH)
        );
        println!("   {}", annotation.note);
    }
    Ok(())
}

async fn cmd_export(router: &Router, url: String) -> Result<()> {
    match router.handle(Message::ExportAnnotations { url }, "").await {
        Response::Prompt {
            prompt: Some(prompt),
            ..
        } => {
            print!("{}", prompt);
            Ok(())
        }
        other => unexpected(other),
    }
}

async fn cmd_history(store: &AnnotationStore, url: Option<String>, full: bool) -> Result<()> {
    let entries = match &url {
        Some(url) => store.history_by_url(url).await?,
        None => store.history().await?,
    };

    if entries.is_empty() {
        println!("No exported prompts");
        return Ok(());
    }

    for entry in entries {
        let created = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(entry.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.created_at.to_string());
        println!(
            "{}  {}  {} annotation(s)  {}",
            entry.id, created, entry.annotation_count, entry.url
        );
        if full {
            println!("{}", entry.prompt);
        }
    }
    Ok(())
}

fn unexpected(response: Response) -> Result<()> {
    match response.error_message() {
        Some(error) => bail!("{}", error),
        None => bail!("Unexpected response: {:?}", response),
    }
}
