// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - view:    full-screen viewer
// - dump:    print the laid-out document as plain text
// - anchors: list heading anchors
// - themes:  list bundled themes
// - config:  show, locate or reset the config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdblocks::config::{Config, VERSION};
use mdblocks::document::{self, Block};
use mdblocks::logging::{self, LogBuffer};
use mdblocks::render::{layout, BlockRenderer, Capabilities};
use mdblocks::theme::StyleTheme;
use mdblocks::tui::{self, app::App};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Terminal markdown viewer with copyable code blocks
#[derive(Parser)]
#[command(name = "mdblocks")]
#[command(version = VERSION)]
#[command(about = "Terminal markdown viewer with copyable code blocks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a markdown file in the viewer
    View {
        file: PathBuf,

        /// Theme name or path to a .toml theme file
        #[arg(long)]
        theme: Option<String>,

        /// Render without advanced layout (no tables or image rows)
        #[arg(long)]
        basic: bool,

        /// Start at the heading with this anchor
        #[arg(long)]
        anchor: Option<String>,
    },

    /// Print the rendered document as plain text
    Dump {
        file: PathBuf,

        /// Line width
        #[arg(long, default_value_t = 80)]
        width: u16,

        /// Theme name or path to a .toml theme file
        #[arg(long)]
        theme: Option<String>,

        /// Render without advanced layout
        #[arg(long)]
        basic: bool,
    },

    /// List heading anchors, one per line
    Anchors { file: PathBuf },

    /// List bundled themes
    Themes,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::View {
            file,
            theme,
            basic,
            anchor,
        } => handle_view(&file, theme, basic, anchor).await,
        Commands::Dump {
            file,
            width,
            theme,
            basic,
        } => handle_dump(&file, width, theme, basic),
        Commands::Anchors { file } => handle_anchors(&file),
        Commands::Themes => {
            for name in StyleTheme::bundled_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Config { show, reset, path } => {
            if path {
                handle_config_path()
            } else if show {
                handle_config_show()
            } else if reset {
                handle_config_reset()
            } else {
                // No flag provided, show help
                println!("Usage: mdblocks config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
                Ok(())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document commands
// ─────────────────────────────────────────────────────────────────────────────

async fn handle_view(
    file: &Path,
    theme: Option<String>,
    basic: bool,
    anchor: Option<String>,
) -> Result<()> {
    let config = Config::load()?;

    // Viewer mode: capture logs to buffer (prevents garbling the display)
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, Some(log_buffer.clone()));

    let document = load_document(file)?;
    let theme = resolve_theme(&config, theme)?;
    let renderer = renderer(&config, basic);
    tracing::info!(
        file = %file.display(),
        blocks = document.len(),
        theme = %theme.name,
        "Opening viewer"
    );

    let title = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let mut app = App::new(title, document, renderer, theme, log_buffer);
    if let Some(anchor) = anchor {
        app = app.with_anchor(anchor);
    }

    tui::run(app).await
}

fn handle_dump(file: &Path, width: u16, theme: Option<String>, basic: bool) -> Result<()> {
    let config = Config::load()?;
    let _file_guard = logging::init(&config.logging, None);

    let document = load_document(file)?;
    let theme = resolve_theme(&config, theme)?;
    let node = renderer(&config, basic).render_document(&document, &theme);

    let mut stdout = std::io::stdout().lock();
    for line in layout(&node, &theme, width).plain_lines() {
        writeln!(stdout, "{}", line)?;
    }
    Ok(())
}

fn handle_anchors(file: &Path) -> Result<()> {
    let config = Config::load()?;
    let _file_guard = logging::init(&config.logging, None);

    let document = load_document(file)?;
    let node = renderer(&config, false).render_document(&document, &StyleTheme::default());

    let mut stdout = std::io::stdout().lock();
    for id in node.anchors() {
        writeln!(stdout, "{}", id)?;
    }
    Ok(())
}

fn load_document(path: &Path) -> Result<Vec<Block>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(document::parse(&text))
}

/// CLI flag > config (which already applied env > file > default)
fn resolve_theme(config: &Config, flag: Option<String>) -> Result<StyleTheme> {
    let name = flag.unwrap_or_else(|| config.theme.clone());
    StyleTheme::resolve(&name)
}

fn renderer(config: &Config, basic: bool) -> BlockRenderer {
    let capabilities = Capabilities {
        advanced_layout: config.advanced_layout && !basic,
    };
    BlockRenderer::new(capabilities, config.copy.clipboard.build())
        .with_feedback(config.copy.feedback())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config commands
// ─────────────────────────────────────────────────────────────────────────────

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read answer")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let path = Config::reset()?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}
