// mdblocks - terminal markdown viewer
//
// Architecture:
// - document: markdown text → Block tree (pulldown-cmark)
// - render: Block → RenderedNode (theme slots, anchors, copy controls), then
//   RenderedNode → terminal lines for a given width
// - tui (ratatui): scrollable viewer with focusable copy controls
// - config/logging: layered configuration and tracing setup

mod cli;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli).await
}
