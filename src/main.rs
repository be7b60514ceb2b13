//! spark-deck - present the context attribution deck in the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use spark_deck::citations::registry;
use spark_deck::config::{DeckConfig, RenderMode};
use spark_deck::deck::slides;
use spark_deck::pipeline::present;

#[derive(Parser, Debug)]
#[command(name = "spark-deck")]
#[command(about = "Keyboard-driven slide deck on context attribution for LLM outputs")]
struct Cli {
    /// Slide to start on (1-based, clamped to the deck)
    #[arg(long, default_value_t = 1)]
    start: usize,

    /// Render in the normal screen buffer instead of the alternate screen
    #[arg(long)]
    inline: bool,

    /// Do not capture the mouse (disables clickable controls and tooltips)
    #[arg(long)]
    no_mouse: bool,

    /// Write debug tracing to stderr
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the slide list and exit
    ListSlides,
    /// Print the citation registry and exit
    ListCitations,
}

impl Cli {
    fn config(&self) -> DeckConfig {
        DeckConfig {
            render_mode: if self.inline {
                RenderMode::Inline
            } else {
                RenderMode::Fullscreen
            },
            mouse: !self.no_mouse,
            start_slide: self.start.saturating_sub(1),
            ..Default::default()
        }
    }
}

fn list_slides() {
    for (i, slide) in slides().iter().enumerate() {
        let refs: Vec<String> = slide.references.iter().map(|key| registry::label(key)).collect();
        println!("{:>2}. {}  {}", i + 1, slide.title, refs.join(" "));
    }
}

fn list_citations() {
    for (key, entry) in registry::entries() {
        println!("{:<6}{:<24}{}", entry.label(), key, entry);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.trace {
        // stdout belongs to the renderer.
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    match cli.command {
        Some(Command::ListSlides) => list_slides(),
        Some(Command::ListCitations) => list_citations(),
        None => {
            let config = cli.config();
            present(slides().to_vec(), config).context("failed to present the deck")?;
        }
    }
    Ok(())
}
