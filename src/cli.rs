use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::highlight::{
    DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER, DEFAULT_THRESHOLD,
};

#[derive(Debug, Parser)]
#[command(
    name = "ocrmark",
    about = "Fuzzy highlighter for retrieval snippets in noisy OCR text"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wrap the best-matching span per needle in marker tags and print the
    /// marked-up text
    Mark(MarkArgs),
    /// Print the matched spans as character offsets instead of markup
    Spans(SpansArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Mark --

#[derive(Debug, Parser)]
pub struct MarkArgs {
    /// Path to the page text, or '-' to read stdin
    pub file: PathBuf,

    /// Snippet(s) to locate in the page text
    #[arg(required_unless_present = "needle_file")]
    pub needles: Vec<String>,

    /// Read additional needles from a file, one per line
    #[arg(long)]
    pub needle_file: Option<PathBuf>,

    /// Minimum similarity ratio a match must strictly exceed (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Opening marker inserted before each matched span
    #[arg(long, default_value = DEFAULT_OPEN_MARKER)]
    pub open_marker: String,

    /// Closing marker inserted after each matched span
    #[arg(long, default_value = DEFAULT_CLOSE_MARKER)]
    pub close_marker: String,
}

// -- Spans --

#[derive(Debug, Parser)]
pub struct SpansArgs {
    /// Path to the page text, or '-' to read stdin
    pub file: PathBuf,

    /// Snippet(s) to locate in the page text
    #[arg(required_unless_present = "needle_file")]
    pub needles: Vec<String>,

    /// Read additional needles from a file, one per line
    #[arg(long)]
    pub needle_file: Option<PathBuf>,

    /// Minimum similarity ratio a match must strictly exceed (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Output spans as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "ocrmark",
            &mut std::io::stdout(),
        );
    }
}
