use std::{io::Read, path::Path};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ocrmark::{
    cli::{Cli, Command, MarkArgs, SpansArgs},
    error::{Error, Result},
    highlight::{HighlightOptions, Highlighter},
};

fn init_tracing(verbose: u8) {
    let filter = if let Ok(env) = std::env::var("OCRMARK_LOG") {
        EnvFilter::new(env)
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Mark(args) => cmd_mark(&args),
        Command::Spans(args) => cmd_spans(&args),
        Command::Completions(args) => {
            args.generate();
            Ok(())
        }
    }
}

fn cmd_mark(args: &MarkArgs) -> Result<()> {
    let options = HighlightOptions {
        threshold: validate_threshold(args.threshold)?,
        open_marker: args.open_marker.clone(),
        close_marker: args.close_marker.clone(),
    };
    let haystack = read_text(&args.file)?;
    let needles = collect_needles(&args.needles, args.needle_file.as_deref())?;

    println!("{}", Highlighter::new(options).mark(&haystack, &needles));
    Ok(())
}

fn cmd_spans(args: &SpansArgs) -> Result<()> {
    let options = HighlightOptions {
        threshold: validate_threshold(args.threshold)?,
        ..Default::default()
    };
    let haystack = read_text(&args.file)?;
    let needles = collect_needles(&args.needles, args.needle_file.as_deref())?;

    let spans = Highlighter::new(options).spans(&haystack, &needles);
    if args.json {
        println!("{}", serde_json::to_string(&spans)?);
    } else {
        let chars: Vec<char> = haystack.chars().collect();
        for span in &spans {
            let content: String =
                chars[span.start..span.end].iter().collect();
            println!("{}..{}\t{}", span.start, span.end, content);
        }
    }
    Ok(())
}

fn validate_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(Error::Config(format!(
            "threshold must lie in [0.0, 1.0], got {threshold}"
        )))
    }
}

/// Read the page text from a file, or from stdin when the path is `-`.
fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Positional needles plus, if given, one needle per non-blank line of the
/// needle file.
fn collect_needles(
    needles: &[String],
    needle_file: Option<&Path>,
) -> Result<Vec<String>> {
    let mut all = needles.to_vec();
    if let Some(path) = needle_file {
        let contents = std::fs::read_to_string(path)?;
        all.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }
    Ok(all)
}
