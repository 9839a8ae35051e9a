use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::session::SourceRef;

#[derive(Parser)]
#[command(name = "briefly")]
#[command(version)]
#[command(about = "Summarize a web page or PDF and chat about it, with streamed answers")]
pub struct Args {
    /// URL of the page to analyze
    pub url: Option<String>,

    /// Analyze a local PDF file instead of a URL
    #[arg(long, value_name = "FILE")]
    pub pdf: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, default_value = "briefly.toml")]
    pub config: PathBuf,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the summary and exit without entering the chat loop
    #[arg(long)]
    pub no_chat: bool,

    /// Write the chat transcript to this file as JSON on exit
    #[arg(long, value_name = "FILE")]
    pub transcript_out: Option<PathBuf>,

    /// Enable color-coded terminal output
    #[arg(long, short)]
    pub visual: bool,
}

/// The analysis source implied by the arguments: exactly one of a URL
/// positional or `--pdf`.
pub fn resolve_source(args: &Args) -> Result<SourceRef, Error> {
    match (&args.url, &args.pdf) {
        (Some(_), Some(_)) => Err(Error::Validation(
            "pass either a URL or --pdf, not both".to_string(),
        )),
        (Some(url), None) if !url.trim().is_empty() => {
            Ok(SourceRef::Url(url.trim().to_string()))
        }
        (Some(_), None) => Err(Error::Validation("URL is empty".to_string())),
        (None, Some(path)) => Ok(SourceRef::Pdf(path.display().to_string())),
        (None, None) => Err(Error::Validation(
            "nothing to analyze: pass a URL or --pdf <file>".to_string(),
        )),
    }
}
