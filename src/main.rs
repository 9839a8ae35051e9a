use std::io::Write;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tokio::io::AsyncBufReadExt;

use briefly::cli::{resolve_source, Args};
use briefly::{BackendClient, Config, ContentSummary, SessionCoordinator, SourceRef};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let source = resolve_source(&args)?;

    let mut config = Config::load_or_default(&args.config)?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout_secs {
        config.request_timeout_secs = timeout;
    }

    let client = BackendClient::new(&config)?;
    let mut coordinator = SessionCoordinator::new(client);
    coordinator.visual_mode = args.visual;

    eprintln!("[briefly] analyzing {source} via {}", config.base_url);
    let content = match &source {
        SourceRef::Url(url) => coordinator.analyze_url(url).await,
        SourceRef::Pdf(path) => coordinator.analyze_pdf(Path::new(path)).await,
    };
    let content = match content {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{} {error}", "analysis failed:".bright_red().bold());
            std::process::exit(1);
        }
    };

    print_summary_card(&content, args.visual);

    if !args.no_chat {
        run_chat_loop(&mut coordinator, args.visual).await?;
    }

    if let Some(path) = &args.transcript_out {
        std::fs::write(path, coordinator.session.transcript_json()?)?;
        eprintln!("[briefly] transcript written to {}", path.display());
    }

    Ok(())
}

fn print_summary_card(content: &ContentSummary, visual: bool) {
    if visual {
        println!("{}", "=".repeat(50).bright_blue());
        println!("{} {}", "Source:".bright_yellow(), content.source);
        println!(
            "{} {} words, ~{} min read",
            "Length:".bright_yellow(),
            content.word_count,
            content.reading_time_minutes
        );
        if !content.key_topics.is_empty() {
            println!(
                "{} {}",
                "Topics:".bright_yellow(),
                content.key_topics.join(", ").bright_cyan()
            );
        }
        println!("{}", "=".repeat(50).bright_blue());
        println!("{}", content.summary_text.bright_white());
    } else {
        println!("{}", "=".repeat(50));
        println!("Source: {}", content.source);
        println!(
            "Length: {} words, ~{} min read",
            content.word_count, content.reading_time_minutes
        );
        if !content.key_topics.is_empty() {
            println!("Topics: {}", content.key_topics.join(", "));
        }
        println!("{}", "=".repeat(50));
        println!("{}", content.summary_text);
    }
    println!();
}

/// Interactive Q&A on the analyzed content. Answers stream to stdout as
/// fragments arrive; an empty line is skipped, `/quit` or EOF ends the loop.
async fn run_chat_loop(
    coordinator: &mut SessionCoordinator,
    visual: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("[briefly] ask questions about the content (/quit to exit)");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        if visual {
            print!("{} ", "you>".bright_green().bold());
        } else {
            print!("you> ");
        }
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim().to_string();
        if question.is_empty() {
            continue;
        }
        if question == "/quit" || question == "/exit" {
            break;
        }

        if visual {
            print!("{} ", "assistant>".bright_cyan().bold());
        } else {
            print!("assistant> ");
        }
        std::io::stdout().flush()?;

        // The coordinator prints the streamed answer (or the fallback or
        // apology line) itself in terminal mode; only pre-turn rejections
        // need reporting here.
        if let Err(error) = coordinator.send_chat_message(&question).await {
            if error.is_pre_network() {
                eprintln!("{error}");
                continue;
            }
        }
        println!();
    }

    Ok(())
}
