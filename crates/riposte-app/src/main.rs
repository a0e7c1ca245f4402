//! Riposte application binary - composition root.
//!
//! Ties the workspace crates into a single interactive executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the answer selector over a candidate source
//! 3. Run a line-oriented question loop on stdin
//!
//! The bundled extractive source answers straight from the supplied context
//! file, so the binary works end to end without any model runtime. A real
//! deployment swaps in its own `CandidateSource` implementation at the single
//! seam in `main`.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use riposte_core::config::RiposteConfig;
use riposte_core::types::{LanguageTag, SessionId};
use riposte_engine::{AnswerSelector, MockCandidateSource};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config before tracing: the log level may come from the file.
    let config_file = args.resolve_config_path();
    let mut config = RiposteConfig::load_or_default(&config_file);
    if let Some(level) = args.resolve_log_level() {
        config.logging.level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!("Starting Riposte v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Knowledge context.
    let context = match args.context_file {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)?;
            tracing::info!(
                path = %path.display(),
                chars = text.chars().count(),
                "Context loaded"
            );
            text
        }
        None => {
            tracing::warn!("No context file supplied — answer quality will degrade");
            String::new()
        }
    };

    let language = LanguageTag::new(args.language.clone().unwrap_or_default());

    // Selector over the bundled extractive source.
    let selector = Arc::new(AnswerSelector::new(
        config,
        Arc::new(MockCandidateSource::new()),
    )?);
    tracing::info!(
        cache_capacity = selector.config().cache.capacity,
        history_capacity = selector.config().conversation.history_capacity,
        "Answer selector ready"
    );

    let session = SessionId::generate();
    tracing::info!(session = %session, language = %language, "Interactive session started");

    run_question_loop(selector, context, language, session).await?;

    Ok(())
}

/// Read questions from stdin until EOF or /quit, printing one answer per line.
async fn run_question_loop(
    selector: Arc<AnswerSelector>,
    context: String,
    language: LanguageTag,
    session: SessionId,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Ask a question, or use /reset, /history, /quit.\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/reset" => {
                selector.reset(&session)?;
                stdout.write_all(b"Conversation history cleared.\n").await?;
            }
            "/history" => {
                let history = selector.history(&session);
                let json = serde_json::to_string_pretty(&history)?;
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            question => {
                match selector
                    .answer(question, &context, language.clone(), &session)
                    .await
                {
                    Ok(result) => {
                        let marker = if result.from_cache { " (cached)" } else { "" };
                        stdout
                            .write_all(format!("{}{}\n", result.text, marker).as_bytes())
                            .await?;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to answer");
                        stdout
                            .write_all(format!("Error: {}\n", e).as_bytes())
                            .await?;
                    }
                }
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    tracing::info!("Session ended");
    Ok(())
}
