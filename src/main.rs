//! Interactive screening call.
//!
//! Reads candidate utterances from stdin, one per line, and prints the
//! agent's reply together with the stage and the entities gathered so far.
//! An optional first argument names the job the call is about.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*};

use screening_agent::adapters::InMemoryConversationRepository;
use screening_agent::application::{
    ProcessUtteranceCommand, ProcessUtteranceHandler, StartCallCommand, StartCallHandler,
};
use screening_agent::config::{AppConfig, LogFormat, LoggingConfig};
use screening_agent::domain::screening::{DialogueEngine, PatternExtractor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_validated().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let repository = Arc::new(InMemoryConversationRepository::new());
    let engine = Arc::new(DialogueEngine::new(config.agent.dialogue_config()));

    let start_call = StartCallHandler::new(repository.clone(), engine.clone());
    let process_utterance =
        ProcessUtteranceHandler::new(repository, Arc::new(PatternExtractor::new()), engine);

    let command = match std::env::args().nth(1) {
        Some(job_title) => StartCallCommand::for_job(job_title),
        None => StartCallCommand::new(),
    };
    let call = start_call.handle(command).await?;
    println!("Agent: {}", call.greeting);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let turn = process_utterance
            .handle(ProcessUtteranceCommand::new(call.conversation_id, line))
            .await?;

        println!("Agent: {}", turn.response);
        println!(
            "  [stage: {}] {}",
            turn.stage,
            serde_json::to_string(&turn.entities)?
        );
    }

    Ok(())
}

/// Logs go to stderr so they never interleave with the dialogue on stdout.
fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
