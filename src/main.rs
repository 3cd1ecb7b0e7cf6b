use anyhow::Context;
use clap::Parser;
use meddra_search::cli::{Cli, Commands, parse_batch};
use meddra_search::{AutoSearch, DirectorySource, EngineConfig, Result, SearchEngine, format};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    meddra_search::tracing::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = SearchEngine::new(DirectorySource::new(cli.data_dir()), config);

    match cli.command {
        Commands::Search {
            query,
            limit,
            include_inactive,
            mode,
            output,
        } => {
            let outcome = engine
                .search(&query, limit, include_inactive, mode)
                .await
                .context("Search failed")?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", format::format_outcome(&query, &outcome));
            }
            Ok(if outcome.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Details { pt_code, output } => {
            let Some(details) = engine.details(&pt_code).await.context("Lookup failed")? else {
                eprintln!("No PT with code '{}'.", pt_code);
                return Ok(ExitCode::FAILURE);
            };
            if output.json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                print!("{}", format::format_details(&details));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Batch { file, output } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let terms = parse_batch(&text);
            let batch = engine.config().batch;

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let auto = AutoSearch::new(engine, batch).with_events(tx);
            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    if !output.json {
                        println!("{}", format::format_event(&event));
                    }
                }
            });

            let summary = auto.run(terms).await;
            let state = auto.snapshot().await;
            drop(auto);
            printer.await.context("Progress printer failed")?;

            if output.json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            Ok(match summary {
                Some(summary) if summary.terms_failed == 0 => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Commands::Stats => {
            engine.ensure_loaded().await.context("Failed to load vocabulary")?;
            if let Some(stats) = engine.dataset_stats().await {
                println!("{}", format::format_stats(&stats));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
