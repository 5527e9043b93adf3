mod api;
mod clean;
mod config;
mod corpus;
mod pipeline;
mod split;
mod stats;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use crate::api::ApiClient;
use crate::config::PrepConfig;

#[derive(Parser)]
#[command(
    name = "newsela_prep",
    about = "Fetch the Newsela leveled-text corpus and write a cleaned, stratified train/test split"
)]
struct Cli {
    /// Max content groups to fetch (default: all)
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Output store path
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut config = PrepConfig {
        group_limit: cli.limit,
        ..PrepConfig::default()
    };
    if let Some(out) = cli.out {
        config.store_path = out;
    }

    let client = ApiClient::new(&config)?;
    let corpus = pipeline::prepare_corpus(&client, &config)?;

    store::save_corpus(&config.store_path, &corpus.text, &corpus.train, &corpus.test)?;
    println!(
        "Wrote {} ({} text, {} train, {} test rows)",
        config.store_path.display(),
        corpus.text.len(),
        corpus.train.len(),
        corpus.test.len()
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
