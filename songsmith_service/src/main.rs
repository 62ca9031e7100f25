// CLI entry point for the songsmith HTTP service.
//
// Learns letter statistics from a corpus, generates the word pool, builds
// the rhyme tables, then serves songs until the process is killed. See
// `server.rs` for the threading model and `request.rs` for the routes.
//
// Usage:
//   songsmith-service --source-text <PATH> [--port 8080] [--host 127.0.0.1]
//     [--workers 4] [--num-words N] [--seed N] [--config <PATH>] [--log-level LEVEL]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use songsmith_lang::{LetterFrequencyModel, WordGenerator, generate_pool};
use songsmith_prng::SongRng;
use songsmith_service::{ServiceConfig, start_service};
use songsmith_song::SongsmithConfig;

#[derive(Parser, Debug)]
#[command(name = "songsmith-service", about = "Serve rhyming nonsense songs over HTTP")]
struct Cli {
    /// Corpus the letter statistics are learned from
    #[arg(long, value_name = "PATH")]
    source_text: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Number of request worker threads
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Size of the word pool songs are built from
    #[arg(long)]
    num_words: Option<usize>,

    /// Seed for every random draw (default: from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SongsmithConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SongsmithConfig::default(),
    };
    if let Some(num_words) = cli.num_words {
        config.pool_size = num_words;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let seed = config.resolve_seed();
    info!("using seed {seed}");

    let model = LetterFrequencyModel::from_path(&cli.source_text)
        .with_context(|| format!("failed to read corpus {}", cli.source_text.display()))?;
    let generator = WordGenerator::new(model, config.generator.clone())
        .context("invalid word generator settings")?;
    let pool = generate_pool(&generator, config.pool_size, seed)?;
    let writer = Arc::new(config.compose.writer(pool));

    let service_config = ServiceConfig {
        host: cli.host,
        port: cli.port,
        workers: cli.workers,
        // Past the pool's per-word streams.
        seed: SongRng::for_stream(seed, config.pool_size as u64).next_u64(),
        compose: config.compose,
    };
    let (_handle, addr) = start_service(service_config, writer)
        .with_context(|| format!("failed to start service on port {}", cli.port))?;

    println!("Serving songs on http://{addr}/?scheme=8a,8a,5b,5b,8a");
    println!("Press Ctrl+C to stop.");

    // Workers run until the process is killed.
    loop {
        std::thread::park();
    }
}
