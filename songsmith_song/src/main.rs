// `songsmith`: terminal front end for the nonsense song generator.
//
// Learns letter statistics from a corpus, then either previews generated
// words one at a time, prints songs for a rhyme scheme, or benchmarks word
// generation. Settings come from an optional JSON config (`SongsmithConfig`)
// with command-line flags layered on top.
//
// Usage:
//   songsmith --source-text <PATH> (--generate-words | --generate-songs | --benchmark <N>)
//     [--rhyming-scheme 8a,8a,5b,5b,8a] [--min N] [--max N] [--allow-doubles]
//     [--num-words N] [--seed N] [--config <PATH>] [--log-level LEVEL] [--debug]
//
// Interactive modes advance on Enter and quit on `q` or end of input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use log::info;
use songsmith_lang::{LetterFrequencyModel, WordGenerator, count_syllables, generate_pool};
use songsmith_prng::SongRng;
use songsmith_song::{SongError, SongsmithConfig};

#[derive(Parser, Debug)]
#[command(name = "songsmith", about = "Generate nonsense words and rhyming nonsense songs")]
#[command(group(ArgGroup::new("mode").required(true)))]
struct Cli {
    /// Preview generated words one at a time
    #[arg(long, group = "mode")]
    generate_words: bool,

    /// Print songs for --rhyming-scheme one at a time
    #[arg(long, group = "mode")]
    generate_songs: bool,

    /// Generate N words and report the timing
    #[arg(long, value_name = "N", group = "mode")]
    benchmark: Option<usize>,

    /// Corpus the letter statistics are learned from
    #[arg(long, value_name = "PATH")]
    source_text: PathBuf,

    /// Rhyme scheme for --generate-songs
    #[arg(long, default_value = "8a,8a,5b,5b,8a")]
    rhyming_scheme: String,

    /// Minimum word length in letters
    #[arg(long)]
    min: Option<usize>,

    /// Maximum word length in letters
    #[arg(long)]
    max: Option<usize>,

    /// Allow the same letter twice in a row
    #[arg(long)]
    allow_doubles: bool,

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
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Load the config file if one was given, then apply flag overrides.
    fn resolve_config(&self) -> Result<SongsmithConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                SongsmithConfig::from_json(&json)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => SongsmithConfig::default(),
        };
        if let Some(min) = self.min {
            config.generator.min_length = min;
        }
        if let Some(max) = self.max {
            config.generator.max_length = max;
        }
        if self.allow_doubles {
            config.generator.allow_doubles = true;
        }
        if let Some(num_words) = self.num_words {
            config.pool_size = num_words;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        cli.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = cli.resolve_config()?;
    let seed = config.resolve_seed();
    info!("using seed {seed}");

    let model = LetterFrequencyModel::from_path(&cli.source_text)
        .with_context(|| format!("failed to read corpus {}", cli.source_text.display()))?;
    info!("learned letter statistics from {} words", model.words_recorded());
    let generator = WordGenerator::new(model, config.generator.clone())
        .context("invalid word generator settings")?;

    if cli.generate_words {
        preview_words(&generator, seed)
    } else if cli.generate_songs {
        print_songs(&generator, &config, seed, &cli.rhyming_scheme)
    } else if let Some(count) = cli.benchmark {
        benchmark(&generator, seed, count)
    } else {
        Ok(())
    }
}

/// Block until the user presses Enter. `false` on `q` or end of input.
fn wait_for_next(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim() != "q"),
        None => Ok(false),
    }
}

fn preview_words(generator: &WordGenerator, seed: u64) -> Result<()> {
    let mut rng = SongRng::new(seed);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let word = generator.generate_word(&mut rng)?;
        print!("{word} ({} syllables) ", count_syllables(&word));
        if !wait_for_next(&mut lines)? {
            return Ok(());
        }
    }
}

fn print_songs(
    generator: &WordGenerator,
    config: &SongsmithConfig,
    seed: u64,
    descriptor: &str,
) -> Result<()> {
    println!("Generating {} words...", config.pool_size);
    let pool = generate_pool(generator, config.pool_size, seed)?;
    let writer = config.compose.writer(pool);
    println!("Finding rhymes...");
    let groups = writer.ensure_built().rhyme_groups.len();
    info!("pool has {groups} rhyme groups");

    // Stream `pool_size` is past the last word's stream, so song draws never
    // replay a word's draws.
    let mut rng = SongRng::for_stream(seed, config.pool_size as u64);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let song = writer.compose_song(
            descriptor,
            config.compose.min_filler_syllables,
            config.compose.max_filler_syllables,
            &mut rng,
        );
        match song {
            Ok(song) => {
                println!();
                for line in song {
                    println!("{line}");
                }
            }
            Err(e @ SongError::AttemptsExhausted { .. }) => {
                println!("\ncould not create a song with those parameters");
                info!("{e}");
            }
            Err(e) => return Err(e).context(format!("cannot write songs for '{descriptor}'")),
        }
        if !wait_for_next(&mut lines)? {
            return Ok(());
        }
    }
}

fn benchmark(generator: &WordGenerator, seed: u64, count: usize) -> Result<()> {
    let mut rng = SongRng::new(seed);
    let started = Instant::now();
    for _ in 0..count {
        generator.generate_word(&mut rng)?;
    }
    let elapsed = started.elapsed();
    println!("Generated {count} words in {elapsed:.2?}");
    if count > 0 {
        println!("{:.2?} per word", elapsed.div_f64(count as f64));
    }
    Ok(())
}
