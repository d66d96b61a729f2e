use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::sync::Semaphore;
use tokio::task;

use server::ServerConfig;
use store::Sentiment;

/// Movie review sentiment service
#[derive(Parser)]
#[command(name = "sentiment")]
#[command(about = "Sentiment classification and review aggregation service", long_about = None)]
struct Cli {
    /// Checkpoint directory (overrides MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single piece of text
    Predict {
        /// Review text to classify
        text: String,
    },

    /// Run the HTTP server
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run an inference benchmark against the loaded model
    Bench {
        /// Number of predictions to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent predictions
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }

    match cli.command {
        Commands::Predict { text } => handle_predict(&config, &text),
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            server::serve(config).await
        }
        Commands::Bench {
            requests,
            concurrent,
        } => handle_bench(&config, requests, concurrent).await,
    }
}

fn handle_predict(config: &ServerConfig, text: &str) -> Result<()> {
    println!("Loading model from {}...", config.model_dir.display());
    let start = Instant::now();
    let state = server::bootstrap(config)?;
    println!("{} Model loaded in {:?}", "✓".green(), start.elapsed());

    let prediction = state.predictor.predict(text)?;
    let sentiment = match prediction.sentiment {
        Sentiment::Positive => "positive".green().bold(),
        Sentiment::Negative => "negative".red().bold(),
    };
    println!("Sentiment:   {sentiment}");
    println!("Probability: {:.4}", prediction.probability);
    println!("Confidence:  {:.4}", prediction.confidence);
    Ok(())
}

/// Canned review texts cycled through during the benchmark.
const BENCH_TEXTS: &[&str] = &[
    "An absolutely brilliant film with a stunning score",
    "Terrible pacing and a script that goes nowhere",
    "I enjoyed it more than I expected to",
    "Forgettable and far too long for what it delivers",
    "A masterpiece of practical effects and tight editing",
    "The worst sequel in the entire franchise",
];

async fn handle_bench(config: &ServerConfig, requests: usize, concurrent: usize) -> Result<()> {
    println!("Loading model from {}...", config.model_dir.display());
    let start = Instant::now();
    let state = server::bootstrap(config)?;
    println!("{} Model loaded in {:?}", "✓".green(), start.elapsed());

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let bench_start = Instant::now();

    let handles: Vec<_> = (0..requests)
        .map(|i| {
            let predictor = state.predictor.clone();
            let semaphore = Arc::clone(&semaphore);
            let text = BENCH_TEXTS[i % BENCH_TEXTS.len()];
            tokio::spawn(async move {
                let _permit = semaphore.acquire().await?;
                let start = Instant::now();
                task::spawn_blocking(move || predictor.predict(text)).await??;
                Ok::<_, anyhow::Error>(start.elapsed())
            })
        })
        .collect();

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }

    let wall_time = bench_start.elapsed();
    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {wall_time:?}");
    println!("Average latency: {avg_latency:?}");
    println!("P50 latency: {p50:?}");
    println!("P95 latency: {p95:?}");
    println!("P99 latency: {p99:?}");
    println!("Throughput: {throughput:.2} requests/second");

    Ok(())
}
