//! Sorting Trace Visualizer CLI
//!
//! - `play`: animate a sort in the terminal
//! - `trace`: print a recorded trace as JSON lines
//! - `report`: compare trace statistics across algorithms
//!
//! Logs go to stderr; set `RUST_LOG=sort_trace=debug` to see scheduling.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sort_trace::config::{random_array, DEFAULT_SIZE, DEFAULT_SPEED};
use sort_trace::render::{render_bars, status_line, Frame};
use sort_trace::report::TraceReport;
use sort_trace::{record, Algorithm, PlaybackController, PlaybackStatus, VisualizerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Record and animate sorting algorithm traces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a sort as a bar chart in the terminal
    Play {
        #[command(flatten)]
        sort: SortArgs,
        /// Height of the bar chart in lines
        #[arg(long, default_value_t = 12)]
        rows: usize,
    },
    /// Record one trace and print it as JSON, one event per line
    Trace {
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Average trace statistics of every algorithm over random arrays
    Report {
        /// Array sizes to measure, clamped to 5..=50 (comma separated or repeated)
        #[arg(long, value_delimiter = ',', default_values_t = [10usize, 20, 50])]
        sizes: Vec<usize>,
        /// Random arrays per size
        #[arg(long, default_value_t = 10)]
        trials: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct SortArgs {
    /// bubble, merge or quick
    #[arg(long, short, default_value = "bubble")]
    algorithm: Algorithm,
    /// Number of bars (clamped to 5..=50)
    #[arg(long, short, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Playback speed (clamped to 1..=100); each step waits 101 - speed ms
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u32,
    /// Seed for reproducible arrays
    #[arg(long)]
    seed: Option<u64>,
}

impl SortArgs {
    fn config(&self) -> VisualizerConfig {
        VisualizerConfig::new(self.algorithm, self.size, self.speed).with_seed(self.seed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Lino,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play { sort, rows } => play(&sort, rows).await,
        Command::Trace { sort } => print_trace(&sort),
        Command::Report {
            sizes,
            trials,
            seed,
            format,
            output,
        } => report(&sizes, trials, seed, format, output),
    }
}

async fn play(args: &SortArgs, rows: usize) -> Result<()> {
    let config = args.config();
    let algorithm = config.algorithm();
    let label = format!("{} | speed {}", algorithm.display_name(), config.speed());

    let mut controller = PlaybackController::new(config);
    controller.set_renderer(move |frame| draw(frame, rows, &label));
    controller.sort().context("failed to start playback")?;

    let status = controller.run_until_settled().await;
    info!(%status, "playback finished");

    println!();
    println!("{}", algorithm.description());
    println!("Time Complexity: {}", algorithm.time_complexity());

    if status != PlaybackStatus::Completed {
        anyhow::bail!("playback stopped before completion ({status})");
    }
    Ok(())
}

fn draw(frame: &Frame<'_>, rows: usize, label: &str) {
    let mut out = std::io::stdout().lock();
    // Clear the screen and home the cursor before every frame.
    let _ = writeln!(
        out,
        "\x1b[2J\x1b[H{}{}",
        render_bars(frame, rows),
        status_line(frame, label)
    );
    let _ = out.flush();
}

fn print_trace(args: &SortArgs) -> Result<()> {
    let config = args.config();
    let array = random_array(config.size(), &mut config.rng());
    let trace = record(&array, config.algorithm());

    let mut out = std::io::stdout().lock();
    let header = serde_json::json!({
        "algorithm": config.algorithm(),
        "array": array,
        "events": trace.len(),
    });
    writeln!(out, "{}", header).context("failed to write trace header")?;
    for event in &trace {
        let line = serde_json::to_string(event).context("failed to encode event")?;
        writeln!(out, "{}", line).context("failed to write event")?;
    }
    Ok(())
}

fn report(
    sizes: &[usize],
    trials: usize,
    seed: Option<u64>,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let description = format!("{} random arrays per size", trials.max(1));
    let report = TraceReport::generate(&description, sizes, trials, &mut rng);
    info!(sizes = ?sizes, trials, "generated trace report");

    match output {
        Some(path) => {
            let saved = match format {
                ReportFormat::Markdown => report.save_markdown(&path),
                ReportFormat::Lino => report.save_lino(&path),
            };
            saved.with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to: {}", path.display());
        }
        None => match format {
            ReportFormat::Markdown => print!("{}", report.to_markdown_table()),
            ReportFormat::Lino => print!("{}", report.to_lino()),
        },
    }
    Ok(())
}
