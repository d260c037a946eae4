/// run_filter - stream raw PCM through one configured filter
///
/// Reads PCM from stdin in the given format, writes the filtered PCM to
/// stdout and the negotiated output format to stderr.
use anyhow::Context;
use clap::Parser;
use resound_core::{AudioFormat, ConfigStore, ResoundError};
use resound_filter::{FilterRegistry, FilterSession};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "run_filter")]
#[command(about = "Run a configured audio filter over raw PCM from stdin", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file with [[filter]] blocks
    config: PathBuf,

    /// Name of the filter block to run
    name: String,

    /// Input audio format as rate:bits:channels
    #[arg(default_value = "44100:16:2")]
    format: String,
}

fn init_tracing() {
    // stdout carries PCM, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let store = ConfigStore::load(&cli.config)
        .with_context(|| format!("Failed to read {}", cli.config.display()))?;

    let in_format: AudioFormat = cli
        .format
        .parse()
        .map_err(|e: ResoundError| anyhow::anyhow!("Failed to parse audio format: {e}"))?;

    let filter = match FilterRegistry::with_builtin_plugins().load_named(&store, &cli.name) {
        Ok(filter) => filter,
        Err(err @ ResoundError::NotFound { .. }) => return Err(err.into()),
        Err(err) => return Err(anyhow::Error::new(err).context("Failed to load filter")),
    };

    let mut session = FilterSession::open(filter, in_format).context("Failed to open filter")?;
    eprintln!("audio_format={}", session.out_format());
    tracing::debug!(
        byte_rate = session.out_format().byte_rate(),
        filter = session.name(),
        "Filter opened"
    );

    let written = session.pump(&mut std::io::stdin().lock(), &mut std::io::stdout().lock())?;
    tracing::debug!(bytes = written, filter = session.name(), "Input exhausted");

    session.close();
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
