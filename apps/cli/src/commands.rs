//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use catchlog_report::Reporter;
use catchlog_shared::{AppConfig, PipelineSnapshot, init_config, load_config, load_config_from};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// catchlog: diagnostic reports for topic-modeling runs.
#[derive(Parser)]
#[command(
    name = "catchlog",
    version,
    about = "Render cluster statistics, catchwords and eigen spectra into a report log.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.catchlog/catchlog.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Options shared by every report command.
#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Pipeline snapshot (JSON) to report on.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Report log to write (overrides the config file).
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Write the report log only, without echoing to stdout.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Report the catchwords of one topic.
    Catchwords {
        #[command(flatten)]
        report: ReportArgs,

        /// Topic id.
        #[arg(short, long)]
        topic: usize,
    },

    /// Report per-cluster statistics, smallest cluster first.
    Clusters {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Report the eigenvalue spectrum.
    Eigen {
        #[command(flatten)]
        report: ReportArgs,

        /// Number of leading eigenvalues (defaults to the topic count).
        #[arg(short, long)]
        num_topics: Option<usize>,
    },

    /// Report the spectrum, every topic's catchwords, and the cluster summary.
    All {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Diagnostics go to stderr; stdout carries the report echo.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "catchlog=warn",
        1 => "catchlog=info",
        2 => "catchlog=debug",
        _ => "catchlog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Catchwords { report, topic } => cmd_catchwords(&config, &report, topic),
        Command::Clusters { report } => cmd_clusters(&config, &report),
        Command::Eigen { report, num_topics } => cmd_eigen(&config, &report, num_topics),
        Command::All { report } => cmd_all(&config, &report),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Report commands
// ---------------------------------------------------------------------------

/// Everything a report command needs once arguments are resolved.
struct Session {
    snapshot: PipelineSnapshot,
    reporter: Reporter,
    echo: bool,
}

impl Session {
    /// Load the snapshot and open the report log.
    ///
    /// A log that cannot be opened aborts the command: no report runs
    /// without somewhere durable to write it.
    fn start(config: &AppConfig, args: &ReportArgs) -> Result<Self> {
        let snapshot = read_snapshot(&args.input)?;
        let log_path = args
            .log
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.log_file));
        let reporter = Reporter::open(&log_path)
            .wrap_err_with(|| format!("cannot open report log {}", log_path.display()))?;

        info!(
            input = %args.input.display(),
            log = %log_path.display(),
            topics = snapshot.topics.len(),
            "report session started"
        );

        Ok(Self {
            snapshot,
            reporter,
            echo: config.output.echo && !args.quiet,
        })
    }

    fn finish(self) -> Result<()> {
        self.reporter.close()?;
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Result<PipelineSnapshot> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read snapshot {}", path.display()))?;
    Ok(PipelineSnapshot::from_json(&json)?)
}

/// Number of eigenvalues to report when the caller did not say: one per
/// topic, capped at what the snapshot holds.
fn default_eigen_count(snapshot: &PipelineSnapshot) -> usize {
    if snapshot.topics.is_empty() {
        snapshot.eigenvalues.len()
    } else {
        snapshot.topics.len().min(snapshot.eigenvalues.len())
    }
}

fn report_topic_catchwords(session: &Session, topic: usize) -> Result<()> {
    let t = session.snapshot.topic(topic)?;
    session.reporter.report_catchwords(
        topic,
        &t.catch_thresholds,
        &t.catchwords,
        &session.snapshot.vocabulary,
        session.echo,
    )?;
    Ok(())
}

fn cmd_catchwords(config: &AppConfig, args: &ReportArgs, topic: usize) -> Result<()> {
    let session = Session::start(config, args)?;
    report_topic_catchwords(&session, topic)?;
    session.finish()
}

fn cmd_clusters(config: &AppConfig, args: &ReportArgs) -> Result<()> {
    let session = Session::start(config, args)?;
    let clusters = session.snapshot.cluster_summaries()?;
    session.reporter.report_cluster_summary(&clusters, session.echo)?;
    session.finish()
}

fn cmd_eigen(config: &AppConfig, args: &ReportArgs, num_topics: Option<usize>) -> Result<()> {
    let session = Session::start(config, args)?;
    let count = num_topics.unwrap_or_else(|| default_eigen_count(&session.snapshot));
    session
        .reporter
        .report_eigen_spectrum(&session.snapshot.eigenvalues, count, session.echo)?;
    session.finish()
}

fn cmd_all(config: &AppConfig, args: &ReportArgs) -> Result<()> {
    let session = Session::start(config, args)?;

    if !session.snapshot.eigenvalues.is_empty() {
        let count = default_eigen_count(&session.snapshot);
        session
            .reporter
            .report_eigen_spectrum(&session.snapshot.eigenvalues, count, session.echo)?;
    }

    for topic in 0..session.snapshot.topics.len() {
        session
            .reporter
            .write_text(&format!("Topic {topic}\n"), session.echo)?;
        report_topic_catchwords(&session, topic)?;
    }

    let clusters = session.snapshot.cluster_summaries()?;
    session.reporter.report_cluster_summary(&clusters, session.echo)?;
    session.finish()
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| eyre!("cannot render config: {e}"))?;
    println!("{toml_str}");
    Ok(())
}
