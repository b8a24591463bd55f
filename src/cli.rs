use crate::client::FlightClient;
use crate::form::read_params;
use crate::model::{Field, SearchConfig, SearchReport, SubmitOutcome, DEFAULT_BASE_PATH};
use crate::orchestrator::SearchController;
use crate::view::Document;
use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "flight-search",
    version,
    about = "Search flight quotes by route and date, with an optional TUI form"
)]
pub struct Cli {
    /// Host serving the flight quote API
    #[arg(long, default_value = "http://localhost:8080")]
    pub host: String,

    /// Path prefix of the flight quote endpoint
    #[arg(long, default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// Origin airport code
    #[arg(long)]
    pub origin: Option<String>,

    /// Destination airport code
    #[arg(long)]
    pub destination: Option<String>,

    /// Outbound date (YYYY-MM-DD)
    #[arg(long)]
    pub outbound: Option<String>,

    /// Inbound date (YYYY-MM-DD); searches the return leg as a second request
    #[arg(long)]
    pub inbound: Option<String>,

    /// Swap origin and destination before searching
    #[arg(long)]
    pub swap: bool,

    /// Request timeout
    #[arg(long, default_value = "10s")]
    pub timeout: humantime::Duration,

    /// Print JSON report and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print text results and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn is_non_tui(&self) -> bool {
        self.json || self.text || cfg!(not(feature = "tui"))
    }

    /// Form values supplied on the command line.
    pub fn prefill(&self) -> Vec<(Field, &str)> {
        [
            (Field::Origin, self.origin.as_deref()),
            (Field::Destination, self.destination.as_deref()),
            (Field::OutboundDate, self.outbound.as_deref()),
            (Field::InboundDate, self.inbound.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    if !args.is_non_tui() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
    }

    run_once(args).await
}

/// Generate a random id that tags one CLI invocation in logs and reports.
fn gen_search_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    format!("{:016x}", u64::from_le_bytes(b))
}

/// Build a `SearchConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> SearchConfig {
    SearchConfig {
        host: args.host.clone(),
        base_path: args.base_path.clone(),
        timeout: Duration::from(args.timeout),
        user_agent: format!("flight-search-cli/{}", env!("CARGO_PKG_VERSION")),
        search_id: gen_search_id(),
    }
}

/// Build the controller over a document pre-filled from the command line.
pub(crate) fn build_controller(args: &Cli, cfg: &SearchConfig) -> Result<(Document, SearchController)> {
    let doc = Document::with_fields(args.prefill());
    let client = FlightClient::new(cfg).context("failed to build HTTP client")?;
    let controller = SearchController::new(Arc::new(doc.clone()), Arc::new(client), &cfg.base_path);
    Ok((doc, controller))
}

/// Submit the command-line form once and print the result as text or JSON.
async fn run_once(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let (doc, controller) = build_controller(&args, &cfg)?;
    if args.swap {
        controller.switch_cities();
    }

    let params = read_params(&doc);
    info!(search_id = %cfg.search_id, ?params, "submitting search");
    let outcome = controller.on_submit().await;
    let state = doc.snapshot();

    let (out_tx, out_handle) = spawn_output_writer();
    if args.json {
        let report = SearchReport {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            search_id: cfg.search_id.clone(),
            config: cfg,
            params: params.clone(),
            outcome: outcome.clone(),
            field_errors: state.errors.clone(),
            panel: state.panel.clone(),
        };
        let out = serde_json::to_string_pretty(&report)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        let summary = crate::text_summary::build_text_summary(&params, &outcome, &state);
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }
    if state.is_busy() {
        let _ = out_tx.send(OutputLine::Stderr(
            "warning: busy indicator left attached".into(),
        ));
    }
    drop(out_tx);
    let _ = out_handle.await;

    match outcome {
        SubmitOutcome::Invalid => Err(anyhow::anyhow!("search form is incomplete")),
        SubmitOutcome::Aborted { reason, .. } => Err(anyhow::anyhow!("search failed: {reason}")),
        SubmitOutcome::Completed { .. } | SubmitOutcome::Superseded { .. } => Ok(()),
    }
}
