// Tracker Simulation Runner: headless session driver
// Fixed frame step, seedable PRNG, optional replayed orchestrator response
//
// Usage:
//   cargo run --features cli --bin tracker-sim              # 10s session, log to stdout
//   cargo run --features cli --bin tracker-sim -- --duration-ms 30000 --seed 7
//   cargo run --features cli --bin tracker-sim -- --submit "check this domain" --response reply.json
//   cargo run --features cli --bin tracker-sim -- --json    # JSONL frame snapshots
//   RUST_LOG=tracker_engine=debug cargo run --features cli --bin tracker-sim

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tracker_engine::{FrameSnapshot, ReplayOrchestrator, SessionConfig, TrackerSession};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tracker-sim", version, about = "Run a headless web-tracking simulation session")]
struct Cli {
    /// Simulated session length in milliseconds
    #[arg(long, default_value_t = 10_000.0)]
    duration_ms: f64,

    /// Host frame step in milliseconds (~60 fps by default)
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// PRNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a partial session config (camelCase keys)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Ignore API_KEY and run with the orchestrator disabled
    #[arg(long)]
    no_credential: bool,

    /// Text to submit for analysis
    #[arg(long)]
    submit: Option<String>,

    /// Simulated time at which to submit
    #[arg(long, default_value_t = 5_000.0)]
    submit_at_ms: f64,

    /// File whose contents are replayed as the orchestrator's response
    #[arg(long)]
    response: Option<std::path::PathBuf>,

    /// Pause the simulation between these two times, e.g. `--pause 3000:6000`
    #[arg(long, value_parser = parse_window)]
    pause: Option<(f64, f64)>,

    /// Emit one JSON snapshot per status-changing frame instead of the log
    #[arg(long)]
    json: bool,
}

fn parse_window(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s.split_once(':').ok_or("expected START:END")?;
    let start: f64 = a.trim().parse().map_err(|e| format!("bad start: {e}"))?;
    let end: f64 = b.trim().parse().map_err(|e| format!("bad end: {e}"))?;
    if end < start {
        return Err("END must not precede START".to_string());
    }
    Ok((start, end))
}

#[derive(Serialize)]
struct FrameLine<'a> {
    t_ms: f64,
    #[serde(flatten)]
    snapshot: &'a FrameSnapshot,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !(cli.frame_ms > 0.0) {
        return Err("--frame-ms must be positive".into());
    }

    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_json(&std::fs::read_to_string(path)?)?.with_env_credential(),
        None => SessionConfig::from_env(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_credential {
        config.api_key = None;
    }

    let response = match &cli.response {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let mut orchestrator = ReplayOrchestrator::new(response);

    let mut session = TrackerSession::with_config(config)?;
    session.init_core(0.0);

    let mut submitted = cli.submit.is_none();
    let mut printed = 0usize;
    let mut last_nodes = Vec::new();
    let mut t = 0.0_f64;

    while t <= cli.duration_ms {
        if let Some((start, end)) = cli.pause {
            session.set_active_core(!(t >= start && t < end), t);
        }

        let snapshot = session.frame_core(t);

        if !submitted && t >= cli.submit_at_ms {
            submitted = true;
            if let Some(text) = &cli.submit {
                match session.analyze_with(&mut orchestrator, text) {
                    Ok(Some(result)) => tracing::info!(focus = %result.focus, "analysis accepted"),
                    Ok(None) => tracing::info!("analysis produced no result"),
                    Err(e) => tracing::warn!(error = %e, "submit refused"),
                }
            }
        }

        if cli.json {
            if snapshot.nodes != last_nodes {
                println!("{}", serde_json::to_string(&FrameLine { t_ms: t, snapshot: &snapshot })?);
                last_nodes = snapshot.nodes;
            }
        } else {
            for entry in &session.log_entries()[printed..] {
                println!("{entry}");
            }
            printed = session.log_entries().len();
        }

        t += cli.frame_ms;
    }

    let bar = session.status_bar();
    eprintln!(
        "\n  frames: {}  pulses live: {}  log entries: {}  status: {}  api: {}",
        session.frame_count(),
        session.active_pulses().len(),
        session.log_entries().len(),
        bar.status,
        bar.api,
    );
    if let Some(radar) = session.radar_series() {
        let axes: Vec<String> = radar.iter().map(|p| format!("{}={}", p.name, p.value)).collect();
        eprintln!("  radar: {}", axes.join(" "));
    }

    session.dispose_core();
    Ok(())
}
