use anyhow::Context;
use bridge::BackendBridge;
use clap::Parser;
use generator::match_sim::MatchSim;
use scenario::config::ScenarioConfig;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod generator;
mod scenario;

#[derive(Parser)]
#[command(author, version, about = "Synthetic analytics backend for the pickleball dashboard")]
struct Args {
    /// Load a scenario config from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    #[arg(long, default_value_t = 600)]
    total_frames: u64,
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Directory with frame/heatmap images to serve alongside the stats
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Run one synthetic job to completion and print the final snapshot
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Host the backend HTTP surface until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario_config = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::from_args(args.total_frames, args.fps, args.seed, args.assets)
    };

    if args.offline {
        let mut sim = MatchSim::new(&scenario_config);
        let mut last = sim.step();
        while !sim.finished() {
            last = sim.step();
        }

        println!(
            "Offline run -> frames {}, status {}",
            scenario_config.total_frames,
            last.status.as_deref().unwrap_or("unknown")
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&last).context("serializing final snapshot")?
        );

        let report = format!(
            "frames={} fps={} seed={} status={}\n",
            scenario_config.total_frames,
            scenario_config.fps,
            scenario_config.seed,
            last.status.as_deref().unwrap_or("unknown")
        );
        let report_path = PathBuf::from("tools/data/offline_runs.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        let bridge = BackendBridge::new(Arc::new(scenario_config), args.port);
        println!(
            "Backend bridge on 127.0.0.1:{} ({} jobs, Ctrl+C to stop)...",
            args.port,
            bridge.job_count()
        );
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
