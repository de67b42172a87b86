//! Emit a synthetic mission as JSON-lines telemetry, suitable for piping
//! into `flywatch --input -`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use flywatch::config::UpdateRate;
use flywatch::simulation::{MissionProfile, StallSegment, WaypointSwitch};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Mission length in seconds
    #[arg(long, default_value_t = 120.0)]
    duration_secs: f64,

    /// Sample cadence, e.g. "5hz" or "200ms"
    #[arg(long, default_value = "5hz")]
    rate: UpdateRate,

    /// Initial waypoint distance in meters
    #[arg(long, default_value_t = 500.0)]
    distance: f64,

    /// Commanded closing speed in m/s
    #[arg(long, default_value_t = 10.0)]
    speed: f64,

    /// Inject a waypoint switch to this distance at mid-mission
    #[arg(long)]
    switch_to: Option<f64>,

    /// Stall (no progress) from this time to the end of the mission
    #[arg(long)]
    stall_from: Option<f64>,

    /// RNG seed for reproducible missions
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output file, or '-' for stdout
    #[arg(long, default_value = "-")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let profile = MissionProfile {
        initial_distance_m: args.distance,
        closing_speed_m_s: args.speed,
        sample_rate: args.rate,
        waypoint_switches: args
            .switch_to
            .map(|d| {
                vec![WaypointSwitch {
                    at_s: args.duration_secs / 2.0,
                    new_distance_m: d,
                }]
            })
            .unwrap_or_default(),
        stall: args.stall_from.map(|start_s| StallSegment {
            start_s,
            end_s: args.duration_secs,
        }),
        seed: args.seed,
        ..Default::default()
    };

    let samples = profile.generate(args.duration_secs);

    let mut writer: Box<dyn Write> = if args.output == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(&args.output)?))
    };

    for sample in &samples {
        writeln!(writer, "{}", serde_json::to_string(sample)?)?;
    }
    writer.flush()?;

    log::info!("Wrote {} samples", samples.len());
    Ok(())
}
