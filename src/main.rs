use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use flywatch::config::MonitorConfig;
use flywatch::monitor::MonitorTask;
use flywatch::output::{Formatter, OutputFormat, create_formatter};
use flywatch::telemetry::{ReplaySource, TelemetrySource};

/// Streaming waypoint-progress anomaly (flyaway) monitor
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file (partial files are fine)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines telemetry input, or '-' for stdin
    #[arg(long, default_value = "-")]
    input: String,

    /// Output format for classified events
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Override the moving-average window size
    #[arg(long)]
    window: Option<usize>,

    /// Override the spike rejection bound in m/s
    #[arg(long)]
    spike_threshold: Option<f64>,

    /// Override the telemetry poll timeout in milliseconds
    #[arg(long)]
    poll_timeout_ms: Option<u64>,

    /// Include diagnostics in text output
    #[arg(short, long)]
    verbose: bool,

    /// Feed the monitor from a built-in synthetic mission instead of --input
    #[cfg(feature = "simulation")]
    #[arg(long)]
    simulate: bool,

    /// Length of the synthetic mission in seconds
    #[cfg(feature = "simulation")]
    #[arg(long, default_value_t = 120.0)]
    duration_secs: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(window) = args.window {
        config.window.size = window;
    }
    if let Some(threshold) = args.spike_threshold {
        config.filter.spike_threshold_m_s = threshold;
    }
    if let Some(timeout) = args.poll_timeout_ms {
        config.telemetry.poll_timeout_ms = timeout;
    }
    config.validate()?;

    log::info!(
        "flywatch starting: window={} samples, spike threshold={} m/s, poll timeout={} ms",
        config.window.size,
        config.filter.spike_threshold_m_s,
        config.telemetry.poll_timeout_ms
    );

    let source = make_source(&args, &config)?;
    let formatter = create_formatter(args.format, args.verbose);
    run(config, source, formatter)
}

fn run(
    config: MonitorConfig,
    source: Box<dyn TelemetrySource>,
    formatter: Box<dyn Formatter>,
) -> anyhow::Result<()> {
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let mut task = MonitorTask::new(&config, source);
    task.run(|event| println!("{}", formatter.format(event)))?;
    Ok(())
}

#[cfg(feature = "simulation")]
fn make_source(args: &Args, config: &MonitorConfig) -> anyhow::Result<Box<dyn TelemetrySource>> {
    if args.simulate {
        return Ok(simulated_source(args, config));
    }
    replay_source(&args.input)
}

#[cfg(not(feature = "simulation"))]
fn make_source(args: &Args, _config: &MonitorConfig) -> anyhow::Result<Box<dyn TelemetrySource>> {
    replay_source(&args.input)
}

fn replay_source(input: &str) -> anyhow::Result<Box<dyn TelemetrySource>> {
    if input == "-" {
        Ok(Box::new(ReplaySource::new(BufReader::new(io::stdin()))))
    } else {
        let file = File::open(input)?;
        Ok(Box::new(ReplaySource::new(BufReader::new(file))))
    }
}

/// Spawn a thread that paces a synthetic mission into a channel at its
/// configured cadence, so the run loop exercises its real timeout path.
#[cfg(feature = "simulation")]
fn simulated_source(args: &Args, config: &MonitorConfig) -> Box<dyn TelemetrySource> {
    use flywatch::simulation::{MissionProfile, WaypointSwitch};
    use flywatch::telemetry::ChannelSource;
    use std::time::Duration;

    let profile = MissionProfile {
        sample_rate: config.telemetry.delivery_rate,
        waypoint_switches: vec![WaypointSwitch {
            at_s: args.duration_secs / 2.0,
            new_distance_m: 800.0,
        }],
        ..Default::default()
    };
    let samples = profile.generate(args.duration_secs);
    let interval = Duration::from_millis(config.telemetry.delivery_rate.as_interval_ms() as u64);

    let (tx, rx) = crossbeam_channel::bounded(16);
    std::thread::spawn(move || {
        for sample in samples {
            if tx.send(sample).is_err() {
                break;
            }
            std::thread::sleep(interval);
        }
    });

    Box::new(ChannelSource::new(rx))
}
