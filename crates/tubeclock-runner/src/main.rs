use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tubeclock_cli::build_info;
use tubeclock_cli::telemetry;
use tubeclock_runner::{
    JsonFileStore, Runner, RunnerResult, RunnerSettings, SerialLink, StdioLink, TcpLink,
    TransportSettings,
};

/// Run the tube clock command interface on this machine.
#[derive(Debug, Parser)]
#[command(name = "tubeclock", version, about)]
struct Args {
    /// YAML settings file.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// JSON file holding the saved device configuration.
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Serve the serial port on this TCP port instead of stdio.
    #[arg(long)]
    tcp_port: Option<u16>,

    /// Number of clock faces on the simulated display.
    #[arg(long)]
    faces: Option<u8>,

    /// More logging (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn settings(&self) -> RunnerResult<RunnerSettings> {
        let mut settings = match &self.settings {
            Some(path) => RunnerSettings::load(path)?,
            None => RunnerSettings::default(),
        };
        if let Some(path) = &self.state_file {
            settings.state_file = path.clone();
        }
        if let Some(port) = self.tcp_port {
            settings.transport = TransportSettings::Tcp { port };
        }
        if let Some(faces) = self.faces {
            settings.face_count = faces;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout may be the serial link, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<L: SerialLink>(
    settings: &RunnerSettings,
    link: L,
    shutdown: &AtomicBool,
) -> RunnerResult<()> {
    let store = JsonFileStore::new(&settings.state_file);
    let mut runner = Runner::new(store, link, settings.face_count)
        .with_poll_interval(Duration::from_millis(settings.poll_interval_ms));
    runner.run(shutdown)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    telemetry::describe_metrics();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };
    info!(
        "tubeclock {} (built {}), state file {}",
        build_info::firmware_version(),
        build_info::BUILD_TIMESTAMP,
        settings.state_file.display()
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let result = match settings.transport {
        TransportSettings::Stdio => {
            StdioLink::spawn()
                .map_err(Into::into)
                .and_then(|link| run(&settings, link, &shutdown))
        }
        TransportSettings::Tcp { port } => {
            TcpLink::bind(port).and_then(|link| run(&settings, link, &shutdown))
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
