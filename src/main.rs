//! tweaklog - command-line tools for automation recordings
//!
//! Works on recordings exported as JSON: inspect, convert, merge, trim and
//! replay them against a logging sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tweaklog_rs::{
    config::{AutomationConfig, ExportFormat},
    sink::LoggingSink,
    transform::{
        self, export::export_as, generate_filename, import_from_json, merge_recordings,
        recording_stats, trim_recording,
    },
    transport::ManualTransport,
    Player, Recording,
};

#[derive(Parser)]
#[command(name = "tweaklog")]
#[command(about = "Automation recording tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TWEAKLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print event statistics for a recording
    Stats {
        /// Recording JSON file
        input: PathBuf,
    },
    /// Convert a recording to JSON or CSV
    Export {
        /// Recording JSON file
        input: PathBuf,
        /// Output format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Output file (defaults to a generated name in the configured directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Concatenate recordings end-to-end
    Merge {
        /// Recording JSON files, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Cut a recording down to a time window
    Trim {
        /// Recording JSON file
        input: PathBuf,
        /// Window start in milliseconds
        #[arg(long, allow_negative_numbers = true)]
        start: i64,
        /// Window end in milliseconds
        #[arg(long, allow_negative_numbers = true)]
        end: i64,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a recording against a logging sink on a simulated transport
    Replay {
        /// Recording JSON file
        input: PathBuf,
        /// Start position in milliseconds
        #[arg(long, default_value_t = 0)]
        from: i64,
        /// Pace frames in real time instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let config = AutomationConfig::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Stats { input } => {
            let recording = read_recording(&input)?;
            print_stats(&recording);
        }
        Commands::Export {
            input,
            format,
            output,
            stdout,
        } => {
            let recording = read_recording(&input)?;
            let format = format.map_or(config.export.default_format, ExportFormat::from);
            let contents = export_as(&recording, format)?;

            if stdout {
                print!("{}", contents);
            } else {
                let path = output.unwrap_or_else(|| {
                    let name = generate_filename(
                        recording.display_name(),
                        format.extension(),
                        chrono::Local::now().date_naive(),
                    );
                    match &config.export.output_dir {
                        Some(dir) => dir.join(name),
                        None => PathBuf::from(name),
                    }
                });
                write_output(&path, &contents)?;
                tracing::info!("Exported {} as {} to {:?}", recording.display_name(), format, path);
            }
        }
        Commands::Merge { inputs, output } => {
            let recordings = inputs
                .iter()
                .map(|path| read_recording(path))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge_recordings(&recordings);
            tracing::info!(
                "Merged {} recordings into {} events ({})",
                recordings.len(),
                merged.event_count(),
                transform::format_time(merged.duration_ms)
            );
            emit_json(&merged, output.as_deref())?;
        }
        Commands::Trim {
            input,
            start,
            end,
            output,
        } => {
            let recording = read_recording(&input)?;
            let trimmed = trim_recording(&recording, start, end);
            tracing::info!(
                "Trimmed to {} events ({})",
                trimmed.event_count(),
                transform::format_time(trimmed.duration_ms)
            );
            emit_json(&trimmed, output.as_deref())?;
        }
        Commands::Replay {
            input,
            from,
            realtime,
        } => {
            let recording = read_recording(&input)?;
            replay(recording, &config, from, realtime);
        }
    }

    Ok(())
}

fn init_tracing(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tweaklog_rs=debug"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tweaklog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn read_recording(path: &Path) -> Result<Recording> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    import_from_json(&contents).with_context(|| format!("Failed to import {:?}", path))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

fn emit_json(recording: &Recording, output: Option<&Path>) -> Result<()> {
    let json = transform::export_to_json(recording)?;
    match output {
        Some(path) => write_output(path, &json),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

fn print_stats(recording: &Recording) {
    let stats = recording_stats(recording);

    println!("Name:      {}", recording.display_name());
    println!("Track:     {}", recording.track_id);
    println!("Duration:  {}", transform::format_time(stats.duration_ms));
    println!("Events:    {}", stats.total_events);
    for (kind, count) in &stats.by_kind {
        println!("  {:<14}{}", kind.as_str(), count);
    }
    if !stats.by_param.is_empty() {
        println!("Parameters:");
        for (param, count) in &stats.by_param {
            println!("  {:<14}{}", param.as_str(), count);
        }
    }
    if !stats.by_layer.is_empty() {
        println!("Layers:");
        for (layer, count) in &stats.by_layer {
            println!("  {:<14}{}", layer, count);
        }
    }
    if let (Some(first), Some(last)) = (stats.first_event_ms, stats.last_event_ms) {
        println!(
            "Span:      {} - {}",
            transform::format_time(first),
            transform::format_time(last)
        );
    }
}

fn replay(recording: Recording, config: &AutomationConfig, from_ms: i64, realtime: bool) {
    let transport = Arc::new(ManualTransport::playing_at(0.0));
    let mut player = Player::with_config(transport.clone(), &config.playback);
    player.load(recording);
    player.seek(from_ms);

    if !player.play() {
        tracing::warn!("Playback is disabled in the config, nothing to replay");
        return;
    }

    let interval = config.playback.frame_interval();
    let mut sink = LoggingSink::new();
    let mut frames = 0u64;

    while player.wants_frames() {
        transport.advance(interval.as_secs_f64());
        player.tick(&mut sink);
        frames += 1;
        if realtime {
            std::thread::sleep(interval);
        }
    }

    tracing::info!(
        "Replay finished at {} after {} frames, {} events applied",
        player.position_display(),
        frames,
        sink.applied()
    );
}
