use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, Level};

use shared_utils::logging::{init_logging, LogConfig};
use vid_faststart::config::{DEFAULT_FFMPEG, DEFAULT_FFPROBE};
use vid_faststart::{prefix_for_label, ClassifyReport, MediaTools, PrepareReport};

#[derive(Parser)]
#[command(name = "vid-faststart")]
#[command(version, about = "Video aspect ratio classifier and fast-start MP4 remuxer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// ffprobe program or path
    #[arg(long, global = true, env = "VID_FASTSTART_FFPROBE", default_value = DEFAULT_FFPROBE)]
    ffprobe: PathBuf,

    /// ffmpeg program or path
    #[arg(long, global = true, env = "VID_FASTSTART_FFMPEG", default_value = DEFAULT_FFMPEG)]
    ffmpeg: PathBuf,

    /// Directory for log files (system temp dir by default)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aspect ratio label of a video
    Classify {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(short, long, default_value = "human")]
        output: OutputFormat,
    },

    /// Remux a video to INPUT.processing with fast-start metadata
    Faststart {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the storage prefix for an aspect ratio label
    Prefix {
        #[arg(value_name = "LABEL")]
        label: String,
    },

    /// Classify, then remux for fast start
    Prepare {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(short, long, default_value = "human")]
        output: OutputFormat,
    },

    /// Check that ffprobe and ffmpeg can be found
    Check,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().with_level(if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    // logging is best effort; a read-only temp dir must not block the tool
    let logging = match init_logging("vid_faststart", log_config) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("⚠️  Logging disabled: {:#}", e);
            false
        }
    };

    let tools = MediaTools::new()
        .with_ffprobe(&cli.ffprobe)
        .with_ffmpeg(&cli.ffmpeg);

    match cli.command {
        Commands::Classify { input, output } => {
            let aspect_ratio = or_exit(logging, tools.classify_aspect_ratio(&input));
            match output {
                OutputFormat::Human => println!("{}", aspect_ratio),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string(&ClassifyReport::new(&input, aspect_ratio))
                        .context("Failed to serialize report")?
                ),
            }
        }

        Commands::Faststart { input } => {
            let output = or_exit(logging, tools.rewrite_for_fast_start(&input));
            println!("{}", output.display());
        }

        Commands::Prefix { label } => {
            println!("{}", prefix_for_label(&label));
        }

        Commands::Prepare { input, output } => {
            let report = or_exit(logging, tools.prepare(&input));
            match output {
                OutputFormat::Human => print_report_human(&report),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?
                ),
            }
        }

        Commands::Check => {
            let missing = tools.missing_tools();
            for program in [&tools.ffprobe, &tools.ffmpeg] {
                let mark = if missing.contains(&program.as_path()) {
                    "❌"
                } else {
                    "✅"
                };
                println!("{} {}", mark, program.display());
            }
            if !missing.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Report an operation error once and exit non-zero. With logging up the
/// stderr layer prints it; otherwise it goes to stderr directly.
fn or_exit<T>(logging: bool, result: vid_faststart::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            if logging {
                error!(error = %e, "❌ Operation failed");
            } else {
                eprintln!("❌ Error: {}", e);
            }
            std::process::exit(1);
        }
    }
}

fn print_report_human(report: &PrepareReport) {
    println!("🎬 {}", report.input.display());
    println!("   Aspect ratio: {}", report.aspect_ratio);
    println!("   Prefix:       {}", report.prefix);
    println!("   Output:       {}", report.output.display());
}
