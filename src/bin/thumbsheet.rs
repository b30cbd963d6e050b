use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use thumbsheet::{
    FfmpegLogLevel, GeneratorOptions, ProgressCallback, ProgressInfo, RunSummary, TaskStatus,
    ThumbnailGenerator, read_index,
};

const CLI_AFTER_HELP: &str = "Examples:\n  thumbsheet generate ~/Videos --out ~/Videos/thumbs\n  thumbsheet generate ~/Videos --out thumbs --buckets 10,30 --points 0.1,0.5,0.9 --workers 6 --progress\n  thumbsheet index thumbs/over_10min/MyVideoThumbs.dat --json\n  thumbsheet completions zsh > _thumbsheet";

#[derive(Debug, Parser)]
#[command(
    name = "thumbsheet",
    version,
    about = "Generate duration-bucketed thumbnail sheets for video collections",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while generating.
    #[arg(long, global = true)]
    progress: bool,

    /// FFmpeg log level for frame extraction (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate thumbnail sheets and index files.
    #[command(
        about = "Generate thumbnail sheets",
        after_help = "Examples:\n  thumbsheet generate ~/Videos --out thumbs\n  thumbsheet generate ~/Videos --out thumbs --buckets 5,20,60 --width 12 --json"
    )]
    Generate {
        /// Directory searched recursively for videos.
        input: PathBuf,
        /// Directory that receives the bucket folders.
        #[arg(long)]
        out: PathBuf,
        /// Comma-separated sample points as fractions of the duration.
        #[arg(long, value_delimiter = ',', default_values_t = [0.30, 0.60, 0.80])]
        points: Vec<f64>,
        /// Sheet width in units of --dpi pixels.
        #[arg(long, default_value_t = 17.0)]
        width: f64,
        /// Pixels per sheet width unit.
        #[arg(long, default_value_t = 100)]
        dpi: u32,
        /// Comma-separated bucket thresholds in minutes.
        #[arg(long, value_delimiter = ',', default_values_t = [10.0])]
        buckets: Vec<f64>,
        /// Number of videos processed in parallel.
        #[arg(long, default_value_t = 3)]
        workers: usize,
        /// Directory containing the ffmpeg executable (default: search PATH).
        #[arg(long)]
        ffmpeg_dir: Option<PathBuf>,
        /// Comma-separated recognized extensions.
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
        /// Print the run summary as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the records of an index file.
    #[command(
        about = "List index file records",
        after_help = "Examples:\n  thumbsheet index thumbs/less_than_10min/MyVideoThumbs.dat"
    )]
    Index {
        /// Path to a MyVideoThumbs.dat file.
        path: PathBuf,
        /// Output records as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.completed);
        let name = info
            .source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let message = match info.status {
            TaskStatus::Created => name.normal(),
            TaskStatus::AlreadyExists => name.dimmed(),
            TaskStatus::Rejected => name.red(),
        };
        self.bar.set_message(message.to_string());
        if info.completed >= info.total {
            self.bar.finish_with_message("done");
        }
    }
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose {
        "thumbsheet=debug"
    } else {
        "thumbsheet=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn summary_json(summary: &RunSummary) -> serde_json::Value {
    json!({
        "discovered": summary.discovered,
        "created": summary.created,
        "reused": summary.reused,
        "rejected": summary.rejected,
        "skipped": summary.skipped,
        "rejections": summary.rejections,
        "elapsed_seconds": summary.elapsed.as_secs_f64(),
        "files_per_second": summary.files_per_second(),
        "index_files": summary
            .index_files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>(),
    })
}

fn print_index(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_index(path)?;
    if json {
        let payload: Vec<_> = records
            .iter()
            .map(|record| {
                json!({
                    "bucket_folder": record.bucket_folder,
                    "output_file_name": record.output_file_name,
                    "source_path": record.source_path,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for record in &records {
            let marker = if record.sheet_path().is_file() {
                "ok".green()
            } else {
                "missing".yellow()
            };
            println!("[{marker}] {} -> {}", record.source_path, record.output_file_name);
        }
        println!("{} records", records.len());
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::Generate {
            input,
            out,
            points,
            width,
            dpi,
            buckets,
            workers,
            ffmpeg_dir,
            extensions,
            json,
        } => {
            let mut options = GeneratorOptions::new(input, out)
                .with_sample_points(points)
                .with_sheet_width(width)
                .with_dpi(dpi)
                .with_bucket_minutes(buckets)
                .with_workers(workers);
            if let Some(directory) = ffmpeg_dir {
                options = options.with_tool_directory(directory);
            }
            if let Some(extensions) = extensions {
                options = options.with_extensions(extensions);
            }
            if let Some(level) = &cli.global.log_level {
                let parsed = FfmpegLogLevel::parse(level)
                    .ok_or(format!("unsupported --log-level: {level}"))?;
                options = options.with_tool_log_level(parsed);
            }
            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new()?));
            }

            let summary = ThumbnailGenerator::new(options).run()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary_json(&summary))?);
            } else {
                print!("{summary}");
                let status = if summary.failed() == 0 {
                    "success:".green().bold()
                } else {
                    "done:".yellow().bold()
                };
                println!(
                    "{status} {} sheets indexed, {} files failed",
                    summary.succeeded(),
                    summary.failed()
                );
            }
        }
        Commands::Index { path, json } => print_index(&path, json)?,
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "thumbsheet", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["thumbsheet", "generate", "in", "--out", "out"]).unwrap();
        match cli.command {
            Commands::Generate {
                points,
                buckets,
                workers,
                width,
                extensions,
                ..
            } => {
                assert_eq!(points, vec![0.30, 0.60, 0.80]);
                assert_eq!(buckets, vec![10.0]);
                assert_eq!(workers, 3);
                assert_eq!(width, 17.0);
                assert!(extensions.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn comma_separated_lists() {
        let cli = Cli::try_parse_from([
            "thumbsheet",
            "generate",
            "in",
            "--out",
            "out",
            "--points",
            "0.1,0.5",
            "--buckets",
            "5,20,60",
            "--extensions",
            "mp4,webm",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                points,
                buckets,
                extensions,
                ..
            } => {
                assert_eq!(points, vec![0.1, 0.5]);
                assert_eq!(buckets, vec![5.0, 20.0, 60.0]);
                assert_eq!(extensions, Some(vec!["mp4".to_string(), "webm".to_string()]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn summary_json_fields() {
        let summary = RunSummary {
            discovered: 4,
            created: 2,
            reused: 1,
            rejected: 1,
            elapsed: Duration::from_secs(2),
            ..RunSummary::default()
        };
        let value = summary_json(&summary);
        assert_eq!(value["created"], 2);
        assert_eq!(value["skipped"], 0);
        assert_eq!(value["files_per_second"], 2.0);
    }
}
