use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter};
use ytframes::{
    FfmpegLogLevel, GifOptions, OperationType, Pipeline, ProgressCallback, ProgressInfo,
    RunConfiguration, RunReport, YtDlp, DEFAULT_GIF_DURATION,
};

const CLI_AFTER_HELP: &str = "Examples:\n  ytframes https://youtu.be/dQw4w9WgXcQ 0:10 0:12.5\n  ytframes https://youtu.be/dQw4w9WgXcQ 1:00 1:30 --frame_interval 10 --output clips --save_meta\n  ytframes https://youtu.be/dQw4w9WgXcQ 0:00 0:03 --create_gif --gif_duration 300 --remove_clip";

#[derive(Debug, Parser)]
#[command(
    name = "ytframes",
    version,
    about = "YouTube video frame extractor",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// YouTube video URL.
    url: String,

    /// Start time in mm:ss or mm:ss.ss format.
    start_time: String,

    /// End time in mm:ss or mm:ss.ss format.
    end_time: String,

    /// Keep every Nth frame (default: every frame).
    #[arg(long = "frame_interval", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    frame_interval: u64,

    /// Output folder for the clip, frames, and GIF (default: derived from the video title).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Remove the downloaded video clip after extracting frames.
    #[arg(long = "remove_clip")]
    remove_clip: bool,

    /// Save a meta.json file with the run parameters.
    #[arg(long = "save_meta")]
    save_meta: bool,

    /// Generate a looping GIF from the extracted frames.
    #[arg(long = "create_gif")]
    create_gif: bool,

    /// Total GIF playback time in hundredths of a second.
    #[arg(long = "gif_duration", default_value_t = DEFAULT_GIF_DURATION)]
    gif_duration: u32,

    /// Frame image extension.
    #[arg(long, default_value = "jpg", value_parser = ["jpg", "jpeg", "png", "bmp"])]
    ext: String,

    /// yt-dlp executable to run.
    #[arg(long = "yt_dlp", default_value = "yt-dlp")]
    yt_dlp: PathBuf,

    /// yt-dlp format selector (passed as -f).
    #[arg(long)]
    format: Option<String>,

    /// Show a progress bar while writing frames and encoding the GIF.
    #[arg(long)]
    progress: bool,

    /// Show debug logging.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors.
    #[arg(long)]
    quiet: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long = "ffmpeg_log_level", default_value = "error")]
    ffmpeg_log_level: FfmpegLogLevel,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn configuration(&self) -> Result<RunConfiguration, ytframes::YtFramesError> {
        let mut config = RunConfiguration::new(&self.url, &self.start_time, &self.end_time)?
            .with_frame_interval(self.frame_interval)
            .with_remove_clip(self.remove_clip)
            .with_save_meta(self.save_meta)
            .with_create_gif(self.create_gif)
            .with_frame_extension(&self.ext)
            .with_gif_options(GifOptions::new().with_total_duration(self.gif_duration));
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }
        Ok(config)
    }

    fn fetcher(&self) -> YtDlp {
        let fetcher = YtDlp::new().with_program(&self.yt_dlp);
        match &self.format {
            Some(format) => fetcher.with_format(format),
            None => fetcher,
        }
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Cyan,
        Level::Trace => Color::Magenta,
    }
}

fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for("ytframes", level)
        .format(|out, message, record| {
            let label = format!("{:<5}", record.level()).color(level_color(record.level()));
            out.finish(format_args!("[{label} {}] {message}", record.target()))
        })
        .chain(std::io::stderr())
        .apply()
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {prefix} {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.current == 1 {
            let prefix = match info.operation {
                OperationType::FrameExtraction => "frames",
                OperationType::GifExport => "gif",
                _ => "working",
            };
            self.bar.reset();
            self.bar.set_prefix(prefix);
            self.bar.set_length(info.total.unwrap_or(0));
        }
        self.bar.set_position(info.current);
        if let Some(frame) = info.current_frame {
            self.bar.set_message(format!("frame {frame}"));
        }
    }
}

fn print_summary(report: &RunReport) {
    println!(
        "{} {}",
        "success:".green().bold(),
        format!(
            "Extracted {} frame(s) to {}",
            report.sample.frame_indices.len(),
            report.output_directory.display()
        )
        .green()
    );
    if report.clip_removed {
        println!("{} {}", "removed".yellow().bold(), report.clip_path.display());
    } else {
        println!("{} {}", "clip".cyan().bold(), report.clip_path.display());
    }
    if let Some(path) = &report.metadata_path {
        println!("{} {}", "saved".green().bold(), path.display());
    }
    if let Some(gif) = &report.gif {
        println!(
            "{} {} ({} frames, {} ms each)",
            "saved".green().bold(),
            gif.path.display(),
            gif.frame_count,
            u32::from(gif.frame_delay) * 10
        );
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_level())?;
    ytframes::set_ffmpeg_log_level(cli.ffmpeg_log_level);

    let config = cli.configuration()?;
    let mut pipeline = Pipeline::new(config, cli.fetcher());

    let progress = cli.progress.then(|| Arc::new(TerminalProgress::new()));
    if let Some(progress) = &progress {
        pipeline = pipeline.with_progress(Arc::clone(progress) as Arc<dyn ProgressCallback>);
    }

    let result = pipeline.run();
    if let Some(progress) = &progress {
        progress.finish();
    }

    print_summary(&result?);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
