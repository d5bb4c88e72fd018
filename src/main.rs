use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use outline_shape::batch::{self, BatchOptions};
use outline_shape::{AnalysisConfig, ResamplingMethod, SegmentationConfig};

#[derive(Parser)]
#[command(
    name = "outline-shape",
    about = "Canonical outlines and shape descriptors for segmented frame sequences"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse one outline directory of frame masks (0000.tif, 0001.tif, ...)
    Sequence {
        /// Directory holding the frame masks; outputs are written here too
        #[arg(short, long)]
        dir: PathBuf,

        /// Number of frames (counted from the directory if omitted)
        #[arg(short = 'n', long)]
        frames: Option<usize>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
    /// Segment and analyse every recording under a directory tree
    Batch {
        /// Root directory searched recursively for recordings
        #[arg(short, long)]
        root: PathBuf,

        /// Segmentation tool executable (e.g. headless Fiji/ImageJ)
        #[arg(long)]
        tool: Option<PathBuf>,

        /// Macro passed to the segmentation tool
        #[arg(long = "macro", default_value = "ExtractOutline.ijm")]
        macro_path: PathBuf,

        /// Seconds before the segmentation tool is killed
        #[arg(long, default_value = "90")]
        timeout: u64,

        /// Substring a recording's file name must contain
        #[arg(long, default_value = "seg")]
        needle: String,

        /// Recording file extension
        #[arg(long, default_value = "avi")]
        extension: String,

        /// Manifest of recordings and frame counts
        #[arg(long, default_value = "list_data.csv")]
        manifest: PathBuf,

        /// Continue with the next recording when one fails
        #[arg(long)]
        keep_going: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Foreground is any pixel brighter than this level
    #[arg(long, default_value = "0")]
    threshold: u8,

    /// Keep about one in this many contour points
    #[arg(long, default_value = "10")]
    reduction: f64,

    /// Resample by exact arc length instead of the greedy scan
    #[arg(long)]
    arc_length: bool,

    /// Keep the first traced blob instead of rejecting multi-blob masks
    #[arg(long)]
    allow_multiple_blobs: bool,

    /// Frame mask extension
    #[arg(long, default_value = "tif")]
    frame_ext: String,
}

impl AnalysisArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            threshold: self.threshold,
            reduction_factor: self.reduction,
            resampling: if self.arc_length {
                ResamplingMethod::ArcLength
            } else {
                ResamplingMethod::Greedy
            },
            require_single_blob: !self.allow_multiple_blobs,
            frame_extension: self.frame_ext.clone(),
            ..AnalysisConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    eprintln!();
    match cli.command {
        Command::Sequence {
            dir,
            frames,
            analysis,
        } => {
            eprintln!("  outline-shape \u{00b7} {}", dir.display());
            eprintln!();
            let report = outline_shape::run_sequence(&dir, frames, &analysis.config())?;
            eprintln!();
            eprintln!(
                "  \u{2713} {} frames \u{00b7} {}",
                report.coordinates.frames.len(),
                dir.display()
            );
        }
        Command::Batch {
            root,
            tool,
            macro_path,
            timeout,
            needle,
            extension,
            manifest,
            keep_going,
            analysis,
        } => {
            eprintln!("  outline-shape \u{00b7} batch {}", root.display());
            eprintln!();
            let segmentation = tool.map(|exe| {
                let mut config = SegmentationConfig::new(exe, macro_path);
                config.timeout = Duration::from_secs(timeout);
                config
            });
            let options = BatchOptions {
                needle,
                extension,
                keep_going,
            };
            let entries = batch::run(
                &root,
                &manifest,
                &analysis.config(),
                segmentation.as_ref(),
                &options,
            )?;
            eprintln!();
            eprintln!(
                "  \u{2713} {} recordings \u{00b7} {}",
                entries.len(),
                manifest.display()
            );
        }
    }
    eprintln!();

    Ok(())
}
