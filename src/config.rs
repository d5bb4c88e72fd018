use std::path::PathBuf;
use std::time::Duration;

/// All per-sequence analysis parameters in one struct.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // -- Bitmap stage --
    /// Pixels strictly brighter than this level are foreground.
    /// 0 turns any nonzero pixel into foreground (presence mask).
    pub threshold: u8,
    /// Reject frames whose mask holds more than one blob instead of
    /// silently keeping the first traced contour.
    pub require_single_blob: bool,

    // -- Resampling --
    /// Keep roughly one in `reduction_factor` contour points.
    /// Also the minimum number of points a contour must have.
    pub reduction_factor: f64,
    /// How the dense contour is thinned out.
    pub resampling: ResamplingMethod,

    // -- Files --
    /// Extension of the per-frame raster files (`0000.<ext>`).
    pub frame_extension: String,
    /// Decimal places written to every text output.
    pub decimals: usize,
}

/// Contour thinning algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResamplingMethod {
    /// Greedy forward scan: keep a point once it is farther than the target
    /// spacing from the last kept point. Point counts depend on curvature.
    #[default]
    Greedy,
    /// Walk the closed polyline and emit a point every `spacing` of arc
    /// length, interpolating between contour points.
    ArcLength,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: 0,
            require_single_blob: true,
            reduction_factor: 10.0,
            resampling: ResamplingMethod::Greedy,
            frame_extension: "tif".to_string(),
            decimals: 2,
        }
    }
}

impl AnalysisConfig {
    /// Smallest contour the resampler accepts.
    pub fn min_contour_points(&self) -> usize {
        self.reduction_factor.ceil().max(1.0) as usize
    }
}

/// How to launch the external segmentation tool that fills a recording's
/// outline directory with per-frame masks.
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// Tool executable (e.g. a headless ImageJ/Fiji launcher).
    pub executable: PathBuf,
    /// Macro passed to the tool with `-macro`.
    pub macro_path: PathBuf,
    /// Wall-clock budget before the tool is killed.
    pub timeout: Duration,
    /// How often the child process is polled.
    pub poll_interval: Duration,
}

impl SegmentationConfig {
    pub fn new(executable: impl Into<PathBuf>, macro_path: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            macro_path: macro_path.into(),
            timeout: Duration::from_secs(90),
            poll_interval: Duration::from_secs(1),
        }
    }
}
