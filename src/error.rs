use thiserror::Error;

/// Errors that can occur while analysing outline frames.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("no contour found in image")]
    NoContour,

    #[error("expected a single foreground blob, found {count}")]
    MultipleBlobs { count: usize },

    #[error("contour has {points} points, need at least {minimum}")]
    ContourTooSmall { points: usize, minimum: usize },

    #[error("sequence has no frames")]
    EmptySequence,

    #[error("degenerate contour: zero area (m00 == 0)")]
    DegenerateContour,

    #[error("{tool} did not finish within {seconds}s and was killed")]
    ExternalToolTimeout { tool: String, seconds: u64 },

    #[error("external tool failed: {0}")]
    ExternalTool(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: Box<ShapeError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShapeError {
    /// Attach the frame index a failure happened in.
    pub fn in_frame(self, index: usize) -> Self {
        match self {
            ShapeError::Frame { .. } => self,
            other => ShapeError::Frame {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, looking through any frame wrapper.
    pub fn root(&self) -> &ShapeError {
        match self {
            ShapeError::Frame { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
