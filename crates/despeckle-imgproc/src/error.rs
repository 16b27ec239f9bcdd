use despeckle_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filtering operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// An order statistic was requested from an empty sequence.
    #[error("cannot select an order statistic from an empty sequence")]
    EmptyInput,

    /// The requested rank does not index into the sequence.
    #[error("rank {rank} is out of range for a sequence of length {len}")]
    RankOutOfRange {
        /// The requested rank.
        rank: usize,
        /// The length of the sequence.
        len: usize,
    },

    /// The image has zero width or zero height.
    #[error("cannot filter an empty image")]
    EmptyImage,

    /// A neighborhood window does not fit inside the image.
    ///
    /// The filter never samples border pixels, so this indicates a caller bug.
    #[error("window of radius {radius} centered at ({x}, {y}) exits the {width}x{height} image")]
    OutOfBounds {
        /// Column of the window center.
        x: usize,
        /// Row of the window center.
        y: usize,
        /// Radius of the window.
        radius: usize,
        /// Width of the image.
        width: usize,
        /// Height of the image.
        height: usize,
    },

    /// The channel index is not part of the image.
    #[error("channel index ({0}) is out of bounds ({1})")]
    ChannelOutOfRange(usize, usize),

    /// The sample buffer cannot hold exactly one window.
    #[error("sample buffer length ({0}) does not match the window area ({1})")]
    SampleLengthMismatch(usize, usize),

    /// Source and destination images differ in size.
    #[error("source size ({0}x{1}) does not match destination size ({2}x{3})")]
    ImageSizeMismatch(usize, usize, usize, usize),

    /// The parallel execution failed.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// An image accessor failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}
