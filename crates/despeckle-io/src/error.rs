use std::path::PathBuf;

use despeckle_image::ImageError;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// Error when the file cannot be opened.
    #[error("Failed to open the file")]
    FileError(#[from] std::io::Error),

    /// Error when the image crate fails to decode or encode.
    #[error("Failed to decode or encode the image")]
    ImageCrateError(#[from] image::ImageError),

    /// Error when the decoded buffer does not form a valid image.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when an image dimension cannot be represented by the encoder.
    #[error("Image dimension ({0}) is too large to encode")]
    InvalidImageDimension(usize),
}
