#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// High-level read and write functions for images.
pub mod functional;

pub use crate::error::IoError;
pub use crate::functional::{
    read_image_any, read_image_any_rgb8, read_image_any_rgba8, write_image, write_image_rgb8,
    write_image_rgba8, DecodedImage,
};
