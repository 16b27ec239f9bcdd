use std::path::Path;

use despeckle_image::{Image, ImageSize};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};

use crate::error::IoError;

/// An image decoded from disk with the channel layout of its container.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedImage {
    /// The container has no alpha channel.
    Rgb8(Image<u8, 3>),
    /// The container carries an alpha channel.
    Rgba8(Image<u8, 4>),
}

impl DecodedImage {
    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DecodedImage::Rgb8(img) => img.size(),
            DecodedImage::Rgba8(img) => img.size(),
        }
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        match self {
            DecodedImage::Rgb8(img) => img.num_channels(),
            DecodedImage::Rgba8(img) => img.num_channels(),
        }
    }
}

fn decode(file_path: &Path) -> Result<DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // sniff the content so files with a wrong or missing extension still decode
    let img = ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {}x{} {:?}",
        file_path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

fn size_of(width: u32, height: u32) -> ImageSize {
    ImageSize {
        width: width as usize,
        height: height as usize,
    }
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// The method tries to read from any image format supported by the image crate.
/// An alpha channel, if present, is discarded.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
///
/// # Returns
///
/// An RGB image with three channels.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let rgb = decode(file_path.as_ref())?.to_rgb8();
    let size = size_of(rgb.width(), rgb.height());
    Ok(Image::new(size, rgb.into_raw())?)
}

/// Reads an image from the given file path as 8-bit RGBA.
///
/// Images without alpha get a fully opaque alpha channel.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
///
/// # Returns
///
/// An RGBA image with four channels.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let rgba = decode(file_path.as_ref())?.to_rgba8();
    let size = size_of(rgba.width(), rgba.height());
    Ok(Image::new(size, rgba.into_raw())?)
}

/// Reads an image keeping the alpha channel only when the file has one.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DecodedImage, IoError> {
    let img = decode(file_path.as_ref())?;
    let size = size_of(img.width(), img.height());

    if img.color().has_alpha() {
        Ok(DecodedImage::Rgba8(Image::new(size, img.to_rgba8().into_raw())?))
    } else {
        Ok(DecodedImage::Rgb8(Image::new(size, img.to_rgb8().into_raw())?))
    }
}

/// Output format for `file_path`, JPEG when the extension is missing or unknown.
fn output_format(file_path: &Path) -> ImageFormat {
    ImageFormat::from_path(file_path).unwrap_or(ImageFormat::Jpeg)
}

/// Formats whose `image` encoder accepts RGBA8 buffers.
fn supports_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Ico
            | ImageFormat::Gif
            | ImageFormat::Tiff
            | ImageFormat::Tga
            | ImageFormat::WebP
            | ImageFormat::Qoi
    )
}

fn encoder_dims(size: ImageSize) -> Result<(u32, u32), IoError> {
    let width =
        u32::try_from(size.width).map_err(|_| IoError::InvalidImageDimension(size.width))?;
    let height =
        u32::try_from(size.height).map_err(|_| IoError::InvalidImageDimension(size.height))?;
    Ok((width, height))
}

fn save(
    file_path: &Path,
    data: &[u8],
    size: ImageSize,
    color: ColorType,
    format: ImageFormat,
) -> Result<(), IoError> {
    let (width, height) = encoder_dims(size)?;
    image::save_buffer_with_format(file_path, data, width, height, color, format)?;
    log::debug!("encoded {} as {:?}", file_path.display(), format);
    Ok(())
}

/// Writes an RGB image to the given file path.
///
/// The format is taken from the file extension; JPEG is used when the
/// extension is missing or not recognized.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    save(
        file_path,
        image.as_slice(),
        image.size(),
        ColorType::Rgb8,
        output_format(file_path),
    )
}

/// Writes an RGBA image to the given file path.
///
/// PNG, BMP, ICO, GIF, TIFF, TGA, WebP and QOI keep the alpha channel. Other
/// formats (e.g. JPEG) receive the RGB channels only.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let format = output_format(file_path);

    if supports_alpha(format) {
        return save(
            file_path,
            image.as_slice(),
            image.size(),
            ColorType::Rgba8,
            format,
        );
    }

    log::warn!(
        "{:?} cannot store alpha, writing {} without it",
        format,
        file_path.display()
    );

    let rgb = image
        .as_slice()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect::<Vec<_>>();

    save(file_path, &rgb, image.size(), ColorType::Rgb8, format)
}

/// Writes a decoded image back with its own channel layout.
pub fn write_image(file_path: impl AsRef<Path>, image: &DecodedImage) -> Result<(), IoError> {
    match image {
        DecodedImage::Rgb8(img) => write_image_rgb8(file_path, img),
        DecodedImage::Rgba8(img) => write_image_rgba8(file_path, img),
    }
}
