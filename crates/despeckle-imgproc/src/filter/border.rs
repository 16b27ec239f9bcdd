use despeckle_image::Image;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::error::FilterError;

/// Copy the pixels whose window of `radius` does not fit in the image.
///
/// The outer ring of thickness `radius` is copied unchanged from `src` to `dst`.
/// The top and bottom bands are copied as whole rows, then the left and right
/// bands of every row; the corners are written by both passes with the same
/// value. When the image is smaller than the window the bands cover every pixel
/// and `dst` ends up equal to `src`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `radius` - The thickness of the ring to copy.
///
/// # Examples
///
/// ```
/// use despeckle_image::Image;
/// use despeckle_imgproc::filter::fill_border;
///
/// let src = Image::<u8, 1>::new([3, 3].into(), (1..=9).collect()).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// fill_border(&src, &mut dst, 1).unwrap();
///
/// assert_eq!(dst.as_slice(), &[1, 2, 3, 4, 0, 6, 7, 8, 9]);
/// ```
pub fn fill_border<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    radius: usize,
) -> Result<(), FilterError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(FilterError::ImageSizeMismatch(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if src.is_empty() || radius == 0 {
        return Ok(());
    }

    let (width, height) = (src.width(), src.height());
    let stride = src.row_stride();

    // rows [0, top) and [bottom, height)
    let top = radius.min(height);
    let bottom = height.saturating_sub(radius).max(top);

    // columns [0, left) and [right, width)
    let left = radius.min(width) * C;
    let right = width.saturating_sub(radius).max(radius.min(width)) * C;

    log::trace!(
        "copying border of radius {} for a {}x{} image",
        radius,
        width,
        height
    );

    let src_slice = src.as_slice();
    let dst_slice = dst.as_slice_mut();

    dst_slice[..top * stride].copy_from_slice(&src_slice[..top * stride]);
    dst_slice[bottom * stride..].copy_from_slice(&src_slice[bottom * stride..]);

    dst_slice
        .par_chunks_exact_mut(stride)
        .zip(src_slice.par_chunks_exact(stride))
        .for_each(|(dst_row, src_row)| {
            dst_row[..left].copy_from_slice(&src_row[..left]);
            dst_row[right..].copy_from_slice(&src_row[right..]);
        });

    Ok(())
}
