use std::ops::Range;

use despeckle_image::{Image, ImageSize};

use crate::error::FilterError;

/// A square window of side `2 * radius + 1` centered on a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    radius: usize,
}

impl Window {
    /// Create a window with the given radius. A radius of 1 is the 3x3 window.
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Distance from the center to the window edge.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of pixels along one side of the window, saturating at `usize::MAX`.
    pub fn side(&self) -> usize {
        self.radius.saturating_mul(2).saturating_add(1)
    }

    /// Number of pixels covered by the window, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.side().saturating_mul(self.side())
    }

    /// Rank of the median inside a window sample.
    pub fn median_rank(&self) -> usize {
        self.area() / 2
    }

    /// Whether the window centered at `(x, y)` lies entirely inside `size`.
    pub fn fits(&self, size: ImageSize, x: usize, y: usize) -> bool {
        x >= self.radius
            && y >= self.radius
            && x < size.width
            && y < size.height
            && size.width - x > self.radius
            && size.height - y > self.radius
    }

    /// Column and row ranges of the centers whose window fits inside `size`.
    ///
    /// Returns `None` when the image is too small to hold a single window.
    ///
    /// # Examples
    ///
    /// ```
    /// use despeckle_imgproc::filter::Window;
    ///
    /// let window = Window::new(1);
    /// assert_eq!(window.interior([5, 4].into()), Some((1..4, 1..3)));
    /// assert_eq!(window.interior([2, 9].into()), None);
    /// ```
    pub fn interior(&self, size: ImageSize) -> Option<(Range<usize>, Range<usize>)> {
        // a side of 2 * radius + 1 needs more than 2 * radius pixels
        if self.radius >= size.width.div_ceil(2) || self.radius >= size.height.div_ceil(2) {
            return None;
        }
        Some((
            self.radius..size.width - self.radius,
            self.radius..size.height - self.radius,
        ))
    }
}

/// Collect one channel of the window centered at `(cx, cy)` into `out`.
///
/// Values are written row by row from `cy - radius` to `cy + radius`, and within
/// each row from `cx - radius` to `cx + radius`.
///
/// # Arguments
///
/// * `src` - The image to sample.
/// * `cx` - The column of the window center.
/// * `cy` - The row of the window center.
/// * `radius` - The window radius.
/// * `channel` - The channel to collect.
/// * `out` - The destination buffer, exactly one window area long.
///
/// # Errors
///
/// [`FilterError::OutOfBounds`] if the window leaves the image,
/// [`FilterError::ChannelOutOfRange`] for an invalid channel and
/// [`FilterError::SampleLengthMismatch`] if `out` has the wrong length.
pub fn sample_window<T, const C: usize>(
    src: &Image<T, C>,
    cx: usize,
    cy: usize,
    radius: usize,
    channel: usize,
    out: &mut [T],
) -> Result<(), FilterError>
where
    T: Copy,
{
    let window = check_window(src, cx, cy, radius, channel)?;

    if out.len() != window.area() {
        return Err(FilterError::SampleLengthMismatch(out.len(), window.area()));
    }

    let stride = src.row_stride();
    let data = src.as_slice();

    for (dy, out_row) in out.chunks_exact_mut(window.side()).enumerate() {
        let first = (cy - radius + dy) * stride + (cx - radius) * C + channel;
        for (dx, v) in out_row.iter_mut().enumerate() {
            *v = data[first + dx * C];
        }
    }

    Ok(())
}

fn check_window<T, const C: usize>(
    src: &Image<T, C>,
    cx: usize,
    cy: usize,
    radius: usize,
    channel: usize,
) -> Result<Window, FilterError> {
    let window = Window::new(radius);

    if channel >= C {
        return Err(FilterError::ChannelOutOfRange(channel, C));
    }

    if !window.fits(src.size(), cx, cy) {
        return Err(FilterError::OutOfBounds {
            x: cx,
            y: cy,
            radius,
            width: src.width(),
            height: src.height(),
        });
    }

    Ok(window)
}

/// Allocating variant of [`sample_window`].
///
/// # Examples
///
/// ```
/// use despeckle_image::Image;
/// use despeckle_imgproc::filter::sample;
///
/// let image = Image::<u8, 1>::new([3, 3].into(), (0..9).collect()).unwrap();
///
/// assert_eq!(sample(&image, 1, 1, 1, 0).unwrap(), (0..9).collect::<Vec<u8>>());
/// assert!(sample(&image, 0, 1, 1, 0).is_err());
/// ```
pub fn sample<T, const C: usize>(
    src: &Image<T, C>,
    cx: usize,
    cy: usize,
    radius: usize,
    channel: usize,
) -> Result<Vec<T>, FilterError>
where
    T: Copy + Default,
{
    // the window is validated first so the allocation is bounded by the image
    let window = check_window(src, cx, cy, radius, channel)?;
    let mut out = vec![T::default(); window.area()];
    sample_window(src, cx, cy, radius, channel, &mut out)?;
    Ok(out)
}
