use despeckle_image::Image;

use crate::{
    error::FilterError,
    filter::{border::fill_border, neighborhood::sample_window, Window},
    parallel::{execute_rows, ExecutionStrategy},
    select::{OrderStatistic, Selector},
};

/// How the fourth channel of a four channel image is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaPolicy {
    /// Copy the alpha channel from the source pixel unchanged.
    #[default]
    Preserve,
    /// Median filter the alpha channel like any color channel.
    Filter,
}

impl AlphaPolicy {
    /// Number of leading channels that go through the median.
    ///
    /// The policy only applies to four channel images.
    pub fn filtered_channels(&self, channels: usize) -> usize {
        match self {
            AlphaPolicy::Preserve if channels == 4 => 3,
            _ => channels,
        }
    }
}

/// Configuration of the median filter.
///
/// # Examples
///
/// ```
/// use despeckle_image::Image;
/// use despeckle_imgproc::filter::{AlphaPolicy, MedianFilter};
/// use despeckle_imgproc::parallel::ExecutionStrategy;
///
/// let filter = MedianFilter::new()
///     .with_radius(2)
///     .with_alpha(AlphaPolicy::Filter)
///     .with_strategy(ExecutionStrategy::Serial);
///
/// let image = Image::<u8, 4>::from_size_val([8, 8].into(), 7).unwrap();
/// let filtered = filter.apply(&image).unwrap();
///
/// assert_eq!(filtered, image);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianFilter {
    radius: usize,
    alpha: AlphaPolicy,
    selector: Option<Selector>,
    strategy: ExecutionStrategy,
}

impl Default for MedianFilter {
    fn default() -> Self {
        Self {
            radius: 1,
            alpha: AlphaPolicy::default(),
            selector: None,
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl MedianFilter {
    /// Create the canonical 3x3 median filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window radius.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// Set the treatment of the alpha channel.
    pub fn with_alpha(mut self, alpha: AlphaPolicy) -> Self {
        self.alpha = alpha;
        self
    }

    /// Force a selection strategy instead of picking one from the radius.
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Set how the rows are scheduled.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The window radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// The window the filter slides over the image.
    pub fn window(&self) -> Window {
        Window::new(self.radius)
    }

    /// The alpha channel policy.
    pub fn alpha(&self) -> AlphaPolicy {
        self.alpha
    }

    /// The execution strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// The selection strategy in use.
    ///
    /// Unless forced, the 3x3 window uses the sorting network and every other
    /// size uses partition based selection.
    pub fn selector(&self) -> Selector {
        match self.selector {
            Some(selector) => selector,
            None if self.radius == 1 => Selector::MedianNetwork,
            None => Selector::QuickSelect,
        }
    }

    /// Filter `src` into a newly allocated image.
    ///
    /// # Errors
    ///
    /// [`FilterError::EmptyImage`] if `src` has zero width or height.
    pub fn apply<T, const C: usize>(&self, src: &Image<T, C>) -> Result<Image<T, C>, FilterError>
    where
        T: Copy + Ord + Default + Send + Sync,
    {
        if src.is_empty() {
            return Err(FilterError::EmptyImage);
        }

        let mut dst = Image::from_size_val(src.size(), T::default())?;
        median_filter(src, &mut dst, self)?;

        Ok(dst)
    }
}

/// Remove salt-and-pepper noise with the canonical 3x3 median filter.
///
/// # Arguments
///
/// * `src` - The noisy image with shape (H, W, C).
///
/// # Returns
///
/// A new image of the same size where every pixel with a full 3x3 neighborhood
/// holds the per-channel median of that neighborhood and every border pixel is
/// copied from `src`.
///
/// # Errors
///
/// [`FilterError::EmptyImage`] if `src` has zero width or height.
///
/// # Example
///
/// ```
/// use despeckle_image::Image;
/// use despeckle_imgproc::filter::median_blur;
///
/// let mut image = Image::<u8, 3>::from_size_val([5, 5].into(), 100).unwrap();
/// for c in 0..3 {
///     image.set_pixel(2, 2, c, 0).unwrap();
/// }
///
/// let filtered = median_blur(&image).unwrap();
///
/// assert_eq!(filtered.pixel(2, 2).unwrap(), &[100, 100, 100]);
/// ```
pub fn median_blur<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, FilterError>
where
    T: Copy + Ord + Default + Send + Sync,
{
    MedianFilter::new().apply(src)
}

/// Median filter `src` into the caller provided `dst`.
///
/// Only `src` is read while filtering, so the result does not depend on the
/// order in which output pixels are produced. Pixels whose window does not fit
/// are copied from `src` by [`fill_border`].
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
/// * `config` - The filter configuration.
///
/// # Errors
///
/// [`FilterError::EmptyImage`] for an empty input,
/// [`FilterError::ImageSizeMismatch`] if `dst` differs in size and
/// [`FilterError::Parallel`] if the execution strategy is invalid, whether or
/// not the image has any pixel with a full window.
pub fn median_filter<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    config: &MedianFilter,
) -> Result<(), FilterError>
where
    T: Copy + Ord + Default + Send + Sync,
{
    if src.is_empty() {
        return Err(FilterError::EmptyImage);
    }

    if src.size() != dst.size() {
        return Err(FilterError::ImageSizeMismatch(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    config.strategy().validate()?;

    let window = config.window();
    let radius = window.radius();
    let selector = config.selector();
    let filtered = config.alpha().filtered_channels(C);

    log::debug!(
        "median filter on {}x{}x{} with radius {} using {:?} ({:?})",
        src.width(),
        src.height(),
        C,
        radius,
        selector,
        config.strategy()
    );

    if let Some((cols, rows)) = window.interior(src.size()) {
        let stride = src.row_stride();
        let interior = &mut dst.as_slice_mut()[rows.start * stride..rows.end * stride];

        execute_rows(config.strategy(), interior, stride, |i, dst_row| {
            // scratch buffer owned by this row
            let mut samples = vec![T::default(); window.area()];
            let y = rows.start + i;

            for x in cols.clone() {
                let dst_pixel = &mut dst_row[x * C..(x + 1) * C];
                for (c, out) in dst_pixel.iter_mut().enumerate() {
                    *out = if c < filtered {
                        sample_window(src, x, y, radius, c, &mut samples)?;
                        selector.select(&mut samples, window.median_rank())?
                    } else {
                        *src.get_pixel(x, y, c)?
                    };
                }
            }

            Ok::<(), FilterError>(())
        })?;
    } else {
        log::debug!(
            "{}x{} image has no pixel with a full window of radius {}",
            src.width(),
            src.height(),
            radius
        );
    }

    fill_border(src, dst, radius)?;

    Ok(())
}
