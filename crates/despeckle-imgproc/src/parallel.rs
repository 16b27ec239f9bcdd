use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The buffer is not a whole number of rows.
    #[error("buffer length ({0}) is not a multiple of the row stride ({1})")]
    SizeMismatch(usize, usize),
}

/// Controls how the rows of an operation are executed.
///
/// Every strategy produces the same output; only the scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check that the strategy can run, without scheduling any work.
    ///
    /// # Errors
    ///
    /// [`ParallelError::InvalidThreadCount`] for `Fixed(0)`.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

/// Run `op` once per row of `data`, according to `strategy`.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `data` - The destination buffer, a whole number of rows of `stride` values.
/// * `stride` - The number of values in one row.
/// * `op` - Called with the row index (relative to the start of `data`) and the mutable row.
///
/// # Errors
///
/// Returns the first error produced by `op`, or a [`ParallelError`] if the
/// strategy or the buffer layout is invalid.
///
/// # Examples
///
/// ```
/// use despeckle_imgproc::parallel::{execute_rows, ExecutionStrategy, ParallelError};
///
/// let mut data = vec![0usize; 6];
/// execute_rows(ExecutionStrategy::Serial, &mut data, 3, |y, row| {
///     row.iter_mut().for_each(|v| *v = y);
///     Ok::<(), ParallelError>(())
/// })
/// .unwrap();
///
/// assert_eq!(data, vec![0, 0, 0, 1, 1, 1]);
/// ```
pub fn execute_rows<T, E, F>(
    strategy: ExecutionStrategy,
    data: &mut [T],
    stride: usize,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Send + Sync,
{
    strategy.validate()?;

    if stride == 0 {
        return Err(ParallelError::InvalidRowStride(stride).into());
    }

    if data.len() % stride != 0 {
        return Err(ParallelError::SizeMismatch(data.len(), stride).into());
    }

    match strategy {
        ExecutionStrategy::Serial => data
            .chunks_exact_mut(stride)
            .enumerate()
            .try_for_each(|(y, row)| op(y, row)),
        ExecutionStrategy::ParallelRows => data
            .par_chunks_exact_mut(stride)
            .enumerate()
            .try_for_each(|(y, row)| op(y, row)),
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_exact_mut(stride)
                    .enumerate()
                    .try_for_each(|(y, row)| op(y, row))
            })
        }
    }
}
