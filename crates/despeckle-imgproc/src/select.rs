//! Order statistics without a full sort.
//!
//! The routines here know nothing about images: they take a sequence of
//! totally ordered values and return the value that would sit at `rank` if the
//! sequence were sorted ascending.

use std::cmp::Ordering;

use crate::error::FilterError;

/// Below this length a segment is finished with an insertion sort.
const INSERTION_CUTOFF: usize = 16;

/// Number of values handled by [`median9`].
pub const NETWORK_LEN: usize = 9;

/// A strategy to compute an order statistic.
///
/// Implementations may reorder `values` but must return the same value for
/// the same multiset of inputs.
pub trait OrderStatistic {
    /// Return the value at position `rank` of the ascending order of `values`.
    ///
    /// # Errors
    ///
    /// [`FilterError::EmptyInput`] if `values` is empty and
    /// [`FilterError::RankOutOfRange`] if `rank >= values.len()`.
    fn select<T: Ord + Copy>(&self, values: &mut [T], rank: usize) -> Result<T, FilterError>;
}

/// Partition based selection, expected linear time for any length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuickSelect;

/// Fixed compare-exchange network for the median of exactly nine values.
///
/// Any other length or rank is delegated to [`QuickSelect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MedianNetwork;

/// Runtime choice between the available selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Use [`QuickSelect`].
    QuickSelect,
    /// Use [`MedianNetwork`].
    MedianNetwork,
}

impl OrderStatistic for QuickSelect {
    fn select<T: Ord + Copy>(&self, values: &mut [T], rank: usize) -> Result<T, FilterError> {
        select_in_place(values, rank)
    }
}

impl OrderStatistic for MedianNetwork {
    fn select<T: Ord + Copy>(&self, values: &mut [T], rank: usize) -> Result<T, FilterError> {
        check_rank(values.len(), rank)?;

        if rank != NETWORK_LEN / 2 {
            return select_in_place(values, rank);
        }

        match <[T; NETWORK_LEN]>::try_from(&*values) {
            Ok(window) => Ok(median9(window)),
            Err(_) => select_in_place(values, rank),
        }
    }
}

impl OrderStatistic for Selector {
    fn select<T: Ord + Copy>(&self, values: &mut [T], rank: usize) -> Result<T, FilterError> {
        match self {
            Selector::QuickSelect => QuickSelect.select(values, rank),
            Selector::MedianNetwork => MedianNetwork.select(values, rank),
        }
    }
}

fn check_rank(len: usize, rank: usize) -> Result<(), FilterError> {
    if len == 0 {
        return Err(FilterError::EmptyInput);
    }
    if rank >= len {
        return Err(FilterError::RankOutOfRange { rank, len });
    }
    Ok(())
}

/// Return the value at `rank` of the ascending order of `values`.
///
/// The input is left untouched; the selection runs on a private copy.
///
/// # Examples
///
/// ```
/// use despeckle_imgproc::select::select;
///
/// let values = [7u8, 1, 9, 3, 5];
/// assert_eq!(select(&values, 2).unwrap(), 5);
/// assert_eq!(select(&values, 0).unwrap(), 1);
/// ```
pub fn select<T: Ord + Copy>(values: &[T], rank: usize) -> Result<T, FilterError> {
    let mut scratch = values.to_vec();
    select_in_place(&mut scratch, rank)
}

/// Return the lower median of `values`, i.e. the value at rank `len / 2`.
///
/// # Examples
///
/// ```
/// use despeckle_imgproc::select::median;
///
/// assert_eq!(median(&[5u8, 5, 5, 5, 5, 9, 9, 9, 9]).unwrap(), 5);
/// assert_eq!(median(&[4u8, 1, 3, 2]).unwrap(), 3);
/// ```
pub fn median<T: Ord + Copy>(values: &[T]) -> Result<T, FilterError> {
    select(values, values.len() / 2)
}

/// Select the value at `rank` by iterative three-way partitioning.
///
/// After the call `values` is permuted; no other guarantee is made about its order.
pub fn select_in_place<T: Ord + Copy>(values: &mut [T], rank: usize) -> Result<T, FilterError> {
    check_rank(values.len(), rank)?;

    // invariant: lo <= rank < hi
    let mut lo = 0;
    let mut hi = values.len();

    loop {
        let segment = &mut values[lo..hi];

        if segment.len() <= INSERTION_CUTOFF {
            insertion_sort(segment);
            return Ok(values[rank]);
        }

        let last = segment.len() - 1;
        let pivot = median_of_three(segment[0], segment[last / 2], segment[last]);
        let (lt, gt) = partition3(segment, pivot);

        if rank < lo + lt {
            hi = lo + lt;
        } else if rank >= lo + gt {
            lo += gt;
        } else {
            return Ok(pivot);
        }
    }
}

/// Dutch flag partition around `pivot`.
///
/// Returns `(lt, gt)` such that `v[..lt] < pivot`, `v[lt..gt] == pivot` and
/// `v[gt..] > pivot`.
fn partition3<T: Ord + Copy>(v: &mut [T], pivot: T) -> (usize, usize) {
    let mut lt = 0;
    let mut i = 0;
    let mut gt = v.len();

    while i < gt {
        match v[i].cmp(&pivot) {
            Ordering::Less => {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                v.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    (lt, gt)
}

#[inline]
fn median_of_three<T: Ord + Copy>(a: T, b: T, c: T) -> T {
    a.min(b).max(a.max(b).min(c))
}

fn insertion_sort<T: Ord + Copy>(v: &mut [T]) {
    for i in 1..v.len() {
        let key = v[i];
        let mut j = i;
        while j > 0 && v[j - 1] > key {
            v[j] = v[j - 1];
            j -= 1;
        }
        v[j] = key;
    }
}

#[inline(always)]
fn sort2<T: Ord + Copy>(p: &mut [T; NETWORK_LEN], a: usize, b: usize) {
    let (x, y) = (p[a], p[b]);
    p[a] = x.min(y);
    p[b] = x.max(y);
}

/// Median of nine values with a 19 compare-exchange network.
///
/// Sorts the three triples, then takes the median of the max of the minima,
/// the median of the medians and the min of the maxima.
///
/// # Examples
///
/// ```
/// use despeckle_imgproc::select::median9;
///
/// assert_eq!(median9([9u8, 5, 9, 5, 9, 5, 9, 5, 5]), 5);
/// ```
#[inline]
pub fn median9<T: Ord + Copy>(mut p: [T; NETWORK_LEN]) -> T {
    sort2(&mut p, 1, 2);
    sort2(&mut p, 4, 5);
    sort2(&mut p, 7, 8);
    sort2(&mut p, 0, 1);
    sort2(&mut p, 3, 4);
    sort2(&mut p, 6, 7);
    sort2(&mut p, 1, 2);
    sort2(&mut p, 4, 5);
    sort2(&mut p, 7, 8);
    sort2(&mut p, 0, 3);
    sort2(&mut p, 5, 8);
    sort2(&mut p, 4, 7);
    sort2(&mut p, 3, 6);
    sort2(&mut p, 1, 4);
    sort2(&mut p, 2, 5);
    sort2(&mut p, 4, 7);
    sort2(&mut p, 4, 2);
    sort2(&mut p, 6, 4);
    sort2(&mut p, 4, 2);
    p[4]
}
