use std::ops::RangeInclusive;
use std::ptr;

use crate::SortError;

/// Validates inclusive `low..=high` bounds against a slice of `len` elements.
///
/// `Ok(None)` means the range holds at most one element and needs no work.
#[inline]
pub fn checked_range(
    len: usize,
    low: usize,
    high: usize,
) -> Result<Option<RangeInclusive<usize>>, SortError> {
    if low >= high {
        return Ok(None);
    }
    if high >= len {
        return Err(SortError::InvalidRange { low, high, len });
    }
    Ok(Some(low..=high))
}

/// Returns whichever of `a`, `b`, `c` lies between the other two.
///
/// Candidates are checked in the order `a`, `b`, `c`, so on ties the first
/// qualifying one wins.
#[inline]
pub fn median3(a: i32, b: i32, c: i32) -> i32 {
    if (a >= b && a <= c) || (a <= b && a >= c) {
        a
    } else if (b >= a && b <= c) || (b <= a && b >= c) {
        b
    } else {
        c
    }
}

#[inline]
pub fn choose_pivot_median3(data: &[i32]) -> i32 {
    debug_assert!(!data.is_empty());
    let high = data.len() - 1;
    median3(data[0], data[high / 2], data[high])
}

/// One crossing-cursor partition pass around `pivot`.
///
/// Returns `(left_len, right_start)`: after the pass `data[..left_len]` holds
/// values `<= pivot`, `data[right_start..]` holds values `>= pivot`, and
/// anything in between equals the pivot. `left_len <= right_start` always.
///
/// `pivot` must be a value present in `data`; it acts as the sentinel that
/// stops both cursors on the first pass.
#[inline]
pub fn partition_crossing(data: &mut [i32], pivot: i32) -> (usize, usize) {
    debug_assert!(data.len() >= 2);

    let ptr = data.as_mut_ptr();
    let mut i = 0usize;
    // Exclusive right cursor: the element under inspection is `j - 1`.
    let mut j = data.len();

    // Hot loop: the pivot (and every value swapped past a cursor) bounds both
    // scans, so neither cursor leaves `0..len`.
    unsafe {
        while i < j {
            while *ptr.add(i) < pivot {
                i += 1;
            }
            while *ptr.add(j - 1) > pivot {
                j -= 1;
            }
            if i < j {
                ptr::swap(ptr.add(i), ptr.add(j - 1));
                i += 1;
                j -= 1;
            }
        }
    }

    (j, i)
}

#[inline]
pub fn is_sorted_non_decreasing(data: &[i32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
