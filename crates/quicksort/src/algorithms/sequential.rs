use crate::SortError;

use super::common;

/// Sorts `data[low..=high]` in place. Ranges with `low >= high` are left alone.
pub fn sort_range(data: &mut [i32], low: usize, high: usize) -> Result<(), SortError> {
    if let Some(range) = common::checked_range(data.len(), low, high)? {
        quick_sort(&mut data[range]);
    }
    Ok(())
}

pub fn quick_sort(mut data: &mut [i32]) {
    while data.len() > 1 {
        let pivot = common::choose_pivot_median3(data);
        let (left_len, right_start) = common::partition_crossing(data, pivot);

        let (left, rest) = data.split_at_mut(left_len);
        let right = &mut rest[right_start - left_len..];

        if left.len() < right.len() {
            quick_sort(left);
            data = right;
        } else {
            quick_sort(right);
            data = left;
        }
    }
}
