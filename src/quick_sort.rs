//! Quick Sort Trace
//!
//! Recursive quick sort with the Lomuto partition scheme, last element as
//! pivot. Each partition compares every element of the range against the
//! pivot, swaps qualifying elements into the growing "<= pivot" prefix
//! (including self-swaps), then swaps the pivot into place. The left
//! partition is recorded before the right one.
//!
//! Sorted input is the worst case: n - 1 partitions and n * (n - 1) / 2
//! comparisons. There is no median-of-three or insertion-sort cutoff.

use crate::event::{AnimationEvent, Trace};

/// Record the quick sort trace for `input` without modifying it.
pub fn record(input: &[u32]) -> Trace {
    record_counting_partitions(input).0
}

/// Record the trace and also return how many partition calls were made.
fn record_counting_partitions(input: &[u32]) -> (Trace, usize) {
    let mut data = input.to_vec();
    let mut trace = Vec::new();
    let mut partitions = 0;

    if data.len() > 1 {
        let high = data.len() - 1;
        sort_range(&mut data, 0, high, &mut trace, &mut partitions);
    }

    (trace, partitions)
}

fn sort_range(
    data: &mut [u32],
    low: usize,
    high: usize,
    trace: &mut Trace,
    partitions: &mut usize,
) {
    if low >= high {
        return;
    }

    let pivot_index = partition(data, low, high, trace);
    *partitions += 1;

    if pivot_index > low {
        sort_range(data, low, pivot_index - 1, trace, partitions);
    }
    sort_range(data, pivot_index + 1, high, trace, partitions);
}

/// Lomuto partition of `low..=high` around `data[high]`; returns the pivot's final index.
fn partition(data: &mut [u32], low: usize, high: usize, trace: &mut Trace) -> usize {
    let pivot = data[high];
    // Next slot of the "<= pivot" prefix.
    let mut store = low;

    for j in low..high {
        trace.push(AnimationEvent::Compare { i: j, j: high });

        if data[j] <= pivot {
            data.swap(store, j);
            trace.push(AnimationEvent::Swap { i: store, j });
            store += 1;
        }
    }

    data.swap(store, high);
    trace.push(AnimationEvent::Swap { i: store, j: high });
    store
}
