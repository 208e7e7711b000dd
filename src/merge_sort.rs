//! Merge Sort Trace
//!
//! Top-down merge sort, left half recorded before the right half. Each
//! element placed while both runs still have candidates produces a
//! `Compare` of the two candidates' original positions followed by a
//! `Write` of the placed value. Once a run is exhausted the remainder is
//! drained with `Write` events only.
//!
//! Complexity: O(n log n) comparisons and writes

use crate::event::{AnimationEvent, Trace};

/// Record the merge sort trace for `input` without modifying it.
pub fn record(input: &[u32]) -> Trace {
    let mut data = input.to_vec();
    let mut trace = Vec::new();

    if data.len() > 1 {
        let right = data.len() - 1;
        sort_range(&mut data, 0, right, &mut trace);
    }

    trace
}

fn sort_range(data: &mut [u32], left: usize, right: usize, trace: &mut Trace) {
    if left >= right {
        return;
    }

    let mid = left + (right - left) / 2;
    sort_range(data, left, mid, trace);
    sort_range(data, mid + 1, right, trace);
    merge(data, left, mid, right, trace);
}

/// Merge the sorted runs `left..=mid` and `mid + 1..=right` in place.
fn merge(data: &mut [u32], left: usize, mid: usize, right: usize, trace: &mut Trace) {
    let left_run = data[left..=mid].to_vec();
    let right_run = data[mid + 1..=right].to_vec();

    let (mut i, mut j, mut k) = (0, 0, left);

    while i < left_run.len() && j < right_run.len() {
        trace.push(AnimationEvent::Compare {
            i: left + i,
            j: mid + 1 + j,
        });

        // Ties take the left candidate.
        let value = if left_run[i] <= right_run[j] {
            i += 1;
            left_run[i - 1]
        } else {
            j += 1;
            right_run[j - 1]
        };

        data[k] = value;
        trace.push(AnimationEvent::Write { index: k, value });
        k += 1;
    }

    for &value in left_run[i..].iter().chain(&right_run[j..]) {
        data[k] = value;
        trace.push(AnimationEvent::Write { index: k, value });
        k += 1;
    }
}
