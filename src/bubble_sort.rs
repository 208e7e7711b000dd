//! Bubble Sort Trace
//!
//! Instrumented bubble sort. Every inner-loop iteration emits a `Compare`
//! and, when the pair is out of order, a following `Swap`. There is no
//! early exit: all passes run even once the array is already sorted, so the
//! animation always shows the full worst-case sweep.
//!
//! Complexity: exactly n * (n - 1) / 2 comparisons

use crate::event::{AnimationEvent, Trace};

/// Record the bubble sort trace for `input` without modifying it.
pub fn record(input: &[u32]) -> Trace {
    let mut data = input.to_vec();
    let n = data.len();
    let mut trace = Vec::new();

    for i in 0..n {
        for j in 0..n - 1 - i {
            trace.push(AnimationEvent::Compare { i: j, j: j + 1 });

            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                trace.push(AnimationEvent::Swap { i: j, j: j + 1 });
            }
        }
    }

    trace
}
