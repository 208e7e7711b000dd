//! Trace Recorder
//!
//! Runs the selected instrumented sort on a private copy of the array and
//! returns the complete event list. Recording is synchronous and finishes
//! before any playback is scheduled.

use tracing::debug;

use crate::algorithm::Algorithm;
use crate::event::Trace;
use crate::{bubble_sort, merge_sort, quick_sort};

/// Record the trace of `algorithm` sorting `array`. `array` is not modified.
pub fn record(array: &[u32], algorithm: Algorithm) -> Trace {
    let trace = match algorithm {
        Algorithm::Bubble => bubble_sort::record(array),
        Algorithm::Merge => merge_sort::record(array),
        Algorithm::Quick => quick_sort::record(array),
    };

    debug!(
        algorithm = %algorithm,
        len = array.len(),
        events = trace.len(),
        "recorded trace"
    );
    trace
}

/// Check if a slice is sorted in ascending order.
#[inline]
pub fn is_sorted(data: &[u32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
