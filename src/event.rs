//! Animation Events
//!
//! A trace is the fully materialized list of steps a sorting algorithm took
//! on its private working copy. Replaying the trace in order against a copy
//! of the original array reproduces every intermediate state and ends at the
//! sorted array.

use serde::{Deserialize, Serialize};

/// One discrete step of an instrumented sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationEvent {
    /// Two positions are being compared. Never mutates the array.
    Compare { i: usize, j: usize },
    /// Exchange the values at two positions.
    Swap { i: usize, j: usize },
    /// Overwrite position `index` with `value`.
    Write { index: usize, value: u32 },
}

impl AnimationEvent {
    /// Whether applying this event changes array contents.
    #[inline]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, AnimationEvent::Compare { .. })
    }

    /// Apply the event to `data`.
    ///
    /// Out-of-range indices are ignored; traces produced by the recorder
    /// always address positions inside the array they were recorded from.
    pub fn apply(&self, data: &mut [u32]) {
        match *self {
            AnimationEvent::Compare { .. } => {}
            AnimationEvent::Swap { i, j } => {
                if i < data.len() && j < data.len() {
                    data.swap(i, j);
                }
            }
            AnimationEvent::Write { index, value } => {
                if let Some(slot) = data.get_mut(index) {
                    *slot = value;
                }
            }
        }
    }
}

/// Ordered sequence of animation events recorded from one run.
pub type Trace = Vec<AnimationEvent>;

/// Replay a whole trace against a copy of `original` and return the final state.
pub fn replay(original: &[u32], trace: &[AnimationEvent]) -> Vec<u32> {
    let mut data = original.to_vec();
    for event in trace {
        event.apply(&mut data);
    }
    data
}
