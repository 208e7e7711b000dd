//! Sorting Trace Visualizer
//!
//! Records instrumented runs of bubble, merge and quick sort as ordered
//! lists of animation events, then replays them on a timer against a
//! display array:
//! - **Trace Recorder** ([`recorder::record`]): pure and synchronous; runs
//!   the algorithm on a private copy and returns the full event list.
//! - **Playback Controller** ([`playback::PlaybackController`]): schedules
//!   one cancellable task per event on a single-threaded task set and
//!   exposes sort/reset and the slider controls.
//!
//! Supporting modules generate random arrays, render frames as text bars
//! and summarize trace statistics across algorithms.

pub mod algorithm;
pub mod bubble_sort;
pub mod config;
pub mod error;
pub mod event;
pub mod merge_sort;
pub mod playback;
pub mod quick_sort;
pub mod recorder;
pub mod render;
pub mod report;

pub use algorithm::Algorithm;
pub use config::VisualizerConfig;
pub use error::{ParseAlgorithmError, PlaybackError};
pub use event::{AnimationEvent, Trace};
pub use playback::{PlaybackController, PlaybackStatus};
pub use recorder::record;
