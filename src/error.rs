//! Error types for the visualizer controls.

use thiserror::Error;

use crate::playback::PlaybackStatus;

/// An algorithm name that is not one of `bubble`, `merge` or `quick`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting algorithm '{input}' (expected bubble, merge or quick)")]
pub struct ParseAlgorithmError {
    pub input: String,
}

/// A control request the playback controller refuses in its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Settings are locked while an animation is running.
    #[error("cannot change {setting} while a sort is running")]
    Busy { setting: &'static str },

    /// `start` is only valid from `Idle`.
    #[error("cannot start playback from status {from}; reset first")]
    InvalidTransition { from: PlaybackStatus },
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;
