//! Sorting Algorithm Catalogue
//!
//! The three algorithms the visualizer can animate, along with the text the
//! showcase displays for each one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseAlgorithmError;

/// Algorithm selector for recording and playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Merge,
    Quick,
}

impl Algorithm {
    /// Every algorithm, in showcase order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Merge, Algorithm::Quick];

    /// Short token used on the command line and in reports.
    pub fn token(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }

    /// Human-readable heading.
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Bubble => {
                "Bubble Sort works by repeatedly stepping through the list, comparing \
                 adjacent elements and swapping them if they are in the wrong order."
            }
            Algorithm::Merge => {
                "Merge Sort divides the array into halves, sorts each half, then merges \
                 them back together. It uses the \"divide and conquer\" strategy."
            }
            Algorithm::Quick => {
                "Quick Sort selects a \"pivot\" element and partitions the array around it. \
                 Elements less than the pivot go before it, while elements greater go after."
            }
        }
    }

    pub fn time_complexity(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "O(n²)",
            Algorithm::Merge => "O(n log n)",
            Algorithm::Quick => "O(n log n) average case, O(n²) worst case",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(Algorithm::Bubble),
            "merge" => Ok(Algorithm::Merge),
            "quick" => Ok(Algorithm::Quick),
            _ => Err(ParseAlgorithmError {
                input: s.to_string(),
            }),
        }
    }
}
