//! Frame Rendering
//!
//! What the controller hands to its render callback after every visible
//! change, and a plain-text bar chart for terminals.

use std::fmt::Write;

/// Per-bar highlight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Idle,
    /// Operand of the most recent `Compare`.
    Compared,
    /// Target of the most recent `Swap` or `Write`.
    Swapped,
}

/// Snapshot of the display state passed to render callbacks.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub values: &'a [u32],
    pub highlights: &'a [Highlight],
    pub completed: bool,
}

/// Render callback installed on a playback controller.
pub type Renderer = Box<dyn FnMut(&Frame<'_>)>;

/// Draw `frame` as vertical bars, `rows` lines tall, one column per value.
///
/// Bars are `#` when idle, `?` when compared, `*` when swapped or written,
/// and `=` once the sort has completed. Heights are scaled against the
/// largest value in the frame.
pub fn render_bars(frame: &Frame<'_>, rows: usize) -> String {
    let mut output = String::new();
    let rows = rows.max(1);
    let max = frame.values.iter().copied().max().unwrap_or(0).max(1);

    let heights: Vec<usize> = frame
        .values
        .iter()
        .map(|&v| (v as usize * rows).div_ceil(max as usize))
        .collect();

    for row in (1..=rows).rev() {
        for (idx, &height) in heights.iter().enumerate() {
            let glyph = if height >= row {
                bar_glyph(frame, idx)
            } else {
                ' '
            };
            output.push(glyph);
        }
        // Trailing spaces carry no information.
        while output.ends_with(' ') {
            output.pop();
        }
        output.push('\n');
    }

    output
}

/// One-line status summary shown under the bars.
pub fn status_line(frame: &Frame<'_>, label: &str) -> String {
    let mut output = String::new();
    let state = if frame.completed { "sorted" } else { "sorting" };
    let _ = write!(output, "{} | {} bars | {}", label, frame.values.len(), state);
    output
}

fn bar_glyph(frame: &Frame<'_>, idx: usize) -> char {
    if frame.completed {
        return '=';
    }
    match frame.highlights.get(idx).copied().unwrap_or_default() {
        Highlight::Idle => '#',
        Highlight::Compared => '?',
        Highlight::Swapped => '*',
    }
}
