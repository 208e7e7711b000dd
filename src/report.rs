//! Trace Statistics Report
//!
//! Records every algorithm over a batch of random arrays and summarizes how
//! many compares, swaps and writes each one emits on average. The report can
//! be rendered in Links Notation (Lino) or as a Markdown table.
//!
//! Lino layout:
//! ```text
//! trace_report:
//!   description 'Trace statistics'
//!   trials 10
//!
//! results:
//!   size_20:
//!     bubble:
//!       compares 190.00
//!       swaps 94.60
//!       writes 0.00
//!       events 284.60
//! ```

use std::fmt::{self, Write};
use std::fs;
use std::io;
use std::path::Path;

use rand::Rng;
use rayon::prelude::*;

use crate::algorithm::Algorithm;
use crate::config::{clamp_size, random_array};
use crate::event::AnimationEvent;
use crate::recorder;

/// Event counts of a single trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub compares: usize,
    pub swaps: usize,
    pub writes: usize,
}

impl TraceStats {
    pub fn from_trace(trace: &[AnimationEvent]) -> Self {
        trace.iter().fold(TraceStats::default(), |mut stats, event| {
            match event {
                AnimationEvent::Compare { .. } => stats.compares += 1,
                AnimationEvent::Swap { .. } => stats.swaps += 1,
                AnimationEvent::Write { .. } => stats.writes += 1,
            }
            stats
        })
    }

    pub fn events(&self) -> usize {
        self.compares + self.swaps + self.writes
    }
}

/// Averaged counts for one algorithm at one array size.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    pub array_size: usize,
    pub compares: f64,
    pub swaps: f64,
    pub writes: f64,
}

impl AlgorithmSummary {
    pub fn events(&self) -> f64 {
        self.compares + self.swaps + self.writes
    }
}

#[derive(Debug, Clone)]
pub struct TraceReport {
    pub description: String,
    /// Random arrays recorded per size.
    pub trials: usize,
    pub results: Vec<AlgorithmSummary>,
}

impl TraceReport {
    /// Record every algorithm on `trials` random arrays of each size.
    ///
    /// Sizes are clamped to 5..=50 like every other entry point; a size
    /// that clamps onto one already measured is skipped. Arrays are drawn
    /// sequentially from `rng` so a seeded generator gives a reproducible
    /// report; recording runs in parallel.
    pub fn generate<R: Rng + ?Sized>(
        description: &str,
        sizes: &[usize],
        trials: usize,
        rng: &mut R,
    ) -> Self {
        let trials = trials.max(1);
        let mut results = Vec::with_capacity(sizes.len() * Algorithm::ALL.len());

        let mut measured = Vec::with_capacity(sizes.len());
        for size in sizes.iter().map(|&size| clamp_size(size)) {
            if measured.contains(&size) {
                continue;
            }
            measured.push(size);

            let arrays: Vec<Vec<u32>> = (0..trials)
                .map(|_| random_array(size, &mut *rng))
                .collect();

            let summaries: Vec<AlgorithmSummary> = Algorithm::ALL
                .par_iter()
                .map(|&algorithm| summarize(algorithm, size, &arrays))
                .collect();
            results.extend(summaries);
        }

        TraceReport {
            description: description.to_string(),
            trials,
            results,
        }
    }

    /// Unique array sizes, ascending.
    fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.results.iter().map(|r| r.array_size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    fn find(&self, size: usize, algorithm: Algorithm) -> Option<&AlgorithmSummary> {
        self.results
            .iter()
            .find(|r| r.array_size == size && r.algorithm == algorithm)
    }

    /// Render the report in Links Notation.
    pub fn to_lino(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_lino(&mut output);
        output
    }

    fn write_lino(&self, output: &mut String) -> fmt::Result {
        writeln!(output, "trace_report:")?;
        writeln!(output, "  description '{}'", escape_lino_string(&self.description))?;
        writeln!(output, "  trials {}", self.trials)?;

        writeln!(output)?;
        writeln!(output, "results:")?;
        for size in self.sizes() {
            writeln!(output, "  size_{}:", size)?;
            for result in self.results.iter().filter(|r| r.array_size == size) {
                writeln!(output, "    {}:", result.algorithm)?;
                writeln!(output, "      compares {:.2}", result.compares)?;
                writeln!(output, "      swaps {:.2}", result.swaps)?;
                writeln!(output, "      writes {:.2}", result.writes)?;
                writeln!(output, "      events {:.2}", result.events())?;
            }
        }
        Ok(())
    }

    /// Render the report as Markdown tables.
    pub fn to_markdown_table(&self) -> String {
        let mut output = String::new();
        let _ = self.write_markdown(&mut output);
        output
    }

    fn write_markdown(&self, output: &mut String) -> fmt::Result {
        writeln!(output, "# Sorting Trace Report")?;
        writeln!(output)?;
        writeln!(output, "**Description:** {}", self.description)?;
        writeln!(output, "**Trials per size:** {}", self.trials)?;
        writeln!(output)?;

        writeln!(output, "## Events per Trace")?;
        writeln!(output)?;
        writeln!(output, "| Size | Bubble | Merge | Quick |")?;
        writeln!(output, "|------|--------|-------|-------|")?;
        for size in self.sizes() {
            let cells: Vec<String> = Algorithm::ALL
                .iter()
                .map(|&algorithm| {
                    self.find(size, algorithm)
                        .map(|r| format!("{:.1}", r.events()))
                        .unwrap_or_else(|| "N/A".to_string())
                })
                .collect();
            writeln!(output, "| {} | {} |", size, cells.join(" | "))?;
        }
        writeln!(output)?;

        writeln!(output, "## Breakdown")?;
        writeln!(output)?;
        writeln!(output, "| Size | Algorithm | Compares | Swaps | Writes | Complexity |")?;
        writeln!(output, "|------|-----------|----------|-------|--------|------------|")?;
        for size in self.sizes() {
            for result in self.results.iter().filter(|r| r.array_size == size) {
                writeln!(
                    output,
                    "| {} | {} | {:.1} | {:.1} | {:.1} | {} |",
                    size,
                    result.algorithm.display_name(),
                    result.compares,
                    result.swaps,
                    result.writes,
                    result.algorithm.time_complexity()
                )?;
            }
        }

        writeln!(output)?;
        writeln!(output, "---")?;
        writeln!(output, "*Report generated by sort-trace*")?;
        Ok(())
    }

    pub fn save_lino(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_lino())
    }

    pub fn save_markdown(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_markdown_table())
    }
}

fn summarize(algorithm: Algorithm, size: usize, arrays: &[Vec<u32>]) -> AlgorithmSummary {
    let totals = arrays
        .iter()
        .map(|array| TraceStats::from_trace(&recorder::record(array, algorithm)))
        .fold(TraceStats::default(), |acc, stats| TraceStats {
            compares: acc.compares + stats.compares,
            swaps: acc.swaps + stats.swaps,
            writes: acc.writes + stats.writes,
        });

    let n = arrays.len().max(1) as f64;
    AlgorithmSummary {
        algorithm,
        array_size: size,
        compares: totals.compares as f64 / n,
        swaps: totals.swaps as f64 / n,
        writes: totals.writes as f64 / n,
    }
}

/// Escape a string for use in Links Notation (handle single quotes)
fn escape_lino_string(s: &str) -> String {
    s.replace('\'', "\\'")
}
