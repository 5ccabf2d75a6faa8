//! # Workload Input
//!
//! Supplies the `(pid, burst_time)` pairs a simulation starts with.
//!
//! ## Format
//!
//! Workload files are line-based, one process per line:
//! - `1 10`: process 1 with a burst of 10 ticks
//! - `P2 15`: same, with an optional `P` prefix on the pid
//! - `8`: burst only; the pid is one more than the highest seen so far
//! - Comments: `# This is a comment`, also allowed after an entry
//!
//! ## Example
//!
//! ```text
//! # The classic three-process demo
//! 1 10
//! 2 15
//! 3 8
//! ```
//!
//! Values are not range-checked here. Negative burst times and bad pids
//! reach the scheduler, which rejects them individually.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Workload error types
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty workload")]
    EmptyWorkload,

    #[error("Invalid {what}: {value:?}")]
    InvalidNumber { what: String, value: String },

    #[error("Process count must be positive, got {0}")]
    InvalidCount(i64),

    #[error("Input ended while reading {0}")]
    UnexpectedEof(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One process to create at simulation start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub pid: i64,
    pub burst_time: i64,
}

/// Ordered list of processes to create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    entries: Vec<WorkloadEntry>,
}

impl Workload {
    /// Creates a workload from explicit pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(pid, burst_time)| WorkloadEntry { pid, burst_time })
                .collect(),
        }
    }

    /// The built-in demo: P1(10), P2(15), P3(8)
    pub fn demo() -> Self {
        Self::from_pairs([(1, 10), (2, 15), (3, 8)])
    }

    /// Parses a workload from text
    pub fn from_text(text: &str) -> Result<Self, WorkloadError> {
        let mut entries = Vec::new();
        let mut next_pid = 1i64;

        for (line_num, line) in text.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((before, _)) => before,
                None => line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let entry = Self::parse_line(line, line_num + 1, next_pid)?;
            next_pid = next_pid.max(entry.pid.saturating_add(1));
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(WorkloadError::EmptyWorkload);
        }

        Ok(Self { entries })
    }

    /// Reads and parses a workload file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Asks for a process count, then one burst time per process
    ///
    /// Pids are assigned 1..=count in the order the bursts are entered.
    pub fn prompt<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Self, WorkloadError> {
        write!(output, "Enter the number of processes: ")?;
        output.flush()?;
        let count = Self::read_number(&mut input, "process count")?;
        if count <= 0 {
            return Err(WorkloadError::InvalidCount(count));
        }

        let mut entries = Vec::new();
        for pid in 1..=count {
            write!(output, "Enter burst time for process {}: ", pid)?;
            output.flush()?;
            let burst_time = Self::read_number(&mut input, "burst time")?;
            entries.push(WorkloadEntry { pid, burst_time });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[WorkloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parse_line(
        line: &str,
        line_num: usize,
        next_pid: i64,
    ) -> Result<WorkloadEntry, WorkloadError> {
        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .collect();

        let parse_error = |message: String| WorkloadError::ParseError {
            line: line_num,
            message,
        };

        match fields.as_slice() {
            [burst] => Ok(WorkloadEntry {
                pid: next_pid,
                burst_time: Self::parse_int(burst).map_err(parse_error)?,
            }),
            [pid, burst] => {
                let pid = pid.strip_prefix(['P', 'p']).unwrap_or(*pid);
                Ok(WorkloadEntry {
                    pid: Self::parse_int(pid).map_err(parse_error)?,
                    burst_time: Self::parse_int(burst).map_err(parse_error)?,
                })
            }
            _ => Err(parse_error(format!(
                "expected `pid burst` or `burst`, found {} fields",
                fields.len()
            ))),
        }
    }

    fn parse_int(field: &str) -> Result<i64, String> {
        field
            .parse()
            .map_err(|_| format!("not an integer: {:?}", field))
    }

    fn read_number<R: BufRead>(input: &mut R, what: &str) -> Result<i64, WorkloadError> {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(WorkloadError::UnexpectedEof(what.to_string()));
        }
        let value = line.trim();
        value.parse().map_err(|_| WorkloadError::InvalidNumber {
            what: what.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(workload: &Workload) -> Vec<(i64, i64)> {
        workload
            .entries()
            .iter()
            .map(|entry| (entry.pid, entry.burst_time))
            .collect()
    }

    #[test]
    fn test_parse_explicit_pids() {
        let workload = Workload::from_text("1 10\n2 15\n3 8\n").unwrap();
        assert_eq!(pairs(&workload), vec![(1, 10), (2, 15), (3, 8)]);
        assert_eq!(workload, Workload::demo());
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let text = r#"
            # header comment

            P1 10   # trailing comment
            p2, 15
        "#;
        let workload = Workload::from_text(text).unwrap();
        assert_eq!(pairs(&workload), vec![(1, 10), (2, 15)]);
    }

    #[test]
    fn test_parse_auto_pids() {
        let workload = Workload::from_text("4\n7 2\n9\n").unwrap();
        assert_eq!(pairs(&workload), vec![(1, 4), (7, 2), (8, 9)]);
    }

    #[test]
    fn test_negative_burst_passes_through() {
        let workload = Workload::from_text("1 -5\n").unwrap();
        assert_eq!(pairs(&workload), vec![(1, -5)]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let result = Workload::from_text("1 10\n2 x\n");
        assert!(matches!(
            result,
            Err(WorkloadError::ParseError { line: 2, .. })
        ));

        let result = Workload::from_text("1 2 3\n");
        assert!(matches!(
            result,
            Err(WorkloadError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_workload() {
        assert!(matches!(
            Workload::from_text("# nothing\n\n"),
            Err(WorkloadError::EmptyWorkload)
        ));
    }

    #[test]
    fn test_prompt_reads_count_then_bursts() {
        let input = "3\n10\n15\n8\n";
        let mut output = Vec::new();
        let workload = Workload::prompt(input.as_bytes(), &mut output).unwrap();

        assert_eq!(workload, Workload::demo());
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.starts_with("Enter the number of processes: "));
        assert!(transcript.contains("Enter burst time for process 3: "));
    }

    #[test]
    fn test_prompt_rejects_bad_count() {
        let result = Workload::prompt("0\n".as_bytes(), Vec::new());
        assert!(matches!(result, Err(WorkloadError::InvalidCount(0))));

        let result = Workload::prompt("many\n".as_bytes(), Vec::new());
        assert!(matches!(result, Err(WorkloadError::InvalidNumber { .. })));
    }

    #[test]
    fn test_prompt_truncated_input() {
        let result = Workload::prompt("2\n5\n".as_bytes(), Vec::new());
        assert!(matches!(result, Err(WorkloadError::UnexpectedEof(_))));
    }
}
