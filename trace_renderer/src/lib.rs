//! # Trace Renderer
//!
//! Presenters that turn scheduler snapshots into terminal output.
//!
//! ## Philosophy
//!
//! - **Rendering is a host concern**: the scheduler never prints
//! - **Snapshots are rendered, not streamed**: one immutable frame per tick
//! - **Renderers are dumb and replaceable**: no scheduling logic here
//!
//! ## Presenters
//!
//! - [`PlainPresenter`]: the classic `Time:` / `Running:` / `Ready Queue:`
//!   text block
//! - [`StyledPresenter`]: the same layout with ANSI colours, redrawn in place
//! - [`JsonLinesPresenter`]: one JSON object per tick, for tooling

pub mod styling;

use sim_scheduler::{Presenter, SchedulerSnapshot};
use std::io::{self, Write};
use std::str::FromStr;
use styling::{Frame, StyledText, CLEAR_SCREEN};
use thiserror::Error;

/// Presenter selection error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresenterError {
    #[error("Unknown presenter: {0} (expected plain, styled or json)")]
    UnknownPresenter(String),
}

/// Which presenter to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresenterKind {
    #[default]
    Plain,
    Styled,
    Json,
}

impl FromStr for PresenterKind {
    type Err = PresenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(PresenterKind::Plain),
            "styled" | "color" | "colour" => Ok(PresenterKind::Styled),
            "json" => Ok(PresenterKind::Json),
            other => Err(PresenterError::UnknownPresenter(other.to_string())),
        }
    }
}

/// Builds a boxed presenter writing to `out`
pub fn presenter_for<W: Write + 'static>(kind: PresenterKind, out: W) -> Box<dyn Presenter> {
    match kind {
        PresenterKind::Plain => Box::new(PlainPresenter::new(out)),
        PresenterKind::Styled => Box::new(StyledPresenter::new(out)),
        PresenterKind::Json => Box::new(JsonLinesPresenter::new(out)),
    }
}

/// Lays out one snapshot
pub fn build_frame(snapshot: &SchedulerSnapshot) -> Frame {
    let mut frame = Frame::new();

    frame.push_line(vec![
        StyledText::bold("Time: "),
        StyledText::normal(snapshot.current_time.to_string()),
    ]);

    match &snapshot.running {
        Some(running) => frame.push_line(vec![
            StyledText::bold("Running: "),
            StyledText::running(format!(
                "Process {} (Remaining Time: {})",
                running.pid.get(),
                running.remaining_time
            )),
        ]),
        None => frame.push_line(vec![StyledText::idle("No process running")]),
    };

    let mut queue_line = vec![StyledText::bold("Ready Queue: ")];
    if snapshot.ready_queue.is_empty() {
        queue_line.push(StyledText::idle("Empty"));
    } else {
        queue_line.extend(snapshot.ready_queue.iter().map(|waiting| {
            StyledText::queued(format!("{}({}) ", waiting.pid, waiting.remaining_time))
        }));
    }
    frame.push_line(queue_line);
    frame.push_line(Vec::new());

    frame
}

/// Plain text presenter
pub struct PlainPresenter<W: Write> {
    out: W,
}

impl<W: Write> PlainPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for PlainPresenter<W> {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()> {
        self.out.write_all(build_frame(snapshot).to_plain().as_bytes())?;
        self.out.flush()
    }
}

/// ANSI-coloured presenter that redraws the screen every tick
pub struct StyledPresenter<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> StyledPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: true,
        }
    }

    /// Keeps previous frames on screen instead of clearing
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for StyledPresenter<W> {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()> {
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(build_frame(snapshot).to_ansi().as_bytes())?;
        self.out.flush()
    }
}

/// JSON lines presenter
pub struct JsonLinesPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
