//! Visual styling for the terminal trace
//!
//! A frame is a list of lines, each line a list of styled segments. The
//! same frame renders to plain text or to ANSI-coloured text, so both
//! presenters share one layout.

/// ANSI sequence that clears the screen and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const RESET: &str = "\x1b[0m";

/// Segment style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Normal text
    Normal,
    /// Bold text (for headers)
    Bold,
    /// The process holding the CPU
    Running,
    /// A process waiting in the ready queue
    Queued,
    /// Nothing to show (idle CPU, empty queue)
    Idle,
}

impl Style {
    fn ansi_prefix(&self) -> Option<&'static str> {
        match self {
            Style::Normal => None,
            Style::Bold => Some("\x1b[1m"),
            Style::Running => Some("\x1b[1;32m"),
            Style::Queued => Some("\x1b[33m"),
            Style::Idle => Some("\x1b[2m"),
        }
    }
}

/// Styled text segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub style: Style,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, Style::Normal)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, Style::Bold)
    }

    pub fn running(text: impl Into<String>) -> Self {
        Self::new(text, Style::Running)
    }

    pub fn queued(text: impl Into<String>) -> Self {
        Self::new(text, Style::Queued)
    }

    pub fn idle(text: impl Into<String>) -> Self {
        Self::new(text, Style::Idle)
    }

    /// Render to plain text (stripping style information)
    pub fn to_plain(&self) -> &str {
        &self.text
    }

    /// Render wrapped in ANSI escape codes
    pub fn to_ansi(&self) -> String {
        match self.style.ansi_prefix() {
            Some(prefix) => format!("{}{}{}", prefix, self.text, RESET),
            None => self.text.clone(),
        }
    }
}

/// A rendered frame: one entry per output line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<Vec<StyledText>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, segments: Vec<StyledText>) -> &mut Self {
        self.lines.push(segments);
        self
    }

    pub fn lines(&self) -> &[Vec<StyledText>] {
        &self.lines
    }

    pub fn to_plain(&self) -> String {
        self.render(|segment| segment.to_plain().to_string())
    }

    pub fn to_ansi(&self) -> String {
        self.render(StyledText::to_ansi)
    }

    fn render<F>(&self, segment: F) -> String
    where
        F: Fn(&StyledText) -> String,
    {
        let mut out = String::new();
        for line in &self.lines {
            for part in line {
                out.push_str(&segment(part));
            }
            out.push('\n');
        }
        out
    }
}
