//! Serialization options shared by [`FormRecord`](crate::record::FormRecord)
//! and [`ViewMap`](crate::view::ViewMap).

/// Line terminator used when emitting form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    /// The terminator servers expect on resubmitted specs.
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options controlling how form text is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Terminator written after every line.
    pub line_ending: LineEnding,
    /// Prefix written before each continuation line of a multi-line field.
    pub indent: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            indent: "\t".to_string(),
        }
    }
}

impl FormatOptions {
    /// Tab-indented, CRLF-terminated output.
    pub fn crlf() -> Self {
        Self {
            line_ending: LineEnding::CrLf,
            ..Self::default()
        }
    }
}
