//! Interactive surface
//!
//! Everything the desk shows to or asks of a user goes through [`Surface`].
//! The terminal implementation lives in the CLI; tests use a scripted one.

use kpi_literal::LiteralMap;
use std::fmt::{self, Display, Formatter};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// Completed action
    Success,
    /// Something was skipped
    Warning,
    /// Something was refused
    Error,
}

impl NoticeLevel {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// A request for one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Field label
    pub label: String,
    /// Hint shown in an empty input, e.g. `Example: 100`
    pub placeholder: Option<String>,
}

impl Prompt {
    /// Prompt without placeholder
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: None,
        }
    }

    /// With placeholder
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// The interactive boundary
///
/// `None` from [`Surface::choose`] or [`Surface::prompt`] means the user
/// left (end of input, cancel); callers stop the current action without
/// writing anything.
pub trait Surface {
    /// Show a notice
    fn notify(&mut self, notice: Notice);

    /// Pick one of `options`, returning its index
    fn choose(&mut self, label: &str, options: &[String]) -> Option<usize>;

    /// Read one raw line of input
    fn prompt(&mut self, prompt: &Prompt) -> Option<String>;

    /// Show the original and updated values side by side
    fn compare(&mut self, original: &LiteralMap, updated: &LiteralMap);

    /// Ask a yes/no question
    fn confirm(&mut self, label: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_display() {
        assert_eq!(Notice::warning("Please fill the cell").to_string(), "[warning] Please fill the cell");
    }

    #[test]
    fn prompt_builder() {
        let prompt = Prompt::new("target").with_placeholder("Example: 100");
        assert_eq!(prompt.placeholder.as_deref(), Some("Example: 100"));
    }
}
