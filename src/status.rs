use std::fmt;

/// Progress bucket derived from a task's completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl CompletionStatus {
    /// Classifies a percentage.
    ///
    /// - `>= 100` is `Completed` (out-of-range values included).
    /// - `1..=99` is `InProgress`.
    /// - Anything else, including an unset percentage, is `NotStarted`.
    pub fn from_percentage(pct: Option<i64>) -> CompletionStatus {
        match pct.unwrap_or(0) {
            p if p >= 100 => CompletionStatus::Completed,
            p if p > 0 => CompletionStatus::InProgress,
            _ => CompletionStatus::NotStarted,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompletionStatus::NotStarted => "Not Started",
            CompletionStatus::InProgress => "In Progress",
            CompletionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
