/// Orchestrator state definitions
///
/// The harvest walks the alphabet once; this enum is where it currently is.
use std::fmt;

/// Position of the orchestrator in a harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlState {
    /// No domain has been attempted yet in this run
    #[default]
    NotStarted,

    /// The domain at `domain_index` is being crawled or reused from the checkpoint
    InProgress { domain_index: usize },

    /// Every domain is done and the words have been processed
    Completed,
}

impl CrawlState {
    /// Returns true if nothing further will happen in this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true while domains are being walked
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }

    /// Index of the domain being worked on, if any
    pub fn domain_index(&self) -> Option<usize> {
        match self {
            Self::InProgress { domain_index } => Some(*domain_index),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress { .. } => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress { domain_index } => write!(f, "in_progress({})", domain_index),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
