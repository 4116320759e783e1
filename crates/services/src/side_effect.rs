use std::fmt;

/// Outcome of a best-effort secondary step.
///
/// Never converted into an error for the caller; services log it and
/// hand it back so adapters can count it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Applied,
    /// The step did not apply to this transition (e.g. no cascade on decline).
    Skipped,
    Failed(String),
}

impl SideEffect {
    pub fn is_failed(&self) -> bool {
        matches!(self, SideEffect::Failed(_))
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffect::Applied => f.write_str("applied"),
            SideEffect::Skipped => f.write_str("skipped"),
            SideEffect::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
