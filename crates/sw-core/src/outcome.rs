/// Outcome of one evaluation, as delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The script returned text (or a JSON scalar); delivered verbatim.
    Value(String),
    /// A JSON error envelope: compile error, runtime error, cancellation,
    /// or return-type protocol violation.
    Fault(String),
    /// Nothing to deliver: no source was given or no value was requested.
    NoResult,
}

impl EvalOutcome {
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    pub fn into_payload(self) -> Option<String> {
        match self {
            Self::Value(text) | Self::Fault(text) => Some(text),
            Self::NoResult => None,
        }
    }
}
