use serde::{Deserialize, Serialize};

pub const DEFAULT_FAULT_MESSAGE: &str = "undefined error";
pub const DEFAULT_FAULT_SOURCE: &str = "unknown";

/// One captured script failure: a compile error, a runtime error, or a
/// governor-initiated cancellation. At most one is pending per instance and
/// it is drained within the evaluation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFault {
    /// 1-based line number, 0 when unknown.
    pub lineno: u32,
    pub message: String,
    pub offending_source: String,
}

impl ScriptFault {
    pub fn new(lineno: u32, message: Option<String>, offending_source: Option<String>) -> Self {
        Self {
            lineno,
            message: message
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| DEFAULT_FAULT_MESSAGE.to_string()),
            offending_source: offending_source
                .unwrap_or_else(|| DEFAULT_FAULT_SOURCE.to_string()),
        }
    }
}
