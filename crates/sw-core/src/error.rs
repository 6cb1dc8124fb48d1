use thiserror::Error;

/// Host-level failure: lifecycle and configuration errors only.
/// Script-level faults never surface here; they become JSON envelopes.
#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct WardenError {
    pub code: String,
    pub message: String,
}

impl WardenError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let error = WardenError::new("VM_CONFIG", "heap budget must be non-zero");
        assert_eq!(error.to_string(), "VM_CONFIG: heap budget must be non-zero");
    }
}
