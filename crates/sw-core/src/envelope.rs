use crate::fault::ScriptFault;

/// Returned when `want_value` was requested but the script produced no value.
pub const UNDEFINED_RESULT_ENVELOPE: &str =
    r#"{"error": "Expression returned undefined", "lineno": 0, "source": "unknown"}"#;

/// Returned when the script handed back a value that is neither text nor a
/// JSON scalar. Callers require scripts to return nothing or a string that
/// is itself JSON; anything else is a protocol violation, not serialized.
pub const NON_JSON_RESULT_ENVELOPE: &str =
    r#"{"error": "non-JSON return value", "lineno": 0, "source": "unknown"}"#;

/// Render a captured fault as the fixed JSON error envelope. String fields
/// go through a complete JSON escaper, so the envelope is always valid JSON
/// even when the offending source contains quotes, backslashes, or newlines.
pub fn fault_envelope(fault: &ScriptFault) -> String {
    format!(
        "{{\"error\": {{\"lineno\": {}, \"message\": {}, \"source\": {}}}}}",
        fault.lineno,
        json_string(&fault.message),
        json_string(&fault.offending_source),
    )
}

fn json_string(text: &str) -> String {
    serde_json::to_string(text).expect("string to JSON serialization cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_lineno_message_and_source() {
        let fault = ScriptFault::new(
            7,
            Some("Syntax error: unexpected token".to_string()),
            Some("let x = ;".to_string()),
        );
        assert_eq!(
            fault_envelope(&fault),
            r#"{"error": {"lineno": 7, "message": "Syntax error: unexpected token", "source": "let x = ;"}}"#
        );
    }

    #[test]
    fn envelope_is_parseable_json() {
        let fault = ScriptFault::new(2, Some("boom".to_string()), Some("say \"hi\"".to_string()));
        let parsed: serde_json::Value =
            serde_json::from_str(&fault_envelope(&fault)).expect("envelope must be valid JSON");
        assert_eq!(parsed["error"]["lineno"], 2);
        assert_eq!(parsed["error"]["source"], "say \"hi\"");
    }

    #[test]
    fn quotes_are_escaped() {
        let fault = ScriptFault::new(1, Some("bad".to_string()), Some(r#"x = "y""#.to_string()));
        let envelope = fault_envelope(&fault);
        assert!(envelope.contains(r#""source": "x = \"y\"""#));
    }

    #[test]
    fn backslashes_and_newlines_are_escaped() {
        let fault = ScriptFault::new(
            1,
            Some("line one\nline two".to_string()),
            Some(r"a \ b".to_string()),
        );
        let envelope = fault_envelope(&fault);
        assert!(envelope.contains(r#""message": "line one\nline two""#));
        assert!(envelope.contains(r#""source": "a \\ b""#));
        serde_json::from_str::<serde_json::Value>(&envelope).expect("still valid JSON");
    }

    #[test]
    fn fixed_envelopes_are_valid_json() {
        for envelope in [UNDEFINED_RESULT_ENVELOPE, NON_JSON_RESULT_ENVELOPE] {
            serde_json::from_str::<serde_json::Value>(envelope).expect("fixed envelope JSON");
        }
    }
}
