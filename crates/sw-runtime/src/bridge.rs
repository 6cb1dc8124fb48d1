use rhai::{EvalAltResult, ParseError};
use sw_core::ScriptFault;

use crate::state::ExecState;

/// Message carried by the fault envelope when the governor aborted the
/// script because `stop` was requested.
pub(crate) const CANCELLED_MESSAGE: &str = "script cancelled by host";

/// Capture a compile failure as the instance's pending fault.
pub(crate) fn capture_parse_fault(state: &ExecState, error: &ParseError, source: &str) {
    let lineno = error.position().line().unwrap_or(0) as u32;
    state.store_fault(fault_at(lineno, error.to_string(), source));
}

/// Capture a runtime failure as the instance's pending fault. A
/// governor-initiated termination is reported with a fixed message rather
/// than the engine's internal wording.
pub(crate) fn capture_eval_fault(state: &ExecState, error: &EvalAltResult, source: &str) {
    let lineno = error.position().line().unwrap_or(0) as u32;
    let message = match error {
        EvalAltResult::ErrorTerminated(..) => CANCELLED_MESSAGE.to_string(),
        _ => error.to_string(),
    };
    state.store_fault(fault_at(lineno, message, source));
}

fn fault_at(lineno: u32, message: String, source: &str) -> ScriptFault {
    ScriptFault::new(lineno, Some(message), source_line(source, lineno))
}

/// Recover the offending source line from the submitted text; the engine
/// reports positions but not the line itself.
pub(crate) fn source_line(source: &str, lineno: u32) -> Option<String> {
    if lineno == 0 {
        return None;
    }
    source
        .lines()
        .nth(lineno as usize - 1)
        .map(|line| line.to_string())
}
