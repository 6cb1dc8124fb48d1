use rhai::{Dynamic, Engine, ImmutableString, Scope, FLOAT, INT};
use sw_core::{
    fault_envelope, EvalOutcome, NON_JSON_RESULT_ENVELOPE, UNDEFINED_RESULT_ENVELOPE,
};

use crate::bridge;
use crate::state::ExecState;

/// Compile and execute one unit of source against the instance's global
/// scope, then serialize the outcome. All script-level failures are drained
/// from the fault slot within this call; none survive into the next one.
pub(crate) fn run_pipeline(
    engine: &Engine,
    scope: &mut Scope<'static>,
    state: &ExecState,
    label: &str,
    source: &str,
    want_value: bool,
) -> EvalOutcome {
    let mut ast = match engine.compile_with_scope(scope, source) {
        Ok(ast) => ast,
        Err(error) => {
            bridge::capture_parse_fault(state, &error, source);
            return drain_fault(state);
        }
    };
    ast.set_source(label);

    // A stale fault from an earlier evaluation must not bleed into this one.
    state.clear_fault();

    let value = match engine.eval_ast_with_scope::<Dynamic>(scope, &ast) {
        Ok(value) => value,
        Err(error) => {
            bridge::capture_eval_fault(state, &error, source);
            return drain_fault(state);
        }
    };

    if !want_value {
        return EvalOutcome::NoResult;
    }
    render_value(value)
}

fn drain_fault(state: &ExecState) -> EvalOutcome {
    match state.take_fault() {
        Some(fault) => EvalOutcome::Fault(fault_envelope(&fault)),
        None => EvalOutcome::NoResult,
    }
}

/// Scripts hand back either nothing or JSON-expressible text. Strings pass
/// through verbatim; integers, floats, and booleans are already JSON
/// scalars; everything else is a protocol violation.
fn render_value(value: Dynamic) -> EvalOutcome {
    if value.is::<ImmutableString>() {
        return EvalOutcome::Value(value.cast::<ImmutableString>().to_string());
    }
    if value.is::<()>() {
        return EvalOutcome::Fault(UNDEFINED_RESULT_ENVELOPE.to_string());
    }
    if value.is::<INT>() || value.is::<FLOAT>() || value.is::<bool>() {
        return EvalOutcome::Value(value.to_string());
    }
    EvalOutcome::Fault(NON_JSON_RESULT_ENVELOPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_pass_through_verbatim() {
        let rendered = render_value(Dynamic::from("already json".to_string()));
        assert_eq!(rendered, EvalOutcome::Value("already json".to_string()));
    }

    #[test]
    fn unit_maps_to_the_undefined_envelope() {
        assert_eq!(
            render_value(Dynamic::UNIT),
            EvalOutcome::Fault(UNDEFINED_RESULT_ENVELOPE.to_string())
        );
    }

    #[test]
    fn json_scalars_serialize_as_text() {
        assert_eq!(
            render_value(Dynamic::from(2 as INT)),
            EvalOutcome::Value("2".to_string())
        );
        assert_eq!(
            render_value(Dynamic::from(true)),
            EvalOutcome::Value("true".to_string())
        );
    }

    #[test]
    fn containers_map_to_the_non_json_envelope() {
        let map = rhai::Map::new();
        assert_eq!(
            render_value(Dynamic::from_map(map)),
            EvalOutcome::Fault(NON_JSON_RESULT_ENVELOPE.to_string())
        );
        let array = rhai::Array::new();
        assert_eq!(
            render_value(Dynamic::from_array(array)),
            EvalOutcome::Fault(NON_JSON_RESULT_ENVELOPE.to_string())
        );
    }
}
