use rhai::packages::{Package, StandardPackage};
use rhai::Engine;

use crate::config::VmConfig;

/// Build a raw engine with the standard built-ins and the limits derived
/// from the instance's stack and heap quotas. Operations stay unlimited:
/// cancellation belongs to the interrupt governor, not an operation quota.
pub(crate) fn build_engine(config: &VmConfig) -> Engine {
    let mut engine = Engine::new_raw();
    engine.register_global_module(StandardPackage::new().as_shared_module());

    engine.set_max_call_levels(config.max_call_levels());
    engine.set_max_expr_depths(config.max_expr_depth(), config.max_function_expr_depth());
    engine.set_max_string_size(config.max_string_size());
    engine.set_max_array_size(config.max_array_size());
    engine.set_max_map_size(config.max_map_size());
    engine.set_max_operations(0);

    engine
}
