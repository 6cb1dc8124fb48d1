use sw_core::WardenError;

/// Native stack consumed per script call level, used to derive the engine's
/// recursion cap from the caller's stack quota.
const STACK_BYTES_PER_CALL_LEVEL: usize = 16 * 1024;
const MIN_CALL_LEVELS: usize = 8;
const MAX_CALL_LEVELS: usize = 256;

const MAX_EXPR_DEPTH: usize = 64;
const MAX_FUNCTION_EXPR_DEPTH: usize = 32;

/// Resource quotas for one instance. The two byte budgets are the external
/// contract; everything the engine enforces is derived from them.
#[derive(Debug, Clone)]
pub struct VmConfig {
    pub thread_stack_bytes: usize,
    pub heap_budget_bytes: usize,
}

impl VmConfig {
    pub const DEFAULT_THREAD_STACK_BYTES: usize = 1 << 20;
    pub const DEFAULT_HEAP_BUDGET_BYTES: usize = 8 << 20;

    pub fn new(thread_stack_bytes: usize, heap_budget_bytes: usize) -> Result<Self, WardenError> {
        if thread_stack_bytes == 0 {
            return Err(WardenError::new(
                "VM_CONFIG",
                "thread stack quota must be non-zero",
            ));
        }
        if heap_budget_bytes == 0 {
            return Err(WardenError::new(
                "VM_CONFIG",
                "heap budget must be non-zero",
            ));
        }
        Ok(Self {
            thread_stack_bytes,
            heap_budget_bytes,
        })
    }

    pub(crate) fn max_call_levels(&self) -> usize {
        (self.thread_stack_bytes / STACK_BYTES_PER_CALL_LEVEL)
            .clamp(MIN_CALL_LEVELS, MAX_CALL_LEVELS)
    }

    pub(crate) fn max_expr_depth(&self) -> usize {
        MAX_EXPR_DEPTH
    }

    pub(crate) fn max_function_expr_depth(&self) -> usize {
        MAX_FUNCTION_EXPR_DEPTH
    }

    /// Cap on any single incidental allocation: 25% of the heap budget.
    pub(crate) fn max_string_size(&self) -> usize {
        (self.heap_budget_bytes / 4).max(1)
    }

    pub(crate) fn max_array_size(&self) -> usize {
        (self.heap_budget_bytes / 16).max(1)
    }

    pub(crate) fn max_map_size(&self) -> usize {
        (self.heap_budget_bytes / 32).max(1)
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            thread_stack_bytes: Self::DEFAULT_THREAD_STACK_BYTES,
            heap_budget_bytes: Self::DEFAULT_HEAP_BUDGET_BYTES,
        }
    }
}
