use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use sw_core::ScriptFault;

/// Per-instance execution state shared between the evaluating thread (the
/// governor and the bridge run on it) and the thread that calls `stop`.
pub(crate) struct ExecState {
    branch_count: AtomicU32,
    terminate: AtomicBool,
    fault: Mutex<Option<ScriptFault>>,
    incremental_collections: AtomicU64,
    full_collections: AtomicU64,
}

/// Collection-pacing counters observed by the governor, one epoch at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GcStats {
    pub incremental_collections: u64,
    pub full_collections: u64,
}

impl ExecState {
    pub(crate) fn new() -> Self {
        Self {
            branch_count: AtomicU32::new(0),
            terminate: AtomicBool::new(false),
            fault: Mutex::new(None),
            incremental_collections: AtomicU64::new(0),
            full_collections: AtomicU64::new(0),
        }
    }

    /// Write-once false to true; the only externally triggered cancellation
    /// signal. Read by the governor on the evaluating thread.
    pub(crate) fn request_terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    pub(crate) fn terminate_requested(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    /// Last fault wins; callers drain the slot after every evaluation, so at
    /// most one is ever pending in practice.
    pub(crate) fn store_fault(&self, fault: ScriptFault) {
        let mut slot = self.fault.lock().unwrap_or_else(|error| error.into_inner());
        *slot = Some(fault);
    }

    pub(crate) fn take_fault(&self) -> Option<ScriptFault> {
        self.fault
            .lock()
            .unwrap_or_else(|error| error.into_inner())
            .take()
    }

    pub(crate) fn clear_fault(&self) {
        let _ = self.take_fault();
    }

    pub(crate) fn branch_count(&self) -> u32 {
        self.branch_count.load(Ordering::SeqCst)
    }

    pub(crate) fn bump_branch_count(&self) -> u32 {
        self.branch_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn reset_branch_count(&self) {
        self.branch_count.store(0, Ordering::SeqCst);
    }

    pub(crate) fn record_incremental_collection(&self) {
        self.incremental_collections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_full_collection(&self) {
        self.full_collections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn gc_stats(&self) -> GcStats {
        GcStats {
            incremental_collections: self.incremental_collections.load(Ordering::Relaxed),
            full_collections: self.full_collections.load(Ordering::Relaxed),
        }
    }
}
