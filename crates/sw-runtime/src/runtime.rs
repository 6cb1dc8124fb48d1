use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sw_core::WardenError;

/// Process-wide lifecycle: engine-active after the first instance, fully
/// stopped after teardown. Instantiable so the contract is testable without
/// touching the process global.
pub(crate) struct RuntimeRegistry {
    live: AtomicUsize,
    torn_down: AtomicBool,
}

impl RuntimeRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
            torn_down: AtomicBool::new(false),
        }
    }

    pub(crate) fn register(&self) -> Result<(), WardenError> {
        if self.torn_down.load(Ordering::SeqCst) {
            return Err(WardenError::new(
                "VM_TEARDOWN_COMPLETE",
                "engine teardown has completed; no further instances can be created",
            ));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub(crate) fn release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    /// Tearing down while instances are live is a programming error in the
    /// caller's shutdown ordering, not a recoverable failure.
    pub(crate) fn teardown(&self) {
        assert_eq!(
            self.live.load(Ordering::SeqCst),
            0,
            "process_teardown called while instances are still live"
        );
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

static GLOBAL_REGISTRY: RuntimeRegistry = RuntimeRegistry::new();

/// Slot held by one live instance; released when the instance is stopped
/// (or, failing that, when its last handle drops).
pub(crate) struct RegistryLease;

impl Drop for RegistryLease {
    fn drop(&mut self) {
        GLOBAL_REGISTRY.release();
    }
}

pub(crate) fn register_instance() -> Result<RegistryLease, WardenError> {
    GLOBAL_REGISTRY.register()?;
    Ok(RegistryLease)
}

/// Global, one-time, process-wide shutdown. Must be called after every
/// instance has been stopped; no instance may be created afterwards.
pub fn process_teardown() {
    GLOBAL_REGISTRY.teardown();
}
