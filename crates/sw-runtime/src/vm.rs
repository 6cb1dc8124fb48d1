use std::sync::{Arc, Condvar, Mutex};

use rhai::{Engine, Scope};
use sw_core::{EvalOutcome, WardenError};

use crate::config::VmConfig;
use crate::engine::build_engine;
use crate::eval::run_pipeline;
use crate::governor::install_governor;
use crate::hostlog::register_host_log;
use crate::runtime::{self, RegistryLease};
use crate::state::{ExecState, GcStats};

/// One configured engine instance: engine, persistent global scope, and
/// execution state. Handles are cheap clones over the same instance, so the
/// evaluating thread and the stopping thread can each hold one.
#[derive(Clone)]
pub struct WardenVm {
    inner: Arc<VmInner>,
}

struct VmInner {
    engine: Engine,
    scope: Mutex<Scope<'static>>,
    state: Arc<ExecState>,
    gate: RunGate,
}

/// Completion gate: `eval` marks itself running for the duration of the
/// pipeline; `stop` waits on the condvar until the in-flight evaluation has
/// drained before releasing anything.
struct RunGate {
    flags: Mutex<GateFlags>,
    idle: Condvar,
}

struct GateFlags {
    running: bool,
    stopped: bool,
    lease: Option<RegistryLease>,
}

struct RunGuard<'a> {
    gate: &'a RunGate,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut flags = self
            .gate
            .flags
            .lock()
            .unwrap_or_else(|error| error.into_inner());
        flags.running = false;
        self.gate.idle.notify_all();
    }
}

impl WardenVm {
    /// Create one instance bounded by the given quotas: build the engine
    /// with derived limits, install the interrupt governor, register the
    /// native log surface, and attach fresh execution state. Fails after
    /// `process_teardown`; the registry slot is released on every failure
    /// path.
    pub fn initialize(config: VmConfig) -> Result<Self, WardenError> {
        let lease = runtime::register_instance()?;

        let state = Arc::new(ExecState::new());
        let mut engine = build_engine(&config);
        install_governor(&mut engine, Arc::clone(&state));
        register_host_log(&mut engine);

        Ok(Self {
            inner: Arc::new(VmInner {
                engine,
                scope: Mutex::new(Scope::new()),
                state,
                gate: RunGate {
                    flags: Mutex::new(GateFlags {
                        running: false,
                        stopped: false,
                        lease: Some(lease),
                    }),
                    idle: Condvar::new(),
                },
            }),
        })
    }

    /// Run one unit of source against this instance's global scope. Absent
    /// source is a guard, not an error. Top-level `let` bindings persist in
    /// the scope across evaluations.
    pub fn eval(
        &self,
        source_label: &str,
        source_text: Option<&str>,
        want_value: bool,
    ) -> Result<EvalOutcome, WardenError> {
        let Some(source) = source_text else {
            return Ok(EvalOutcome::NoResult);
        };

        let _run = self.inner.begin_run()?;
        let mut scope = self
            .inner
            .scope
            .lock()
            .unwrap_or_else(|error| error.into_inner());
        Ok(run_pipeline(
            &self.inner.engine,
            &mut scope,
            &self.inner.state,
            source_label,
            source,
            want_value,
        ))
    }

    /// Request cancellation and block until no script executes within this
    /// instance, then release its process-wide slot and drop any pending
    /// fault. Exactly one caller per instance invokes this; later `eval`
    /// calls fail with `VM_STOPPED`.
    pub fn stop(&self) {
        self.inner.state.request_terminate();

        let mut flags = self
            .inner
            .gate
            .flags
            .lock()
            .unwrap_or_else(|error| error.into_inner());
        while flags.running {
            flags = self
                .inner
                .gate
                .idle
                .wait(flags)
                .unwrap_or_else(|error| error.into_inner());
        }
        flags.stopped = true;
        flags.lease.take();
        drop(flags);

        self.inner.state.clear_fault();
    }

    pub fn gc_stats(&self) -> GcStats {
        self.inner.state.gc_stats()
    }

    #[cfg(test)]
    pub(crate) fn branch_count(&self) -> u32 {
        self.inner.state.branch_count()
    }
}

impl VmInner {
    fn begin_run(&self) -> Result<RunGuard<'_>, WardenError> {
        let mut flags = self.gate.flags.lock().unwrap_or_else(|error| error.into_inner());
        if flags.stopped {
            return Err(WardenError::new(
                "VM_STOPPED",
                "instance has been stopped; create a new one to evaluate again",
            ));
        }
        if flags.running {
            return Err(WardenError::new(
                "VM_BUSY",
                "an evaluation is already in flight; the context is not reentrant",
            ));
        }
        flags.running = true;
        Ok(RunGuard { gate: &self.gate })
    }
}
