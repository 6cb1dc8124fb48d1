mod bridge;
mod config;
mod engine;
mod eval;
mod governor;
mod hostlog;
mod runtime;
mod state;
mod vm;

pub use config::VmConfig;
pub use hostlog::LOG_FN_NAME;
pub use runtime::process_teardown;
pub use state::GcStats;
pub use vm::WardenVm;
