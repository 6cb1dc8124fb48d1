pub mod envelope;
pub mod error;
pub mod fault;
pub mod outcome;

pub use envelope::{fault_envelope, NON_JSON_RESULT_ENVELOPE, UNDEFINED_RESULT_ENVELOPE};
pub use error::WardenError;
pub use fault::ScriptFault;
pub use outcome::EvalOutcome;
