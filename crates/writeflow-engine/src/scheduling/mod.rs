//! Timer and request bookkeeping for the debounced refresh/auto-save loop.
//!
//! Time is always passed in by the caller, so both types are plain state
//! machines that can be driven from an event loop or a test.

pub mod debounce;
pub mod sequence;

pub use debounce::Debouncer;
pub use sequence::{RequestSequencer, Ticket};
