//! Observability subsystem.
//!
//! Structured logging via `tracing`. Estimation failures stay at debug (they
//! are expected), gas-estimation failures at warn (non-fatal), submission
//! failures at warn with the raw message.

pub mod logging;

pub use logging::init as init_logging;
