//! Estimation subsystem.
//!
//! Read-only previews of pending actions via `eth_call`, with
//! latest-request-wins cancellation. Failures are expected and silent.

pub mod engine;

pub use engine::{EstimationEngine, EstimationOutcome, EstimationResult};
