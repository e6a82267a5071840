//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key) + config (RPC URLs, gas policy)
//!     → writer.rs (key loading, signing, broadcast, receipt wait)
//!     → reader.rs (RPC reads with timeouts and failover)
//!     → contracts.rs / calls.rs (typed per-method call schema)
//!     → swap.rs (autocompound swap-path encoding)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod calls;
pub mod contracts;
pub mod reader;
pub mod swap;
pub mod types;
pub mod writer;

pub use calls::{ContractSet, WriteCall};
pub use reader::ChainReader;
pub use types::{Account, BlockInfo, ChainError, ChainId, ChainResult};
pub use writer::ChainWriter;
