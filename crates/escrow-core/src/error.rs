//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error kinds surfaced by escrow registry operations. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! Exactly three kinds exist, and check order is fixed across operations:
//! existence is verified before authorization, authorization before
//! lifecycle state. A caller that is not a party to an escrow therefore
//! learns that the escrow exists, but never what state it is in.
//!
//! All failures are surfaced synchronously; no operation partially applies
//! its effect on failure.

use thiserror::Error;

/// Error returned by escrow registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// Referenced escrow or milestone key does not exist.
    #[error("{resource} does not exist")]
    NotFound {
        /// Human-readable name of the missing resource.
        resource: String,
    },

    /// Caller is not the principal this operation requires.
    #[error("{caller} may not call {operation}: requires {required}")]
    NotAuthorized {
        /// The caller that was rejected.
        caller: String,
        /// The operation that was attempted.
        operation: &'static str,
        /// The role the operation requires ("client", "freelancer",
        /// "client or freelancer", "arbiter").
        required: &'static str,
    },

    /// Current lifecycle state or a data invariant forbids the operation.
    #[error("{operation} rejected: {reason}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// Why the operation was rejected.
        reason: String,
    },
}
