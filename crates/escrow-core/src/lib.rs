//! # escrow-core — Foundational Types for the Escrow Registry
//!
//! Defines the type-system primitives shared across the escrow workspace.
//! The registry crate depends on `escrow-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `EscrowId` and `Principal`
//!    are newtypes — no bare integers for escrow identifiers, no bare strings
//!    for caller identities.
//!
//! 2. **One error hierarchy, three kinds.** Every registry operation fails
//!    with exactly one of `NotFound`, `NotAuthorized`, or `InvalidState`,
//!    carrying structured context. Callers pattern-match on the kind;
//!    no stack unwinding for control flow.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision so transition logs render deterministically as
//!    `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other workspace crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`.

pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::EscrowError;
pub use identity::{EscrowId, Principal};
pub use temporal::Timestamp;
