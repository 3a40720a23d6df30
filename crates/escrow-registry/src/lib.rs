//! # escrow-registry — Milestone Escrow State Machine
//!
//! Implements the escrow registry for milestone-based freelance contracts:
//! a single component that is simultaneously the data store and the state
//! machine. The registry owns every escrow and milestone record and exposes
//! role-gated transition operations.
//!
//! ## Modules
//!
//! - **Lifecycle** (`lifecycle.rs`): The escrow state machine —
//!   `Created → InProgress → {Completed | Disputed}`, `Disputed → Resolved`,
//!   `Created → Cancelled` — with an ordered transition log.
//!
//! - **Milestone** (`milestone.rs`): Milestone records keyed by
//!   (escrow id, index).
//!
//! - **Registry** (`registry.rs`): The operations — create, add milestone,
//!   start, complete milestone, release, dispute, resolve, cancel — with
//!   fixed existence → authorization → state → data check order.
//!
//! - **Settlement** (`settlement.rs`): The ledger seam. The registry
//!   signals payouts on COMPLETED/RESOLVED transitions; an external
//!   collaborator moves the value.
//!
//! ## Crate Policy
//!
//! - Depends on `escrow-core` internally.
//! - No `unsafe` code, no `panic!()` or `.unwrap()` outside tests.
//! - Transitions are atomic per escrow: a call either fully applies its
//!   preconditions-then-effect or fails with no partial mutation.

pub mod lifecycle;
pub mod milestone;
pub mod registry;
pub mod settlement;

// ─── Lifecycle re-exports ───────────────────────────────────────────

pub use lifecycle::{Escrow, EscrowState, EscrowTransitionRecord};

// ─── Milestone re-exports ───────────────────────────────────────────

pub use milestone::{Milestone, MilestoneKey};

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::EscrowRegistry;

// ─── Settlement re-exports ──────────────────────────────────────────

pub use settlement::{NullLedger, RecordingLedger, SettlementInstruction, SettlementLedger};
