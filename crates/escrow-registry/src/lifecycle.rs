//! # Escrow Lifecycle State Machine
//!
//! Models the lifecycle of an escrow contract between a client and a
//! freelancer, from creation through completion, cancellation, or
//! arbitrated dispute resolution.
//!
//! ## States
//!
//! ```text
//! Created ──▶ InProgress ──▶ Completed (terminal)
//!    │             │
//!    │             └──▶ Disputed ──▶ Resolved (terminal)
//!    │
//!    └──▶ Cancelled (terminal)
//! ```
//!
//! ## Design Decision
//!
//! The lifecycle uses an enum with validated transitions rather than
//! typestate types. Every transition is requested by an external caller at
//! runtime, so the escrow must exist as a single storable type whose state
//! is data — `transition()` returning `Result` rejects invalid edges, and
//! the ordered transition log preserves the full history for audit.

use serde::{Deserialize, Serialize};

use escrow_core::{EscrowError, EscrowId, Principal, Timestamp};

// ─── Escrow State ────────────────────────────────────────────────────

/// The lifecycle state of an escrow contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Escrow has been created; milestones may be declared.
    Created,
    /// Work is underway; milestones may be completed.
    InProgress,
    /// All milestones done and funds released (terminal).
    Completed,
    /// One party has raised a dispute; awaiting the arbiter.
    Disputed,
    /// Arbiter has split the funds between the parties (terminal).
    Resolved,
    /// Client cancelled before work started (terminal).
    Cancelled,
}

impl EscrowState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Resolved | Self::Cancelled)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Disputed => "DISPUTED",
            Self::Resolved => "RESOLVED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of an escrow state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowTransitionRecord {
    /// State before the transition.
    pub from_state: EscrowState,
    /// State after the transition.
    pub to_state: EscrowState,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
}

// ─── Escrow ──────────────────────────────────────────────────────────

/// An escrow contract with its lifecycle state and transition history.
///
/// Owned exclusively by the [`EscrowRegistry`](crate::EscrowRegistry) and
/// mutated only through its operations. Transition methods validate the
/// current state before applying any effect; a rejected transition leaves
/// the record untouched.
///
/// Invariants: `completed_milestones <= milestone_count`; `amount > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    /// Unique escrow identifier.
    pub id: EscrowId,
    /// The principal who funds the escrow and accepts deliverables.
    pub client: Principal,
    /// The principal performing the work.
    pub freelancer: Principal,
    /// Total escrowed amount, in minor currency units.
    pub amount: u64,
    /// Current lifecycle state.
    pub state: EscrowState,
    /// Number of milestones declared at creation.
    pub milestone_count: u32,
    /// Number of milestones the freelancer has completed.
    pub completed_milestones: u32,
    /// When the escrow was created.
    pub created_at: Timestamp,
    /// Ordered log of all state transitions.
    pub transitions: Vec<EscrowTransitionRecord>,
}

impl Escrow {
    /// Create a new escrow in the Created state.
    pub(crate) fn new(
        id: EscrowId,
        client: Principal,
        freelancer: Principal,
        amount: u64,
        milestone_count: u32,
    ) -> Self {
        Self {
            id,
            client,
            freelancer,
            amount,
            state: EscrowState::Created,
            milestone_count,
            completed_milestones: 0,
            created_at: Timestamp::now(),
            transitions: Vec::new(),
        }
    }

    /// Start work (CREATED → IN_PROGRESS).
    pub(crate) fn start(&mut self) -> Result<(), EscrowError> {
        self.require_state(EscrowState::Created, "start_escrow")?;
        self.do_transition(EscrowState::InProgress, "work started by client");
        Ok(())
    }

    /// Release funds to the freelancer (IN_PROGRESS → COMPLETED).
    ///
    /// Requires every declared milestone to be completed.
    pub(crate) fn release(&mut self) -> Result<(), EscrowError> {
        self.require_state(EscrowState::InProgress, "release_funds")?;
        if self.completed_milestones != self.milestone_count {
            return Err(EscrowError::InvalidState {
                operation: "release_funds",
                reason: format!(
                    "only {} of {} milestones completed",
                    self.completed_milestones, self.milestone_count
                ),
            });
        }
        self.do_transition(EscrowState::Completed, "all milestones completed");
        Ok(())
    }

    /// Raise a dispute (IN_PROGRESS → DISPUTED).
    pub(crate) fn dispute(&mut self, raised_by: &Principal) -> Result<(), EscrowError> {
        self.require_state(EscrowState::InProgress, "initiate_dispute")?;
        self.do_transition(EscrowState::Disputed, &format!("dispute raised by {raised_by}"));
        Ok(())
    }

    /// Resolve a dispute with an arbitrated split (DISPUTED → RESOLVED).
    ///
    /// The shares must sum to the escrowed amount exactly; the sum is
    /// computed with checked arithmetic so an overflowing pair of shares
    /// is rejected rather than wrapping.
    pub(crate) fn resolve(
        &mut self,
        client_share: u64,
        freelancer_share: u64,
    ) -> Result<(), EscrowError> {
        self.require_state(EscrowState::Disputed, "resolve_dispute")?;
        if client_share.checked_add(freelancer_share) != Some(self.amount) {
            return Err(EscrowError::InvalidState {
                operation: "resolve_dispute",
                reason: format!(
                    "shares {client_share} + {freelancer_share} do not split amount {}",
                    self.amount
                ),
            });
        }
        self.do_transition(EscrowState::Resolved, "dispute resolved by arbiter");
        Ok(())
    }

    /// Cancel before work starts (CREATED → CANCELLED).
    pub(crate) fn cancel(&mut self) -> Result<(), EscrowError> {
        self.require_state(EscrowState::Created, "cancel_escrow")?;
        self.do_transition(EscrowState::Cancelled, "cancelled by client");
        Ok(())
    }

    /// Count a newly completed milestone.
    pub(crate) fn note_milestone_completed(&mut self) {
        self.completed_milestones += 1;
        debug_assert!(self.completed_milestones <= self.milestone_count);
    }

    /// Whether the escrow can no longer transition.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Validate that the caller is the client.
    pub(crate) fn require_client(
        &self,
        caller: &Principal,
        operation: &'static str,
    ) -> Result<(), EscrowError> {
        if caller != &self.client {
            return Err(EscrowError::NotAuthorized {
                caller: caller.to_string(),
                operation,
                required: "client",
            });
        }
        Ok(())
    }

    /// Validate that the caller is the freelancer.
    pub(crate) fn require_freelancer(
        &self,
        caller: &Principal,
        operation: &'static str,
    ) -> Result<(), EscrowError> {
        if caller != &self.freelancer {
            return Err(EscrowError::NotAuthorized {
                caller: caller.to_string(),
                operation,
                required: "freelancer",
            });
        }
        Ok(())
    }

    /// Validate that the caller is either party to the escrow.
    pub(crate) fn require_party(
        &self,
        caller: &Principal,
        operation: &'static str,
    ) -> Result<(), EscrowError> {
        if caller != &self.client && caller != &self.freelancer {
            return Err(EscrowError::NotAuthorized {
                caller: caller.to_string(),
                operation,
                required: "client or freelancer",
            });
        }
        Ok(())
    }

    /// Validate that the escrow is in the expected state.
    pub(crate) fn require_state(
        &self,
        expected: EscrowState,
        operation: &'static str,
    ) -> Result<(), EscrowError> {
        if self.state != expected {
            return Err(EscrowError::InvalidState {
                operation,
                reason: format!("escrow is {}, expected {expected}", self.state),
            });
        }
        Ok(())
    }

    /// Record a state transition.
    fn do_transition(&mut self, to: EscrowState, reason: &str) {
        self.transitions.push(EscrowTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
