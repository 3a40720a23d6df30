//! # Escrow Registry
//!
//! The registry owns every escrow and milestone record and exposes the
//! transition operations. It is simultaneously the data store and the
//! state machine — no ambient singleton, no interior mutability. Embedders
//! that need shared access wrap the registry in their own lock, serialized
//! per operation.
//!
//! ## Check Order
//!
//! Every operation validates in a fixed order: the escrow must exist
//! (`NotFound`), the caller must hold the required role (`NotAuthorized`),
//! the lifecycle state must permit the operation (`InvalidState`), and only
//! then are data invariants checked. A failed call applies no mutation.

use std::collections::HashMap;

use escrow_core::{EscrowError, EscrowId, Principal};

use crate::lifecycle::{Escrow, EscrowState};
use crate::milestone::{Milestone, MilestoneKey};
use crate::settlement::{NullLedger, SettlementInstruction, SettlementLedger};

/// Process-wide escrow state: the escrow table, the milestone table, the
/// next-id counter, and the configured arbiter.
///
/// Generic over the settlement ledger so embedders can inject their own
/// collaborator; [`NullLedger`] is the default.
#[derive(Debug)]
pub struct EscrowRegistry<L: SettlementLedger = NullLedger> {
    escrows: HashMap<EscrowId, Escrow>,
    milestones: HashMap<MilestoneKey, Milestone>,
    next_id: u64,
    arbiter: Principal,
    ledger: L,
}

impl EscrowRegistry {
    /// Create an empty registry with the given arbiter and no ledger.
    pub fn new(arbiter: Principal) -> Self {
        Self::with_ledger(arbiter, NullLedger)
    }
}

impl<L: SettlementLedger> EscrowRegistry<L> {
    /// Create an empty registry forwarding settlements to `ledger`.
    ///
    /// The arbiter is the fixed principal authorized to resolve disputes,
    /// configured out of band by whatever process embeds the registry.
    pub fn with_ledger(arbiter: Principal, ledger: L) -> Self {
        Self {
            escrows: HashMap::new(),
            milestones: HashMap::new(),
            next_id: 0,
            arbiter,
            ledger,
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Create a new escrow in CREATED state and return its id.
    ///
    /// Open to any caller. Ids are allocated monotonically starting at 0.
    /// Zero amounts and zero milestone counts are rejected — an escrow
    /// that holds nothing or can never be released is a caller error.
    pub fn create_escrow(
        &mut self,
        client: Principal,
        freelancer: Principal,
        total_amount: u64,
        milestone_count: u32,
    ) -> Result<EscrowId, EscrowError> {
        if total_amount == 0 {
            return Err(EscrowError::InvalidState {
                operation: "create_escrow",
                reason: "total amount must be positive".to_string(),
            });
        }
        if milestone_count == 0 {
            return Err(EscrowError::InvalidState {
                operation: "create_escrow",
                reason: "milestone count must be positive".to_string(),
            });
        }

        let id = EscrowId(self.next_id);
        self.next_id += 1;
        tracing::info!(
            escrow = %id,
            client = %client,
            freelancer = %freelancer,
            amount = total_amount,
            milestone_count,
            "escrow created"
        );
        self.escrows
            .insert(id, Escrow::new(id, client, freelancer, total_amount, milestone_count));
        Ok(id)
    }

    /// Declare a milestone while the escrow is still in CREATED state.
    ///
    /// Client only. `index` must be within the declared milestone count.
    /// Re-adding an index overwrites the earlier record with a fresh,
    /// incomplete one — the last declaration before `start_escrow` wins.
    pub fn add_milestone(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
        index: u32,
        description: impl Into<String>,
        amount: u64,
    ) -> Result<(), EscrowError> {
        const OP: &str = "add_milestone";
        let escrow = self.get_escrow(escrow_id)?;
        escrow.require_client(caller, OP)?;
        escrow.require_state(EscrowState::Created, OP)?;
        if index >= escrow.milestone_count {
            return Err(EscrowError::InvalidState {
                operation: OP,
                reason: format!(
                    "milestone index {index} out of range for {} milestones",
                    escrow.milestone_count
                ),
            });
        }

        let key = MilestoneKey { escrow_id, index };
        tracing::debug!(milestone = %key, amount, "milestone declared");
        self.milestones.insert(key, Milestone::new(description, amount));
        Ok(())
    }

    /// Move the escrow from CREATED to IN_PROGRESS. Client only.
    pub fn start_escrow(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
    ) -> Result<(), EscrowError> {
        let escrow = self.get_escrow_mut(escrow_id)?;
        escrow.require_client(caller, "start_escrow")?;
        escrow.start()?;
        tracing::info!(escrow = %escrow_id, "escrow started");
        Ok(())
    }

    /// Mark a milestone complete. Freelancer only, IN_PROGRESS only.
    ///
    /// The milestone must exist and must not already be completed.
    pub fn complete_milestone(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
        index: u32,
    ) -> Result<(), EscrowError> {
        const OP: &str = "complete_milestone";
        let escrow = self.get_escrow(escrow_id)?;
        escrow.require_freelancer(caller, OP)?;
        escrow.require_state(EscrowState::InProgress, OP)?;

        let key = MilestoneKey { escrow_id, index };
        let milestone = self.milestones.get_mut(&key).ok_or_else(|| EscrowError::NotFound {
            resource: key.to_string(),
        })?;
        if milestone.completed {
            return Err(EscrowError::InvalidState {
                operation: OP,
                reason: format!("{key} is already completed"),
            });
        }
        milestone.completed = true;

        // Existence was checked above; the key cannot have vanished.
        if let Some(escrow) = self.escrows.get_mut(&escrow_id) {
            escrow.note_milestone_completed();
            tracing::info!(
                milestone = %key,
                completed = escrow.completed_milestones,
                of = escrow.milestone_count,
                "milestone completed"
            );
        }
        Ok(())
    }

    /// Release the full amount to the freelancer once every milestone is
    /// complete (IN_PROGRESS → COMPLETED). Client only.
    ///
    /// Forwards a [`SettlementInstruction::Release`] to the ledger.
    pub fn release_funds(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrows
            .get_mut(&escrow_id)
            .ok_or_else(|| not_found(escrow_id))?;
        escrow.require_client(caller, "release_funds")?;
        escrow.release()?;

        let instruction = SettlementInstruction::Release {
            escrow_id,
            freelancer: escrow.freelancer.clone(),
            amount: escrow.amount,
        };
        tracing::info!(escrow = %escrow_id, amount = escrow.amount, "funds released");
        self.ledger.settle(instruction);
        Ok(())
    }

    /// Raise a dispute (IN_PROGRESS → DISPUTED).
    ///
    /// The only dual-authorization operation: either party may call it.
    pub fn initiate_dispute(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
    ) -> Result<(), EscrowError> {
        let escrow = self.get_escrow_mut(escrow_id)?;
        escrow.require_party(caller, "initiate_dispute")?;
        escrow.dispute(caller)?;
        tracing::warn!(escrow = %escrow_id, raised_by = %caller, "dispute initiated");
        Ok(())
    }

    /// Resolve a dispute with an arbitrated split (DISPUTED → RESOLVED).
    ///
    /// Arbiter only. The shares must sum to the escrowed amount exactly.
    /// Forwards a [`SettlementInstruction::Split`] to the ledger.
    pub fn resolve_dispute(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
        client_share: u64,
        freelancer_share: u64,
    ) -> Result<(), EscrowError> {
        if !self.escrows.contains_key(&escrow_id) {
            return Err(not_found(escrow_id));
        }
        if caller != &self.arbiter {
            return Err(EscrowError::NotAuthorized {
                caller: caller.to_string(),
                operation: "resolve_dispute",
                required: "arbiter",
            });
        }
        let escrow = self
            .escrows
            .get_mut(&escrow_id)
            .ok_or_else(|| not_found(escrow_id))?;
        escrow.resolve(client_share, freelancer_share)?;

        let instruction = SettlementInstruction::Split {
            escrow_id,
            client: escrow.client.clone(),
            client_share,
            freelancer: escrow.freelancer.clone(),
            freelancer_share,
        };
        tracing::info!(
            escrow = %escrow_id,
            client_share,
            freelancer_share,
            "dispute resolved"
        );
        self.ledger.settle(instruction);
        Ok(())
    }

    /// Cancel an escrow before work starts (CREATED → CANCELLED). Client only.
    pub fn cancel_escrow(
        &mut self,
        caller: &Principal,
        escrow_id: EscrowId,
    ) -> Result<(), EscrowError> {
        let escrow = self.get_escrow_mut(escrow_id)?;
        escrow.require_client(caller, "cancel_escrow")?;
        escrow.cancel()?;
        tracing::info!(escrow = %escrow_id, "escrow cancelled");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Look up an escrow by id.
    pub fn escrow(&self, escrow_id: EscrowId) -> Option<&Escrow> {
        self.escrows.get(&escrow_id)
    }

    /// Look up a milestone by escrow id and index.
    pub fn milestone(&self, escrow_id: EscrowId, index: u32) -> Option<&Milestone> {
        self.milestones.get(&MilestoneKey { escrow_id, index })
    }

    /// Number of escrows ever created.
    pub fn escrow_count(&self) -> usize {
        self.escrows.len()
    }

    /// The configured arbiter principal.
    pub fn arbiter(&self) -> &Principal {
        &self.arbiter
    }

    /// The settlement ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ── Internals ────────────────────────────────────────────────────

    fn get_escrow(&self, escrow_id: EscrowId) -> Result<&Escrow, EscrowError> {
        self.escrows.get(&escrow_id).ok_or_else(|| not_found(escrow_id))
    }

    fn get_escrow_mut(&mut self, escrow_id: EscrowId) -> Result<&mut Escrow, EscrowError> {
        self.escrows.get_mut(&escrow_id).ok_or_else(|| not_found(escrow_id))
    }
}

fn not_found(escrow_id: EscrowId) -> EscrowError {
    EscrowError::NotFound {
        resource: escrow_id.to_string(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
