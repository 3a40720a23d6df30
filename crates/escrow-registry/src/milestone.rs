//! # Milestone Records
//!
//! A milestone is a discrete unit of deliverable work tied to a portion of
//! the escrowed amount. Milestones are declared while an escrow is in
//! CREATED state, completed exactly once while it is IN_PROGRESS, and
//! never deleted.

use serde::{Deserialize, Serialize};

use escrow_core::EscrowId;

/// Composite key addressing a milestone within its escrow.
///
/// A struct key rather than a formatted string avoids collisions between
/// identifiers like ("1", "11") and ("11", "1") and keeps lookups
/// allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneKey {
    /// The escrow this milestone belongs to.
    pub escrow_id: EscrowId,
    /// Zero-based milestone index, in `[0, milestone_count)`.
    pub index: u32,
}

impl std::fmt::Display for MilestoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/milestone:{}", self.escrow_id, self.index)
    }
}

/// A single milestone record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// What the freelancer is to deliver.
    pub description: String,
    /// Portion of the escrow tied to this milestone, in minor units.
    ///
    /// Callers are trusted to keep milestone amounts consistent with the
    /// escrow total; the registry does not reconcile the sum.
    pub amount: u64,
    /// Whether the freelancer has completed this milestone.
    pub completed: bool,
}

impl Milestone {
    /// Create an incomplete milestone.
    pub(crate) fn new(description: impl Into<String>, amount: u64) -> Self {
        Self {
            description: description.into(),
            amount,
            completed: false,
        }
    }
}
