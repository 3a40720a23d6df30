//! # Settlement Signaling
//!
//! The registry never moves value itself. When an escrow reaches COMPLETED
//! or RESOLVED, it emits a [`SettlementInstruction`] to an injected
//! [`SettlementLedger`] — the seam behind which an external ledger or
//! accounting system performs the actual transfer.

use serde::{Deserialize, Serialize};

use escrow_core::{EscrowId, Principal};

/// A payout instruction forwarded to the external ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementInstruction {
    /// Full release to the freelancer after all milestones completed.
    Release {
        /// The escrow being settled.
        escrow_id: EscrowId,
        /// Recipient of the full amount.
        freelancer: Principal,
        /// The full escrowed amount.
        amount: u64,
    },
    /// Arbitrated split between the parties after a dispute.
    Split {
        /// The escrow being settled.
        escrow_id: EscrowId,
        /// The client side of the split.
        client: Principal,
        /// Amount returned to the client.
        client_share: u64,
        /// The freelancer side of the split.
        freelancer: Principal,
        /// Amount awarded to the freelancer.
        freelancer_share: u64,
    },
}

/// Collaborator that performs value transfer for settled escrows.
///
/// The registry calls `settle` exactly once per COMPLETED or RESOLVED
/// transition, after the transition has been applied. Implementations own
/// durability and delivery semantics.
pub trait SettlementLedger {
    /// Accept a payout instruction for execution.
    fn settle(&mut self, instruction: SettlementInstruction);
}

/// Ledger that discards every instruction.
///
/// Default for embedders that drive settlement through some other channel,
/// such as reading the escrow states directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLedger;

impl SettlementLedger for NullLedger {
    fn settle(&mut self, _instruction: SettlementInstruction) {}
}

/// Ledger that collects instructions in order for later inspection.
///
/// Useful for dry runs and for asserting settlement behavior in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingLedger {
    instructions: Vec<SettlementInstruction>,
}

impl RecordingLedger {
    /// Create an empty recording ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The instructions received so far, in arrival order.
    pub fn instructions(&self) -> &[SettlementInstruction] {
        &self.instructions
    }
}

impl SettlementLedger for RecordingLedger {
    fn settle(&mut self, instruction: SettlementInstruction) {
        self.instructions.push(instruction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_ledger_preserves_order() {
        let mut ledger = RecordingLedger::new();
        ledger.settle(SettlementInstruction::Release {
            escrow_id: EscrowId(0),
            freelancer: Principal::new("freelancer1"),
            amount: 1000,
        });
        ledger.settle(SettlementInstruction::Split {
            escrow_id: EscrowId(1),
            client: Principal::new("client1"),
            client_share: 400,
            freelancer: Principal::new("freelancer1"),
            freelancer_share: 600,
        });

        assert_eq!(ledger.instructions().len(), 2);
        assert!(matches!(
            ledger.instructions()[0],
            SettlementInstruction::Release { amount: 1000, .. }
        ));
    }

    #[test]
    fn test_instruction_serde_roundtrip() {
        let instruction = SettlementInstruction::Split {
            escrow_id: EscrowId(2),
            client: Principal::new("client1"),
            client_share: 250,
            freelancer: Principal::new("freelancer1"),
            freelancer_share: 750,
        };
        let json = serde_json::to_string(&instruction).unwrap();
        let parsed: SettlementInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, instruction);
    }
}
