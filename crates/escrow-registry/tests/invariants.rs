//! Property tests: arbitrary operation interleavings never violate the
//! registry's invariants, whatever mix of callers and escrows they hit.

use std::collections::HashMap;

use proptest::prelude::*;

use escrow_core::{EscrowId, Principal};
use escrow_registry::{EscrowRegistry, EscrowState};

#[derive(Debug, Clone)]
enum Op {
    Create { amount: u64, milestones: u32 },
    AddMilestone { caller: usize, escrow: u64, index: u32, amount: u64 },
    Start { caller: usize, escrow: u64 },
    Complete { caller: usize, escrow: u64, index: u32 },
    Release { caller: usize, escrow: u64 },
    Dispute { caller: usize, escrow: u64 },
    Resolve { caller: usize, escrow: u64, client_share: u64, freelancer_share: u64 },
    Cancel { caller: usize, escrow: u64 },
}

fn principals() -> [Principal; 4] {
    [
        Principal::new("client1"),
        Principal::new("freelancer1"),
        Principal::new("arbiter"),
        Principal::new("stranger"),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let caller = 0usize..4;
    let escrow = 0u64..4;
    prop_oneof![
        (1u64..1000, 1u32..4).prop_map(|(amount, milestones)| Op::Create { amount, milestones }),
        (caller.clone(), escrow.clone(), 0u32..5, 1u64..500).prop_map(
            |(caller, escrow, index, amount)| Op::AddMilestone { caller, escrow, index, amount }
        ),
        (caller.clone(), escrow.clone()).prop_map(|(caller, escrow)| Op::Start { caller, escrow }),
        (caller.clone(), escrow.clone(), 0u32..5)
            .prop_map(|(caller, escrow, index)| Op::Complete { caller, escrow, index }),
        (caller.clone(), escrow.clone())
            .prop_map(|(caller, escrow)| Op::Release { caller, escrow }),
        (caller.clone(), escrow.clone())
            .prop_map(|(caller, escrow)| Op::Dispute { caller, escrow }),
        (caller.clone(), escrow.clone(), 0u64..1200, 0u64..1200).prop_map(
            |(caller, escrow, client_share, freelancer_share)| Op::Resolve {
                caller,
                escrow,
                client_share,
                freelancer_share,
            }
        ),
        (caller, escrow).prop_map(|(caller, escrow)| Op::Cancel { caller, escrow }),
    ]
}

fn apply(reg: &mut EscrowRegistry, who: &[Principal; 4], op: &Op) {
    // Failures are expected constantly here; only the invariants matter.
    let _ = match *op {
        Op::Create { amount, milestones } => reg
            .create_escrow(who[0].clone(), who[1].clone(), amount, milestones)
            .map(|_| ()),
        Op::AddMilestone { caller, escrow, index, amount } => {
            reg.add_milestone(&who[caller], EscrowId(escrow), index, "work", amount)
        }
        Op::Start { caller, escrow } => reg.start_escrow(&who[caller], EscrowId(escrow)),
        Op::Complete { caller, escrow, index } => {
            reg.complete_milestone(&who[caller], EscrowId(escrow), index)
        }
        Op::Release { caller, escrow } => reg.release_funds(&who[caller], EscrowId(escrow)),
        Op::Dispute { caller, escrow } => reg.initiate_dispute(&who[caller], EscrowId(escrow)),
        Op::Resolve { caller, escrow, client_share, freelancer_share } => {
            reg.resolve_dispute(&who[caller], EscrowId(escrow), client_share, freelancer_share)
        }
        Op::Cancel { caller, escrow } => reg.cancel_escrow(&who[caller], EscrowId(escrow)),
    };
}

proptest! {
    #[test]
    fn completed_milestones_never_exceed_declared_count(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let who = principals();
        let mut reg = EscrowRegistry::new(who[2].clone());

        for op in &ops {
            apply(&mut reg, &who, op);
            for n in 0..reg.escrow_count() as u64 {
                let escrow = reg.escrow(EscrowId(n)).unwrap();
                prop_assert!(escrow.completed_milestones <= escrow.milestone_count);
                prop_assert!(escrow.amount > 0);
            }
        }
    }

    #[test]
    fn terminal_escrows_never_move_again(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let who = principals();
        let mut reg = EscrowRegistry::new(who[2].clone());
        let mut frozen: HashMap<EscrowId, EscrowState> = HashMap::new();

        for op in &ops {
            apply(&mut reg, &who, op);
            for n in 0..reg.escrow_count() as u64 {
                let id = EscrowId(n);
                let state = reg.escrow(id).unwrap().state;
                if let Some(terminal) = frozen.get(&id) {
                    prop_assert_eq!(state, *terminal);
                } else if state.is_terminal() {
                    frozen.insert(id, state);
                }
            }
        }
    }

    #[test]
    fn transition_log_edges_are_contiguous(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let who = principals();
        let mut reg = EscrowRegistry::new(who[2].clone());

        for op in &ops {
            apply(&mut reg, &who, op);
        }
        for n in 0..reg.escrow_count() as u64 {
            let escrow = reg.escrow(EscrowId(n)).unwrap();
            let mut current = EscrowState::Created;
            for record in &escrow.transitions {
                prop_assert_eq!(record.from_state, current);
                current = record.to_state;
            }
            prop_assert_eq!(current, escrow.state);
        }
    }
}
