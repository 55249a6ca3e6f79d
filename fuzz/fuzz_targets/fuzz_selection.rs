#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;

use connectly_core::membership::{Candidate, MembershipSets, SelectionReconciler};
use connectly_core::UserID;

/// Fuzz the add-members selection state machine.
///
/// Checks after every step:
/// - no blocked id is ever staged
/// - the staged list has no duplicates
/// - the configured limit is never exceeded
/// - chips mirror the staged ids one-to-one

#[derive(Arbitrary, Debug)]
enum Step {
    Toggle(u8),
    RemoveChip(u8),
    Refilter(Vec<u8>),
}

#[derive(Arbitrary, Debug)]
struct SelectionInput {
    existing: Vec<u8>,
    pending: Vec<u8>,
    limit: Option<u8>,
    steps: Vec<Step>,
}

fn candidate(id: u8) -> Candidate {
    Candidate {
        id: UserID(id as i64),
        display_name: format!("user {}", id),
        email: format!("u{}@example.com", id),
        avatar_ref: None,
    }
}

fuzz_target!(|input: SelectionInput| {
    if input.steps.len() > 512 {
        return;
    }
    let limit = input.limit.map(|l| l.max(1) as usize);

    let sets = MembershipSets::from_server(
        input.existing.iter().map(|&i| UserID(i as i64)),
        input.pending.iter().map(|&i| UserID(i as i64)),
    );
    let mut reconciler = SelectionReconciler::new(sets).with_max_selection(limit);
    reconciler.replace_roster((0..=u8::MAX).map(candidate).collect());

    for step in input.steps {
        match step {
            Step::Toggle(id) => {
                let _ = reconciler.on_toggle_requested(&candidate(id));
            }
            Step::RemoveChip(id) => {
                reconciler.remove_chip(UserID(id as i64));
            }
            Step::Refilter(ids) => {
                reconciler.replace_roster(ids.into_iter().map(candidate).collect());
            }
        }

        let staged = reconciler.sets().selected_ids();
        for id in &staged {
            assert!(!reconciler.sets().is_blocked(*id));
        }
        let mut dedup = staged.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), staged.len());
        if let Some(limit) = limit {
            assert!(staged.len() <= limit);
        }
        let chip_ids: Vec<UserID> = reconciler.chips().iter().map(|c| c.id).collect();
        assert_eq!(chip_ids, staged);
    }
});
