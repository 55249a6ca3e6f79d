#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;

use connectly_core::membership::{EditMemberEntry, EditSelection};
use connectly_core::UserID;

/// Fuzz the edit-group removal diff.
///
/// Removals must never name the creator or the acting user, must only name
/// unchecked roster members, and must follow original roster order.

#[derive(Arbitrary, Debug)]
struct EditInput {
    roster: Vec<(u8, bool)>,
    acting_user: u8,
    taps: Vec<u8>,
}

fuzz_target!(|input: EditInput| {
    if input.roster.len() > 256 || input.taps.len() > 512 {
        return;
    }

    let mut seen = std::collections::BTreeSet::new();
    let original: Vec<EditMemberEntry> = input
        .roster
        .iter()
        .filter(|(id, _)| seen.insert(*id))
        .map(|&(id, is_creator)| EditMemberEntry {
            id: UserID(id as i64),
            is_creator,
        })
        .collect();
    let acting = UserID(input.acting_user as i64);

    let mut selection = EditSelection::new(original.clone(), acting);
    for tap in input.taps {
        selection.toggle(UserID(tap as i64));
    }

    let removals = selection.removals();
    let mut cursor = 0;
    for removal in &removals {
        assert!(removal.remove);
        assert_ne!(removal.user_id, acting);
        assert!(!selection.is_checked(removal.user_id));

        let pos = original[cursor..]
            .iter()
            .position(|e| e.id == removal.user_id)
            .map(|p| p + cursor);
        let pos = match pos {
            Some(p) => p,
            None => panic!("removal out of roster order: {:?}", removal),
        };
        assert!(!original[pos].is_creator);
        cursor = pos + 1;
    }
});
