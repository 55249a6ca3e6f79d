#![no_main]
use libfuzzer_sys::fuzz_target;

use connectly_core::api::{decode_response, GroupDetails, PendingInvite, SearchResults};

// Response decoding must never panic on arbitrary bodies.
fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = decode_response::<GroupDetails>(data) {
        if let Some(details) = envelope.data {
            let _ = details.member_candidates();
            let _ = details.edit_entries();
        }
    }
    if let Ok(envelope) = decode_response::<SearchResults>(data) {
        if let Some(results) = envelope.data {
            let _ = results.candidates();
        }
    }
    let _ = decode_response::<Vec<PendingInvite>>(data);
});
