//! Black-box scenarios exercising the receive window through its public
//! API only (no access to `Window`'s private fields), complementing the
//! white-box unit tests colocated with the implementation.

use std::cell::RefCell;
use std::rc::Rc;

use rxwindow::{SlotState, Window, WindowConfig};

fn window_with_capacity(capacity: u32) -> (Window, Rc<RefCell<Vec<Vec<u8>>>>) {
    let delivered = Rc::new(RefCell::new(Vec::new()));
    let sink_handle = delivered.clone();
    let config = WindowConfig::new(1500).unwrap().with_capacity(capacity).unwrap();
    let window = Window::new(config, move |payload| sink_handle.borrow_mut().push(payload)).unwrap();
    (window, delivered)
}

/// A full lossy-recovery round trip: a gap opens, a simulated NAK manager
/// walks the BackOff queue, the sender confirms with an NCF, and the
/// retransmission finally arrives.
#[test]
fn full_nak_ncf_retransmit_cycle() {
    let (mut window, delivered) = window_with_capacity(64);

    window.push(b"seq-100", 100, 100).unwrap();
    window.push(b"seq-101", 101, 100).unwrap();
    assert_eq!(delivered.borrow().len(), 2);

    // 103 arrives before 102: a gap opens at 102.
    window.push(b"seq-103", 103, 100).unwrap();
    assert_eq!(delivered.borrow().len(), 2);

    let mut naks_sent = Vec::new();
    window.state_foreach(SlotState::BackOff, |_payload, seq, state, _age, _retry| {
        naks_sent.push(seq);
        *state = SlotState::WaitNcf;
        false
    });
    assert_eq!(naks_sent, vec![102]);

    // Sender confirms a retransmission is coming.
    window.ncf(102, 100).unwrap();

    // No payload has arrived yet.
    assert_eq!(delivered.borrow().len(), 2);

    // The retransmitted packet arrives.
    window.push(b"seq-102-retransmit", 102, 100).unwrap();
    assert_eq!(delivered.borrow().len(), 4);
    assert!(window.is_empty());

    let payloads = delivered.borrow();
    assert_eq!(payloads[2], b"seq-102-retransmit");
    assert_eq!(payloads[3], b"seq-103");
}

/// Simulates a late joiner: the receiver's first packet observes an
/// already-advanced sender trail, so `rxw_constrained` must suppress NAKs
/// for sequences before the join point rather than trying to recover them.
#[test]
fn late_joiner_does_not_nak_pre_join_sequences() {
    let (mut window, delivered) = window_with_capacity(64);

    // First packet observed is #500 with the sender already advertising
    // trail 500 (everything before was sent before we joined the group).
    window.push(b"first-seen", 500, 500).unwrap();
    assert_eq!(delivered.borrow().len(), 1);

    // The sender's subsequent advertisement moves trail past the join
    // point (lead stays put, so this only exercises the trail-advance
    // path); the window is already empty, so this is a pure cursor jump
    // rather than an eviction.
    window.update(505, 500);
    assert!(window.is_empty());
    assert_eq!(window.stats().forced_losses, 0);
}

/// A sustained burst of arrivals that outpaces recovery: the window stays
/// bounded at capacity, forcing losses rather than growing unboundedly.
#[test]
fn sustained_loss_keeps_window_bounded() {
    let (mut window, delivered) = window_with_capacity(8);

    window.push(b"seed", 1000, 1000).unwrap();
    assert_eq!(delivered.borrow().len(), 1);

    // Jump far ahead repeatedly; each push can only ever hold `capacity`
    // slots, so old placeholders get evicted as forced losses.
    for step in 1..=20u32 {
        let seq = 1000 + step * 10;
        window.push(b"burst", seq, 1000).unwrap();
        assert!(window.stats().not_in_tx_window == 0);
    }

    assert!(window.stats().forced_losses > 0);
    // lead - trail + 1 never exceeds capacity (window invariant 2).
    assert!(window.lead().wrapping_sub(window.trail()).wrapping_add(1) <= 8);
}

/// Duplicate and already-committed pushes must never re-deliver or panic.
#[test]
fn duplicate_and_stale_pushes_are_idempotent() {
    let (mut window, delivered) = window_with_capacity(32);

    window.push(b"a", 10, 10).unwrap();
    window.push(b"b", 11, 10).unwrap();
    window.push(b"c", 12, 10).unwrap();
    assert_eq!(delivered.borrow().len(), 3);

    // Already-committed: trail has moved past 10 and 11.
    let outcome = window.push(b"stale", 10, 10).unwrap();
    assert_eq!(outcome, rxwindow::PushOutcome::Discarded);
    assert_eq!(delivered.borrow().len(), 3);

    // A sequence below the sender's advertised trail is rejected outright.
    let err = window.push(b"too-old", 5, 20);
    assert!(err.is_err());
}

/// `shutdown` must not panic even with slots still resident in the
/// window (an abrupt disconnect mid-recovery).
#[test]
fn shutdown_with_pending_gaps_does_not_panic() {
    let (mut window, _delivered) = window_with_capacity(32);
    window.push(b"a", 10, 10).unwrap();
    window.push(b"c", 12, 10).unwrap();
    assert!(!window.is_empty());
    window.shutdown();
}

/// A gap filled out of order can leave real, received data sitting behind
/// a placeholder that still blocks `trail`. If a later push then needs
/// more than one eviction to make room for its own extension, the first
/// eviction must not be allowed to expose that already-filled slot only
/// for a second eviction in the same call to destroy it. Capacity 3:
/// 100 delivers immediately, 103 opens a gap (placeholders at 101/102),
/// 102 fills its gap but stays behind 101, then 106 forces two evictions
/// to extend far enough — the first reclaims the genuine placeholder at
/// 101, and the resident payloads at 102/103 must flush out rather than
/// being discarded alongside it.
#[test]
fn gap_fill_behind_a_blocking_placeholder_survives_a_multi_step_eviction() {
    let (mut window, delivered) = window_with_capacity(3);

    window.push(b"100", 100, 100).unwrap();
    window.push(b"103", 103, 100).unwrap();
    window.push(b"102", 102, 100).unwrap();
    assert_eq!(delivered.borrow().len(), 1);

    window.push(b"106", 106, 100).unwrap();

    let payloads = delivered.borrow();
    assert_eq!(payloads.as_slice(), &[b"100".to_vec(), b"102".to_vec(), b"103".to_vec()]);
    assert_eq!(window.stats().forced_losses, 1);
}
