//! Miri-compatible tests for detecting undefined behavior.
//!
//! Run with: `cargo +nightly miri test --test miri_tests`
//!
//! These tests exercise the unsafe paths on tiny rings: raw-memory
//! construction, the multi-block payload writes behind `Reservation`, the
//! bulk copy in `read` including the rewind skip, and the short-buffer and
//! lap protocols. Sizes are kept small so Miri finishes quickly.

use ringspmc_rs::{MsgHeader, ReadStatus, RecvError, Ring, HEADER_SIZE};
use std::alloc::{alloc_zeroed, dealloc, Layout};

/// A zero-filled raw allocation behaves as an empty queue, end to end.
#[test]
fn miri_zeroed_raw_memory_is_a_queue() {
    let layout = Layout::new::<Ring<4>>();
    unsafe {
        let mem = alloc_zeroed(layout);
        assert!(!mem.is_null());
        {
            let ring = Ring::<4>::from_shared(mem);
            assert_eq!(ring.subscribe(false), 0);
            assert_eq!(ring.subscribe(true), 0);

            let mut publisher = ring.publisher();
            let mut subscriber = ring.subscriber(false);
            let mut buf = [0u8; 256];
            assert_eq!(subscriber.recv(&mut buf), Err(RecvError::Empty));

            assert!(publisher.publish(5, b"mapped", false));
            let msg = subscriber.recv(&mut buf).unwrap();
            assert_eq!(msg.userdata, 5);
            assert_eq!(msg.payload, b"mapped");
        }
        dealloc(mem, layout);
    }
}

/// Multi-block payload writes and the rewind skip stay in bounds.
#[test]
fn miri_rewind_and_multi_block_payload() {
    let ring = Ring::<4>::new_boxed();
    let mut publisher = unsafe { ring.publisher() };

    // Park the cursor one block short of the boundary.
    for _ in 0..3 {
        assert!(publisher.publish(0, &[1u8; 16], false));
    }

    // Two-block record forces the rewind marker and spans blocks 0-1.
    let payload: Vec<u8> = (0..100u8).collect();
    let mut reservation = publisher.alloc(payload.len()).unwrap();
    reservation.set_userdata(9);
    reservation.payload_mut().copy_from_slice(&payload);
    reservation.commit(false);

    let mut idx = 0u64;
    let mut buf = [0u8; 256];
    for _ in 0..3 {
        assert!(matches!(ring.read(&mut idx, &mut buf), ReadStatus::Ok(24)));
    }
    match ring.read(&mut idx, &mut buf) {
        ReadStatus::Ok(size) => {
            assert_eq!(size as usize, payload.len() + HEADER_SIZE);
            assert_eq!(MsgHeader::read_from(&buf).unwrap().userdata, 9);
            assert_eq!(&buf[HEADER_SIZE..size as usize], &payload[..]);
        }
        other => panic!("expected the rewound record, got {other:?}"),
    }
}

/// The short-buffer path copies only the clamped prefix.
#[test]
fn miri_short_buffer_copies_prefix_only() {
    let ring = Ring::<4>::new_boxed();
    let mut publisher = unsafe { ring.publisher() };
    assert!(publisher.publish(2, &[0x7F; 120], false));

    let mut idx = 0u64;
    let mut tiny = [0u8; 16];
    assert_eq!(ring.read(&mut idx, &mut tiny), ReadStatus::BuffTooShort(128));
    assert_eq!(idx, 0);

    let mut full = [0u8; 128];
    assert_eq!(ring.read(&mut idx, &mut full), ReadStatus::Ok(128));
    assert_eq!(idx, 2);
}

/// An abandoned reservation leaves no trace a reader could trip over.
#[test]
fn miri_abandoned_reservation() {
    let ring = Ring::<4>::new_boxed();
    let mut publisher = unsafe { ring.publisher() };

    {
        let mut reservation = publisher.alloc(40).unwrap();
        reservation.payload_mut().fill(0xEE);
    }

    let mut idx = 0u64;
    let mut buf = [0u8; 256];
    assert_eq!(ring.read(&mut idx, &mut buf), ReadStatus::Again);

    assert!(publisher.publish(1, b"real", false));
    assert!(matches!(ring.read(&mut idx, &mut buf), ReadStatus::Ok(_)));
}

/// Lap detection on the real type: the reader is refused, resubscribing
/// recovers.
#[test]
fn miri_lap_then_resubscribe() {
    let ring = Ring::<4>::new_boxed();
    let mut publisher = unsafe { ring.publisher() };
    let mut subscriber = ring.subscriber(false);

    for tag in 0..6 {
        assert!(publisher.publish(tag, &[9u8; 32], false));
    }

    let mut buf = [0u8; 256];
    assert_eq!(subscriber.recv(&mut buf), Err(RecvError::Lapped));
    subscriber.resubscribe(false);
    assert_eq!(subscriber.recv(&mut buf), Err(RecvError::Empty));

    assert!(publisher.publish(6, &[9u8; 32], false));
    assert_eq!(subscriber.recv(&mut buf).unwrap().userdata, 6);
}
