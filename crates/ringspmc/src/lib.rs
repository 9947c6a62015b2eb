//! RingSPMC - Lock-Free Single-Publisher Multi-Subscriber Broadcast Queue
//!
//! A broadcast message queue laid out as plain data in a fixed, contiguous
//! memory region, so it can be placed in a `mmap`-backed shared-memory
//! segment and used by unrelated processes. One publisher appends
//! variable-sized messages; any number of passive subscribers read the same
//! stream without coordinating with the publisher or with each other.
//! Subscribers that fall a full ring behind lose messages and are told to
//! resubscribe.
//!
//! # Key Features
//!
//! - Wait-free publisher: never blocks, never allocates, never aware of readers
//! - Variable-sized records over cache-line-aligned 64-byte blocks
//! - Zero-initializable: a zero-filled region is a valid empty queue
//! - Crash safe: a dying publisher or subscriber cannot corrupt the queue
//! - Key messages: late subscribers can attach at the last marked record
//! - Zero-copy reserve/commit API on the publisher side
//!
//! # Example
//!
//! ```
//! use ringspmc_rs::Ring;
//!
//! let ring = Ring::<64>::new_boxed();
//!
//! // SAFETY: exactly one publisher per queue.
//! let mut publisher = unsafe { ring.publisher() };
//! let mut subscriber = ring.subscriber(false);
//!
//! // Zero-copy API: alloc + fill + commit
//! let mut reservation = publisher.alloc(5).unwrap();
//! reservation.set_userdata(42);
//! reservation.payload_mut().copy_from_slice(b"tick!");
//! reservation.commit(true); // key message: late subscribers start here
//!
//! let mut buf = [0u8; 256];
//! let msg = subscriber.recv(&mut buf).unwrap();
//! assert_eq!(msg.userdata, 42);
//! assert_eq!(msg.payload, b"tick!");
//! ```

mod invariants;
mod publisher;
mod reservation;
mod ring;
mod subscriber;

pub use publisher::Publisher;
pub use reservation::Reservation;
pub use ring::{MsgHeader, ReadStatus, Ring, BLOCK_SIZE, HEADER_SIZE};
pub use subscriber::{Msg, RecvError, Subscriber};
