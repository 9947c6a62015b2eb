//! Sample tick schemas used by the demo drivers.
//!
//! The queue itself transports opaque bytes; these POD structs are what the
//! `pub_demo` / `sub_demo` binaries put on the wire. Field layouts are
//! `repr(C)` with no padding so they can be cast to and from record
//! payloads with bytemuck.

use bytemuck::{Pod, Zeroable};

/// A fixed-shape demo message, tagged on the wire through the record's
/// `userdata` field.
pub trait TickMsg: Pod {
    /// Wire tag carried in `userdata`.
    const MSG_TYPE: u32;

    /// Builds a sample with `val[i] = seq + i`.
    fn sample(ts: u64, tid: u32, seq: u32) -> Self;

    /// Publish timestamp, nanoseconds since the Unix epoch.
    fn ts(&self) -> u64;
    /// Publisher process id.
    fn tid(&self) -> u32;
    /// Monotonic sequence number.
    fn seq(&self) -> u32;
    /// Sample values.
    fn values(&self) -> &[i32];
}

macro_rules! tick_msg {
    ($name:ident, $n:literal, $tag:literal) => {
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
        pub struct $name {
            pub ts: u64,
            pub tid: u32,
            pub seq: u32,
            pub val: [i32; $n],
        }

        impl TickMsg for $name {
            const MSG_TYPE: u32 = $tag;

            fn sample(ts: u64, tid: u32, seq: u32) -> Self {
                let mut val = [0i32; $n];
                for (i, v) in val.iter_mut().enumerate() {
                    *v = seq as i32 + i as i32;
                }
                Self { ts, tid, seq, val }
            }

            fn ts(&self) -> u64 {
                self.ts
            }
            fn tid(&self) -> u32 {
                self.tid
            }
            fn seq(&self) -> u32 {
                self.seq
            }
            fn values(&self) -> &[i32] {
                &self.val
            }
        }
    };
}

// Value counts are even so the 16-byte prefix plus 4-byte elements leave no
// trailing padding (Pod forbids it).
tick_msg!(Tick2, 2, 1);
tick_msg!(Tick4, 4, 2);
tick_msg!(Tick8, 8, 3);
tick_msg!(Tick12, 12, 4);
