use crate::ring::{ReadStatus, Ring, HEADER_SIZE};
use crossbeam_utils::Backoff;
use thiserror::Error;

/// Why a [`Subscriber::recv`] call produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecvError {
    /// Nothing committed at the subscriber's position yet; poll again.
    #[error("no message available yet")]
    Empty,

    /// The destination buffer cannot hold the message. The header was
    /// copied into the buffer so the caller can size up and retry; the
    /// subscriber did not advance.
    #[error("receive buffer too short ({required} bytes required)")]
    BufferTooShort {
        /// Total message length, header included.
        required: u32,
    },

    /// The publisher lapped this subscriber and some messages are gone.
    /// Call [`Subscriber::resubscribe`] to attach at a fresh position.
    #[error("subscriber fell behind the publisher and was lapped")]
    Lapped,
}

impl RecvError {
    /// Returns `true` if retrying the same call later can succeed.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A message copied out of the queue, borrowed from the caller's buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct Msg<'buf> {
    /// The publisher's opaque 32-bit tag, delivered bit-identical.
    pub userdata: u32,
    /// The payload bytes, header stripped.
    pub payload: &'buf [u8],
}

/// Read handle over a queue: one private cursor plus the ring reference.
///
/// Subscribers are passive. They share nothing with each other or with the
/// publisher, cost the publisher nothing, and may be created and dropped
/// freely at any time. The only state a subscriber owns is its cursor; a
/// [`RecvError::Lapped`] result means that cursor went stale and
/// [`resubscribe`](Self::resubscribe) must pick a new one.
pub struct Subscriber<'a, const BLK_CNT: usize> {
    ring: &'a Ring<BLK_CNT>,
    idx: u64,
}

impl<'a, const BLK_CNT: usize> Subscriber<'a, BLK_CNT> {
    pub(crate) fn new(ring: &'a Ring<BLK_CNT>, want_key: bool) -> Self {
        let idx = ring.subscribe(want_key);
        Self { ring, idx }
    }

    /// Re-attaches after a lap (or to jump to the latest key message).
    ///
    /// With `want_key` set, attaches at the most recent key message if one
    /// is still live in the ring; otherwise at the publisher's commit
    /// cursor, where the next committed message will appear.
    pub fn resubscribe(&mut self, want_key: bool) {
        self.idx = self.ring.subscribe(want_key);
    }

    /// Copies the next message (header included) into `buf` and returns a
    /// view of it. Non-blocking: an idle queue yields [`RecvError::Empty`].
    ///
    /// `buf` must be at least [`HEADER_SIZE`] bytes for the
    /// [`RecvError::BufferTooShort`] protocol to deliver the header.
    pub fn recv<'buf>(&mut self, buf: &'buf mut [u8]) -> Result<Msg<'buf>, RecvError> {
        match self.ring.read(&mut self.idx, buf) {
            ReadStatus::Ok(size) => Ok(parse(buf, size)),
            ReadStatus::Again => Err(RecvError::Empty),
            ReadStatus::BuffTooShort(required) => Err(RecvError::BufferTooShort { required }),
            ReadStatus::NeedResub => Err(RecvError::Lapped),
        }
    }

    /// Like [`recv`](Self::recv), but rides out short idle gaps with
    /// adaptive backoff (spin, then yield) before giving up with
    /// [`RecvError::Empty`].
    pub fn recv_spin<'buf>(&mut self, buf: &'buf mut [u8]) -> Result<Msg<'buf>, RecvError> {
        let backoff = Backoff::new();
        let size = loop {
            match self.ring.read(&mut self.idx, &mut *buf) {
                ReadStatus::Ok(size) => break size,
                ReadStatus::Again => {
                    if backoff.is_completed() {
                        return Err(RecvError::Empty);
                    }
                    backoff.snooze();
                }
                ReadStatus::BuffTooShort(required) => {
                    return Err(RecvError::BufferTooShort { required })
                }
                ReadStatus::NeedResub => return Err(RecvError::Lapped),
            }
        };
        Ok(parse(buf, size))
    }

    /// The subscriber's current block cursor.
    #[inline]
    pub fn cursor(&self) -> u64 {
        self.idx
    }
}

fn parse(buf: &[u8], size: u32) -> Msg<'_> {
    let userdata = u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]);
    Msg {
        userdata,
        payload: &buf[HEADER_SIZE..size as usize],
    }
}
