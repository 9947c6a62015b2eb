use crate::Ring;
use std::slice;
use std::sync::atomic::Ordering;

/// Zero-copy reservation for writing a record directly into the ring.
///
/// The publisher obtains a reservation, fills [`payload_mut`](Self::payload_mut)
/// and [`set_userdata`](Self::set_userdata), then [`commit`](Self::commit)s to
/// make the record visible to subscribers. The borrow on the publisher
/// handle guarantees at most one reservation is outstanding.
///
/// # Example
///
/// ```
/// use ringspmc_rs::Ring;
///
/// let ring = Ring::<16>::new_boxed();
/// // SAFETY: sole publisher for this queue.
/// let mut publisher = unsafe { ring.publisher() };
///
/// let mut reservation = publisher.alloc(12).unwrap();
/// reservation.set_userdata(1);
/// reservation.payload_mut().copy_from_slice(b"hello world!");
/// reservation.commit(false);
/// ```
pub struct Reservation<'p, const BLK_CNT: usize> {
    ring: &'p Ring<BLK_CNT>,
    idx: u64,
    payload_len: usize,
}

impl<'p, const BLK_CNT: usize> Reservation<'p, BLK_CNT> {
    pub(crate) fn new(ring: &'p Ring<BLK_CNT>, idx: u64, payload_len: usize) -> Self {
        Self {
            ring,
            idx,
            payload_len,
        }
    }

    /// The payload region of the reserved record, exactly as many bytes as
    /// were requested from `alloc`.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        // SAFETY: `idx` is the live reservation (the &mut borrow on the
        // publisher keeps it so), the run is contiguous by the rewind
        // discipline, and `payload_len` is what alloc reserved. Readers do
        // not trust these bytes until commit moves the commit cursor.
        unsafe { slice::from_raw_parts_mut(self.ring.payload_ptr(self.idx), self.payload_len) }
    }

    /// Stamps the record's opaque application tag.
    #[inline]
    pub fn set_userdata(&mut self, userdata: u32) {
        self.ring.userdata_at(self.idx).store(userdata, Ordering::Relaxed);
    }

    /// Number of payload bytes reserved.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload_len
    }

    /// Returns true for a header-only record.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload_len == 0
    }

    /// Commits the record, making it visible to subscribers. With `key`
    /// set, late subscribers asking for a key message will attach here.
    pub fn commit(self, key: bool) {
        self.ring.commit_internal(key);
    }
}
