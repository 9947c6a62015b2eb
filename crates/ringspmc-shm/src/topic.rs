use crate::{ShmError, ShmRegion};
use ringspmc_rs::{Publisher, Ring, Subscriber};
use std::mem::size_of;

/// A named broadcast queue in POSIX shared memory.
///
/// Opening a topic creates the backing object on first use and attaches to
/// it afterwards; every process naming the same topic (and the same
/// `BLK_CNT`) sees the same queue. The mapping is dropped with the `Topic`;
/// the object itself persists until [`unlink`](Self::unlink).
///
/// # Example
///
/// ```no_run
/// use ringspmc_shm::Topic;
///
/// let topic = Topic::<1024>::open("md.ticks")?;
/// let mut subscriber = topic.subscriber(true);
/// # Ok::<(), ringspmc_shm::ShmError>(())
/// ```
pub struct Topic<const BLK_CNT: usize> {
    region: ShmRegion,
    name: String,
}

impl<const BLK_CNT: usize> Topic<BLK_CNT> {
    /// Opens (or creates) the topic `name`, mapping exactly
    /// `size_of::<Ring<BLK_CNT>>()` bytes.
    pub fn open(name: &str) -> Result<Self, ShmError> {
        let shm_name = format!("/{name}");
        let region = ShmRegion::open_or_create(&shm_name, size_of::<Ring<BLK_CNT>>())?;
        Ok(Self {
            region,
            name: name.to_string(),
        })
    }

    /// Removes the topic's backing object. Processes still attached keep
    /// their mappings.
    pub fn unlink(name: &str) -> Result<(), ShmError> {
        ShmRegion::unlink(&format!("/{name}"))
    }

    /// The queue living in the mapped region.
    #[inline]
    pub fn ring(&self) -> &Ring<BLK_CNT> {
        // SAFETY: the region is at least size_of::<Ring>() bytes and
        // page-aligned (mmap), and it is either freshly zero-filled by
        // ftruncate (a valid empty queue) or an existing queue created by a
        // peer that named the same BLK_CNT.
        unsafe { Ring::from_shared(self.region.as_mut_ptr()) }
    }

    /// Publisher handle over the mapped queue.
    ///
    /// # Safety
    ///
    /// Same contract as [`Ring::publisher`], now spanning processes: across
    /// everything attached to this topic there must be at most one live
    /// publisher.
    #[inline]
    pub unsafe fn publisher(&self) -> Publisher<'_, BLK_CNT> {
        self.ring().publisher()
    }

    /// Subscriber attached per [`Ring::subscribe`].
    #[inline]
    pub fn subscriber(&self, want_key: bool) -> Subscriber<'_, BLK_CNT> {
        self.ring().subscriber(want_key)
    }

    /// The topic name (without the shm `/` prefix).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
