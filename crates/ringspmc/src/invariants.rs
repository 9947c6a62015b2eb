//! Debug assertion macros for the cursor protocol.
//!
//! Active only in debug builds (`debug_assert!`), so the release hot path
//! carries zero overhead. Used at every cursor mutation point in `Ring`.

/// Assert that a cursor only ever moves forward.
///
/// Both publisher cursors are unbounded u64 block counts; any decrease is a
/// protocol bug, not arithmetic wrap.
macro_rules! debug_assert_cursor_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} moved backwards: {} -> {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that the commit cursor never overtakes the reservation cursor.
///
/// `written_idx <= writing_idx` must hold at every externally observable
/// moment; readers rely on `writing_idx` bounding the zone under overwrite.
macro_rules! debug_assert_commit_behind_reserve {
    ($written:expr, $writing:expr) => {
        debug_assert!(
            $written <= $writing,
            "commit cursor {} ahead of reservation cursor {}",
            $written,
            $writing
        )
    };
}

/// Assert that a record occupies at most the whole ring.
///
/// `alloc` rejects anything larger before reserving; a bigger value here
/// means a corrupted header size was about to drive the cursors.
macro_rules! debug_assert_record_fits {
    ($blk_sz:expr, $blk_cnt:expr) => {
        debug_assert!(
            $blk_sz <= $blk_cnt as u64,
            "record of {} blocks exceeds ring of {} blocks",
            $blk_sz,
            $blk_cnt
        )
    };
}

pub(crate) use debug_assert_commit_behind_reserve;
pub(crate) use debug_assert_cursor_monotonic;
pub(crate) use debug_assert_record_fits;
