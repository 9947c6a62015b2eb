use std::ffi::CString;
use std::io;
use std::ptr;
use thiserror::Error;

/// Errors from mapping a shared-memory object.
#[derive(Debug, Error)]
pub enum ShmError {
    /// The object name contains an interior NUL and cannot reach the OS.
    #[error("shared memory name {0:?} is not a valid C string")]
    InvalidName(String),

    /// `shm_open` refused the object.
    #[error("shm_open({name}) failed: {source}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    /// `ftruncate` could not size the object.
    #[error("ftruncate({name}, {len}) failed: {source}")]
    Resize {
        name: String,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// `mmap` could not map the object.
    #[error("mmap({name}, {len}) failed: {source}")]
    Map {
        name: String,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// `shm_unlink` failed.
    #[error("shm_unlink({name}) failed: {source}")]
    Unlink {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// A POSIX shared-memory mapping, unmapped on drop.
///
/// `open_or_create` both creates and attaches: `shm_open(O_CREAT | O_RDWR)`
/// followed by `ftruncate` to the requested length. A freshly created
/// object reads as all zero bytes, which is exactly what the queue needs to
/// come up empty without any construction call. The object itself outlives
/// the mapping; remove it with [`unlink`](Self::unlink) when the topic is
/// retired.
pub struct ShmRegion {
    ptr: *mut u8,
    len: usize,
}

// Safety: the mapping is plain memory; all concurrency control lives in the
// structures placed inside it.
unsafe impl Send for ShmRegion {}
unsafe impl Sync for ShmRegion {}

impl ShmRegion {
    /// Opens (creating and zero-sizing if needed) the object `name` and maps
    /// `len` bytes of it read-write and shared.
    ///
    /// `name` must follow POSIX shm naming: a leading `/` and no other
    /// slashes.
    pub fn open_or_create(name: &str, len: usize) -> Result<Self, ShmError> {
        let c_name =
            CString::new(name).map_err(|_| ShmError::InvalidName(name.to_string()))?;

        // SAFETY: plain libc calls with a valid NUL-terminated name; the fd
        // is closed on every path and the mapping outlives it.
        unsafe {
            let fd = libc::shm_open(
                c_name.as_ptr(),
                libc::O_CREAT | libc::O_RDWR,
                libc::mode_t::from(0o666u16),
            );
            if fd < 0 {
                return Err(ShmError::Open {
                    name: name.to_string(),
                    source: io::Error::last_os_error(),
                });
            }

            // Sizing a fresh object zero-fills it; an existing object of the
            // right size is left untouched.
            if libc::ftruncate(fd, len as libc::off_t) != 0 {
                let source = io::Error::last_os_error();
                libc::close(fd);
                return Err(ShmError::Resize {
                    name: name.to_string(),
                    len,
                    source,
                });
            }

            let mapped = libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            );
            libc::close(fd);
            if mapped == libc::MAP_FAILED {
                return Err(ShmError::Map {
                    name: name.to_string(),
                    len,
                    source: io::Error::last_os_error(),
                });
            }

            Ok(Self {
                ptr: mapped.cast::<u8>(),
                len,
            })
        }
    }

    /// Removes the named object from the system namespace. Existing
    /// mappings stay valid until their processes unmap them.
    pub fn unlink(name: &str) -> Result<(), ShmError> {
        let c_name =
            CString::new(name).map_err(|_| ShmError::InvalidName(name.to_string()))?;
        // SAFETY: plain libc call with a valid NUL-terminated name.
        let rc = unsafe { libc::shm_unlink(c_name.as_ptr()) };
        if rc != 0 {
            return Err(ShmError::Unlink {
                name: name.to_string(),
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    /// Base address of the mapping. Page-aligned by `mmap`.
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Mapped length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true for a successfully created region.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for ShmRegion {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` are exactly what mmap returned.
        unsafe {
            libc::munmap(self.ptr.cast(), self.len);
        }
    }
}
