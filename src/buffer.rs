//! Growable byte buffer with amortized compaction.
//!
//! `Buffer` is the single owner of its bytes. It underlies both the
//! outbound (encode) side of a [`crate::handler::StreamHandler`] and the
//! scratch area used by the incremental decoder.

/// Starting capacity after a full [`Buffer::reset`] (512 KiB).
pub const INITIAL_BUFFER_SIZE: usize = 512 * 1024;

/// Capacity threshold above which `reset` reclaims down to
/// [`INITIAL_BUFFER_SIZE`] instead of just zeroing length (2 MiB).
pub const BIG_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// Backing allocation could not grow to hold the requested bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

/// A mutable byte container: owned storage plus a meaningful-length marker.
///
/// Invariant: `length() <= capacity()`.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: Vec<u8>,
    initial_size: usize,
    big_size: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Creates an empty buffer with no backing allocation, using the
    /// default [`INITIAL_BUFFER_SIZE`] / [`BIG_BUFFER_SIZE`] reset
    /// thresholds.
    pub fn new() -> Self {
        Self::with_limits(INITIAL_BUFFER_SIZE, BIG_BUFFER_SIZE)
    }

    /// Creates an empty buffer with custom reset thresholds.
    pub fn with_limits(initial_size: usize, big_size: usize) -> Self {
        Self {
            data: Vec::new(),
            initial_size,
            big_size,
        }
    }

    /// Bytes currently meaningful in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer holds no meaningful bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes the backing allocation can hold without growing.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The full meaningful byte range.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies `src` onto the end of the buffer, growing capacity as needed.
    ///
    /// Growth target is `max(2 * (length + src.len()), current_capacity)`,
    /// so a long-lived buffer never grows by less than it would need to
    /// double. Fails with [`AllocError`] only on allocator exhaustion.
    pub fn append(&mut self, src: &[u8]) -> Result<(), AllocError> {
        if src.is_empty() {
            return Ok(());
        }
        let needed = self.data.len() + src.len();
        if needed > self.data.capacity() {
            let target = std::cmp::max(needed * 2, self.data.capacity());
            self.data
                .try_reserve(target - self.data.len())
                .map_err(|_| AllocError)?;
        }
        self.data.extend_from_slice(src);
        Ok(())
    }

    /// Logically empties the buffer. If capacity had grown beyond the
    /// buffer's `big_size` threshold, the backing allocation is dropped
    /// and replaced with one sized to `initial_size`; otherwise the
    /// existing allocation is kept and only `length` is reset to zero.
    pub fn reset(&mut self) {
        if self.data.capacity() > self.big_size {
            self.data = Vec::with_capacity(self.initial_size);
        } else {
            self.data.clear();
        }
    }

    /// Shifts bytes `[from, length)` to the start of the buffer and
    /// shrinks `length` by `from`. `from` must be `<= length()`.
    pub fn compact(&mut self, from: usize) {
        debug_assert!(from <= self.data.len());
        if from == 0 {
            return;
        }
        self.data.drain(..from);
    }
}
