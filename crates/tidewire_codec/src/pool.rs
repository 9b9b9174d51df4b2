//! # Writer Pool
//!
//! Pre-sized [`BitWriter`]s recycled across messages.
//!
//! A writer is exclusively owned while a message is packed; the pool only
//! hands out and takes back idle ones. Writers come back reset.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tidewire_shared::MAX_PACKET_SIZE;

use crate::bitstream::BitWriter;

/// Default number of idle writers kept.
const DEFAULT_MAX_POOLED: usize = 64;

/// Pool of reusable writers, shareable across threads.
///
/// # Example
///
/// ```rust
/// use tidewire_codec::WriterPool;
///
/// let pool = WriterPool::new(64, 4);
/// {
///     let mut writer = pool.acquire();
///     writer.write(7, 3)?;
///     assert_eq!(writer.to_segment(), &[7]);
/// } // returned to the pool, reset
/// assert_eq!(pool.pooled(), 1);
/// # Ok::<(), tidewire_codec::CodecError>(())
/// ```
pub struct WriterPool {
    /// Capacity of every writer handed out.
    writer_capacity: usize,
    /// Idle writers kept beyond this are dropped.
    max_pooled: usize,
    /// Idle writers.
    free: Mutex<Vec<BitWriter>>,
}

impl WriterPool {
    /// Creates an empty pool of `writer_capacity`-byte writers.
    #[must_use]
    pub fn new(writer_capacity: usize, max_pooled: usize) -> Self {
        Self {
            writer_capacity,
            max_pooled,
            free: Mutex::new(Vec::with_capacity(max_pooled)),
        }
    }

    /// Byte capacity of the writers this pool hands out.
    #[inline]
    #[must_use]
    pub const fn writer_capacity(&self) -> usize {
        self.writer_capacity
    }

    /// Number of idle writers.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.free.lock().len()
    }

    /// Takes an idle writer, or allocates one if none is idle.
    #[must_use]
    pub fn acquire(&self) -> PooledWriter<'_> {
        let writer = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| BitWriter::with_capacity(self.writer_capacity));
        PooledWriter { pool: self, writer }
    }

    fn release(&self, mut writer: BitWriter) {
        writer.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_pooled {
            free.push(writer);
        }
    }
}

impl Default for WriterPool {
    /// MTU-sized writers.
    fn default() -> Self {
        Self::new(MAX_PACKET_SIZE, DEFAULT_MAX_POOLED)
    }
}

/// A writer borrowed from a [`WriterPool`]; returned on drop.
pub struct PooledWriter<'a> {
    pool: &'a WriterPool,
    writer: BitWriter,
}

impl Deref for PooledWriter<'_> {
    type Target = BitWriter;

    fn deref(&self) -> &BitWriter {
        &self.writer
    }
}

impl DerefMut for PooledWriter<'_> {
    fn deref_mut(&mut self) -> &mut BitWriter {
        &mut self.writer
    }
}

impl Drop for PooledWriter<'_> {
    fn drop(&mut self) {
        // A zero-capacity writer does not allocate.
        let writer = std::mem::replace(&mut self.writer, BitWriter::with_capacity(0));
        self.pool.release(writer);
    }
}
