use super::{RequestHeader, ResponseHeader};
use crate::constants::HEADER_POOL_CAPACITY;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Restores a header to its zero state.
pub trait ResetHeader {
    fn reset(&mut self);
}

/// Pool of header values reused across calls to avoid per-call allocation.
///
/// Values are reset when they are acquired and again when they are released,
/// so no field can leak from one call into the next. Acquisition is exclusive:
/// a value is owned by exactly one [`PooledHeader`] until that guard drops.
pub struct HeaderPool<H> {
    idle: Mutex<Vec<H>>,
    capacity: usize,
}

/// Shared pool for outbound request headers.
pub static REQUEST_HEADER_POOL: HeaderPool<RequestHeader> =
    HeaderPool::new(HEADER_POOL_CAPACITY);

/// Shared pool for outbound response headers.
pub static RESPONSE_HEADER_POOL: HeaderPool<ResponseHeader> =
    HeaderPool::new(HEADER_POOL_CAPACITY);

impl<H> HeaderPool<H> {
    /// Creates an empty pool that keeps at most `capacity` idle values.
    pub const fn new(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Number of idle values currently held by the pool.
    pub fn idle_len(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<H> HeaderPool<H>
where
    H: ResetHeader + Default,
{
    /// Takes a zeroed header out of the pool, allocating a new one if it is empty.
    ///
    /// The header goes back to the pool when the returned guard is dropped,
    /// on every path (success, early return, or cancellation).
    pub fn acquire(&self) -> PooledHeader<'_, H> {
        let mut header = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();

        header.reset();

        PooledHeader { pool: self, header }
    }

    fn release(&self, mut header: H) {
        header.reset();

        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.capacity {
            idle.push(header);
        }
    }
}

/// Exclusive handle to a pooled header; returns it to the pool on drop.
pub struct PooledHeader<'a, H>
where
    H: ResetHeader + Default,
{
    pool: &'a HeaderPool<H>,
    header: H,
}

impl<H> Deref for PooledHeader<'_, H>
where
    H: ResetHeader + Default,
{
    type Target = H;

    fn deref(&self) -> &H {
        &self.header
    }
}

impl<H> DerefMut for PooledHeader<'_, H>
where
    H: ResetHeader + Default,
{
    fn deref_mut(&mut self) -> &mut H {
        &mut self.header
    }
}

impl<H> Drop for PooledHeader<'_, H>
where
    H: ResetHeader + Default,
{
    fn drop(&mut self) {
        let header = std::mem::take(&mut self.header);
        self.pool.release(header);
    }
}
