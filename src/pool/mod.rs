pub mod global;

use std::cell::{Cell, UnsafeCell};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PoolConfig;
use crate::engine::{EntropySource, Generator, OsEntropy};
use crate::error::InitError;
use crate::format::{to_string, UUID_LEN};

/// Number of generators when nothing else is configured.
pub const DEFAULT_POOL_SIZE: usize = 4;
/// Upper bound accepted for a pool size.
pub const MAX_POOL_SIZE: usize = 1024;

thread_local! {
    // Slot this thread last claimed; the next scan starts there.
    static SCAN_CURSOR: Cell<usize> = Cell::new(fastrand::usize(..));
}

#[repr(align(64))]
struct Slot {
    claimed: AtomicBool,
    generator: UnsafeCell<Generator>,
}

/// Fixed set of generators shared by any number of threads.
///
/// Each call claims one free generator with a compare-and-set on its flag,
/// renders one identifier and releases the flag. A claim that loses moves
/// on to the next slot and retries at once; generators are held for well
/// under a microsecond, so nothing waits on a scheduler.
pub struct GeneratorPool {
    slots: Box<[Slot]>,
    mask: usize,
}

// Safety: a slot's generator is only touched through a `SlotGuard`, and a
// guard exists only after its `claimed` flag flipped false -> true. The
// acquire/release pair on that flag orders every access to the generator.
unsafe impl Sync for GeneratorPool {}

impl GeneratorPool {
    /// Build a pool of `size` generators seeded from the OS.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::PoolSize`] for an unusable size and propagates
    /// entropy or cipher failures from seeding.
    pub fn new(size: usize) -> Result<Self, InitError> {
        Self::with_entropy(size, &mut OsEntropy)
    }

    /// Build a pool from [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// See [`GeneratorPool::new`].
    pub fn from_config(config: &PoolConfig) -> Result<Self, InitError> {
        Self::new(config.size)
    }

    /// Build a pool of `size` generators, each drawing its seed from
    /// `entropy` in slot order.
    ///
    /// # Errors
    ///
    /// See [`GeneratorPool::new`].
    pub fn with_entropy<E>(size: usize, entropy: &mut E) -> Result<Self, InitError>
    where
        E: EntropySource + ?Sized,
    {
        if !is_valid_pool_size(size) {
            return Err(InitError::PoolSize(size));
        }
        let mut slots = Vec::with_capacity(size);
        for _ in 0..size {
            slots.push(Slot {
                claimed: AtomicBool::new(false),
                generator: UnsafeCell::new(Generator::from_entropy(&mut *entropy)?),
            });
        }
        tracing::debug!(pool_size = size, "uuid generator pool ready");
        Ok(Self {
            slots: slots.into_boxed_slice(),
            mask: size - 1,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Produce the next identifier as an owned string.
    #[must_use]
    pub fn next(&self) -> String {
        let mut out = [0u8; UUID_LEN];
        self.fill(&mut out);
        to_string(&out)
    }

    /// Write the next identifier into `out` without allocating.
    #[inline]
    pub fn fill(&self, out: &mut [u8; UUID_LEN]) {
        let mut guard = self.claim();
        out.copy_from_slice(guard.generator().next_v4());
    }

    fn claim(&self) -> SlotGuard<'_> {
        let mut idx = SCAN_CURSOR.with(Cell::get) & self.mask;
        loop {
            let slot = &self.slots[idx];
            if slot
                .claimed
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                SCAN_CURSOR.with(|cursor| cursor.set(idx));
                return SlotGuard { slot };
            }
            idx = (idx + 1) & self.mask;
            std::hint::spin_loop();
        }
    }

    #[cfg(test)]
    fn claimed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.claimed.load(Ordering::Acquire))
            .count()
    }
}

impl std::fmt::Debug for GeneratorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorPool")
            .field("size", &self.slots.len())
            .finish_non_exhaustive()
    }
}

/// Power of two in `1..=MAX_POOL_SIZE`, so `size - 1` works as a
/// wraparound mask.
#[must_use]
pub fn is_valid_pool_size(size: usize) -> bool {
    size.is_power_of_two() && size <= MAX_POOL_SIZE
}

/// Exclusive hold on one slot; dropping it frees the slot.
struct SlotGuard<'a> {
    slot: &'a Slot,
}

impl SlotGuard<'_> {
    #[inline]
    fn generator(&mut self) -> &mut Generator {
        // Safety: this guard won the claim flag and is the only live
        // reference to the generator until it drops.
        unsafe { &mut *self.slot.generator.get() }
    }
}

impl Drop for SlotGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.slot.claimed.store(false, Ordering::Release);
    }
}
