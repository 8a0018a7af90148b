//! Lock-free UUIDv4 generation that cannot fail once started.
//!
//! A small pool of AES-128-CBC streams, each seeded once from the OS,
//! turns out 16 fresh bytes per call. Threads claim a stream with a single
//! compare-and-set, so [`v4`] never blocks on a lock and never fails once
//! the pool is up.

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod observability;
pub mod pool;

pub use engine::{EntropySource, Generator, OsEntropy};
pub use error::InitError;
pub use format::{is_well_formed, UUID_LEN};
pub use pool::GeneratorPool;

/// Return a fresh version-4 UUID in canonical lowercase form.
///
/// # Panics
///
/// Panics only on the first call of the process, and only if the OS
/// cannot supply entropy to seed the pool.
#[must_use]
pub fn v4() -> String {
    pool::global::global().next()
}
