//! The process-wide pool behind [`crate::v4`].
//!
//! Built once, either explicitly through [`init_global`] or lazily with
//! [`DEFAULT_POOL_SIZE`] generators on first use, and never torn down.

use std::sync::OnceLock;

use super::{GeneratorPool, DEFAULT_POOL_SIZE};
use crate::config::PoolConfig;
use crate::error::InitError;

static GLOBAL_POOL: OnceLock<GeneratorPool> = OnceLock::new();

/// Return the process-wide pool, building it on first use.
///
/// # Panics
///
/// Panics if the pool cannot be built, i.e. the OS has no entropy to give.
/// There is no weaker fallback.
pub fn global() -> &'static GeneratorPool {
    GLOBAL_POOL.get_or_init(|| match GeneratorPool::new(DEFAULT_POOL_SIZE) {
        Ok(pool) => pool,
        Err(err) => fatal(&err),
    })
}

/// Build the process-wide pool from `config` ahead of first use.
///
/// Calling this again with the same size returns the existing pool.
///
/// # Errors
///
/// Returns [`InitError::AlreadyInitialized`] when the pool already exists
/// with a different size, and any construction error otherwise.
pub fn init_global(config: &PoolConfig) -> Result<&'static GeneratorPool, InitError> {
    if let Some(existing) = GLOBAL_POOL.get() {
        return check_size(existing, config.size);
    }
    let pool = GeneratorPool::from_config(config)?;
    // A concurrent initializer may have won; its pool is kept and ours dropped.
    let installed = GLOBAL_POOL.get_or_init(|| pool);
    check_size(installed, config.size)
}

fn check_size(
    pool: &'static GeneratorPool,
    requested: usize,
) -> Result<&'static GeneratorPool, InitError> {
    if pool.size() == requested {
        Ok(pool)
    } else {
        Err(InitError::AlreadyInitialized {
            existing: pool.size(),
            requested,
        })
    }
}

fn fatal(err: &InitError) -> ! {
    tracing::error!(error = %err, "cannot initialize uuid generator pool");
    panic!("uuid generator pool initialization failed: {err}");
}
