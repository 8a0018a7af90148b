/// Failures that can occur while building generators or the pool.
///
/// Nothing past initialization can fail: once a [`crate::GeneratorPool`]
/// exists, every call hands back an identifier.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Entropy unavailable: {0}")]
    Entropy(String),
    #[error("Cipher construction failed: {0}")]
    Cipher(String),
    #[error("Invalid pool size {0}: must be a power of two between 1 and {max}", max = crate::pool::MAX_POOL_SIZE)]
    PoolSize(usize),
    #[error("Generator pool already initialized with size {existing}, requested {requested}")]
    AlreadyInitialized { existing: usize, requested: usize },
}

impl InitError {
    /// True for the failure classes that mean the process cannot produce
    /// identifiers at all.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, InitError::Entropy(_) | InitError::Cipher(_))
    }
}
