use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::InitError;

/// Source of key material for new generators.
///
/// Only consulted at construction time. Implementations must fail rather
/// than hand out weaker randomness.
pub trait EntropySource {
    /// Fill `dest` entirely or report why that was impossible.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Entropy`] when the source cannot supply bytes.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), InitError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), InitError> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            InitError::Entropy(format!("failed to read {} bytes: {e}", dest.len()))
        })
    }
}

/// Replays a fixed byte sequence. Used to pin generator output in tests
/// and benchmarks.
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    offset: usize,
}

impl FixedEntropy {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            offset: 0,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), InitError> {
        let end = self.offset + dest.len();
        let Some(src) = self.bytes.get(self.offset..end) else {
            return Err(InitError::Entropy(format!(
                "fixed source exhausted: wanted {}, have {}",
                dest.len(),
                self.remaining()
            )));
        };
        dest.copy_from_slice(src);
        self.offset = end;
        Ok(())
    }
}
