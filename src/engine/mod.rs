pub mod entropy;
pub mod generator;

pub use entropy::{EntropySource, FixedEntropy, OsEntropy};
pub use generator::{Generator, SEED_LEN};
