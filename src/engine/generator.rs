use std::fmt;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncryptMut, KeyIvInit};

use super::entropy::EntropySource;
use crate::error::InitError;
use crate::format::{encode_into, RAW_LEN, UUID_LEN};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// Bytes drawn per generator: an AES-128 key followed by the initial CBC
/// vector.
pub const SEED_LEN: usize = 2 * RAW_LEN;

/// One AES-128-CBC stream plus its working buffer.
///
/// The leading 16 bytes of `text` are the next cipher input. After every
/// [`Generator::advance`] they hold the start of the identifier just
/// rendered, which the CBC mode then mixes with the previous ciphertext.
///
/// Every call takes `&mut self`; [`crate::GeneratorPool`] is what shares
/// generators between threads.
pub struct Generator {
    text: [u8; UUID_LEN],
    mode: Aes128CbcEnc,
}

impl Generator {
    /// Seed a generator with [`SEED_LEN`] bytes from `entropy`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Entropy`] if the source cannot supply the seed
    /// and [`InitError::Cipher`] if the cipher rejects it.
    pub fn from_entropy<E>(entropy: &mut E) -> Result<Self, InitError>
    where
        E: EntropySource + ?Sized,
    {
        let mut seed = [0u8; SEED_LEN];
        entropy.fill(&mut seed)?;
        Self::from_key_iv(&seed[..RAW_LEN], &seed[RAW_LEN..])
    }

    /// Build a generator from explicit key material.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Cipher`] unless both `key` and `iv` are 16 bytes.
    pub fn from_key_iv(key: &[u8], iv: &[u8]) -> Result<Self, InitError> {
        let mode = Aes128CbcEnc::new_from_slices(key, iv).map_err(|_| {
            InitError::Cipher(format!(
                "aes-128-cbc needs a 16 byte key and iv, got {} and {}",
                key.len(),
                iv.len()
            ))
        })?;
        Ok(Self {
            text: [0u8; UUID_LEN],
            mode,
        })
    }

    /// Run one CBC step over the working block and return the ciphertext.
    ///
    /// The rendered identifier is written back over the working block, so
    /// the next step never sees plaintext equal to its chaining vector.
    #[inline]
    pub fn advance(&mut self) -> [u8; RAW_LEN] {
        let block = GenericArray::from_mut_slice(&mut self.text[..RAW_LEN]);
        self.mode.encrypt_block_mut(block);
        let mut raw = [0u8; RAW_LEN];
        raw.copy_from_slice(&self.text[..RAW_LEN]);
        encode_into(&raw, &mut self.text);
        raw
    }

    /// Advance the stream and return the identifier rendered in place.
    #[inline]
    pub fn next_v4(&mut self) -> &[u8; UUID_LEN] {
        self.advance();
        &self.text
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entropy::FixedEntropy;
    use crate::format::{encode, to_string};

    fn fixture_seed() -> Vec<u8> {
        (0u8..32).collect()
    }

    fn fixture_generator() -> Generator {
        let seed = fixture_seed();
        Generator::from_key_iv(&seed[..16], &seed[16..]).expect("fixture generator")
    }

    #[test]
    fn test_first_advance_is_aes_of_iv() {
        let mut generator = fixture_generator();
        let raw = generator.advance();
        let expected: [u8; 16] = [
            0x07, 0xfe, 0xef, 0x74, 0xe1, 0xd5, 0x03, 0x6e, 0x90, 0x0e, 0xee, 0x11, 0x8e, 0x94,
            0x92, 0x93,
        ];
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_regression_sequence() {
        let mut generator = fixture_generator();
        let expected = [
            "70effe47-1e5d-40e6-89e0-ee118e949293",
            "d3167d4d-410d-443d-92b8-4c9c4d40f266",
            "ca87fd2c-c84f-42ad-8990-df680e4b9074",
        ];
        for want in expected {
            assert_eq!(to_string(generator.next_v4()), want);
        }
    }

    #[test]
    fn test_from_entropy_matches_explicit_key_iv() {
        let mut entropy = FixedEntropy::new(fixture_seed());
        let mut seeded = Generator::from_entropy(&mut entropy).expect("seeded");
        let mut explicit = fixture_generator();
        assert_eq!(entropy.remaining(), 0);
        for _ in 0..8 {
            assert_eq!(seeded.next_v4(), explicit.next_v4());
        }
    }

    #[test]
    fn test_next_v4_encodes_advanced_block() {
        let mut generator = fixture_generator();
        let mut reference = fixture_generator();
        let raw = reference.advance();
        assert_eq!(*generator.next_v4(), encode(&raw));
    }

    #[test]
    fn test_repeated_advance_keeps_chaining() {
        let mut generator = fixture_generator();
        let blocks: Vec<[u8; RAW_LEN]> = (0..6).map(|_| generator.advance()).collect();
        for (i, a) in blocks.iter().enumerate() {
            for b in &blocks[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            to_string(&encode(&blocks[1])),
            "d3167d4d-410d-443d-92b8-4c9c4d40f266"
        );
        assert_eq!(
            to_string(&encode(&blocks[2])),
            "ca87fd2c-c84f-42ad-8990-df680e4b9074"
        );
    }

    #[test]
    fn test_advance_and_next_v4_share_one_stream() {
        let mut generator = fixture_generator();
        let first = generator.advance();
        let second = *generator.next_v4();
        let third = generator.advance();
        let mut reference = fixture_generator();
        assert_eq!(*reference.next_v4(), encode(&first));
        assert_eq!(*reference.next_v4(), second);
        assert_eq!(*reference.next_v4(), encode(&third));
    }

    #[test]
    fn test_stream_does_not_settle() {
        let mut generator = fixture_generator();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..4096 {
            assert!(seen.insert(*generator.next_v4()));
        }
    }

    #[test]
    fn test_rejects_bad_key_length() {
        let err = Generator::from_key_iv(&[0u8; 15], &[0u8; 16]).unwrap_err();
        assert!(matches!(err, InitError::Cipher(_)));
        let err = Generator::from_key_iv(&[0u8; 16], &[0u8; 8]).unwrap_err();
        assert!(matches!(err, InitError::Cipher(_)));
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let mut entropy = FixedEntropy::new(vec![0u8; 31]);
        let err = Generator::from_entropy(&mut entropy).unwrap_err();
        assert!(matches!(err, InitError::Entropy(_)));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let rendered = format!("{:?}", fixture_generator());
        assert_eq!(rendered, "Generator { .. }");
    }
}
