//! Canonical 8-4-4-4-12 rendering of 16 raw bytes as a version-4 UUID.
//!
//! The nibble order is not uniform. The first ten bytes are written low
//! nibble first and the last six high nibble first. Existing consumers
//! compare literal output for a given cipher state, so the layout is
//! fixed.

pub mod validate;

pub use validate::is_well_formed;

/// Length of a rendered identifier.
pub const UUID_LEN: usize = 36;
/// Number of raw bytes consumed per identifier.
pub const RAW_LEN: usize = 16;
/// Byte offsets of the group separators.
pub const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];
/// Offset of the version character, always `'4'`.
pub const VERSION_POSITION: usize = 14;
/// Offset of the variant character, always one of `8 9 a b`.
pub const VARIANT_POSITION: usize = 19;

pub(crate) const HEX: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn lo(b: u8) -> u8 {
    HEX[usize::from(b & 0x0f)]
}

#[inline]
fn hi(b: u8) -> u8 {
    HEX[usize::from(b >> 4)]
}

/// Render `raw` into `out`, fixing the version and variant bits.
///
/// Byte 6 loses its low nibble to the literal version `'4'`. Byte 8 keeps
/// only its two low bits under the `10` variant prefix in the first
/// character.
#[inline]
pub fn encode_into(raw: &[u8; RAW_LEN], out: &mut [u8; UUID_LEN]) {
    let c = raw;
    *out = [
        lo(c[0]),
        hi(c[0]),
        lo(c[1]),
        hi(c[1]),
        lo(c[2]),
        hi(c[2]),
        lo(c[3]),
        hi(c[3]),
        b'-',
        lo(c[4]),
        hi(c[4]),
        lo(c[5]),
        hi(c[5]),
        b'-',
        b'4',
        hi(c[6]),
        lo(c[7]),
        hi(c[7]),
        b'-',
        HEX[usize::from(0x08 | (c[8] & 0x03))],
        hi(c[8]),
        lo(c[9]),
        hi(c[9]),
        b'-',
        hi(c[10]),
        lo(c[10]),
        hi(c[11]),
        lo(c[11]),
        hi(c[12]),
        lo(c[12]),
        hi(c[13]),
        lo(c[13]),
        hi(c[14]),
        lo(c[14]),
        hi(c[15]),
        lo(c[15]),
    ];
}

/// Render `raw` into a fresh buffer.
#[inline]
#[must_use]
pub fn encode(raw: &[u8; RAW_LEN]) -> [u8; UUID_LEN] {
    let mut out = [0u8; UUID_LEN];
    encode_into(raw, &mut out);
    out
}

/// Copy an encoded buffer into an owned `String`.
///
/// The buffer only ever holds ASCII, so each byte maps to one `char`.
#[inline]
#[must_use]
pub fn to_string(encoded: &[u8; UUID_LEN]) -> String {
    let mut out = String::with_capacity(UUID_LEN);
    out.extend(encoded.iter().copied().map(char::from));
    out
}
