use super::UUID_LEN;

const GROUP_LENS: [usize; 4] = [8, 4, 4, 4];

/// Shape check for UUID-looking strings.
///
/// Accepts exactly 36 bytes with hyphens at 8, 13, 18 and 23 and hex
/// digits (either case) everywhere else. Version and variant bits are not
/// inspected.
#[must_use]
pub fn is_well_formed(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != UUID_LEN {
        return false;
    }
    let mut rest = bytes;
    for n in GROUP_LENS {
        if !accept_run(&rest[..n]) || rest[n] != b'-' {
            return false;
        }
        rest = &rest[n + 1..];
    }
    accept_run(rest)
}

#[inline]
fn accept_run(run: &[u8]) -> bool {
    run.iter().all(u8::is_ascii_hexdigit)
}
