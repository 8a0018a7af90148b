use aes_uuid::format::{HYPHEN_POSITIONS, UUID_LEN, VARIANT_POSITION, VERSION_POSITION};
use aes_uuid::pool::global::global;

const SAMPLES: usize = 1 << 18;
const HEX: &[u8; 16] = b"0123456789abcdef";
// chi-square critical values far in the tail (p < 1e-6)
const CHI2_LIMIT_15_DOF: f64 = 60.0;
const CHI2_LIMIT_3_DOF: f64 = 35.0;

fn is_random_position(i: usize) -> bool {
    !HYPHEN_POSITIONS.contains(&i) && i != VERSION_POSITION && i != VARIANT_POSITION
}

fn hex_index(b: u8) -> usize {
    HEX.iter()
        .position(|&h| h == b)
        .unwrap_or_else(|| panic!("unexpected byte {b:#x}"))
}

fn chi_square(counts: &[u64], expected: f64) -> f64 {
    counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum()
}

struct Tally {
    per_position: Vec<[u64; 16]>,
    hyphens: usize,
}

fn collect() -> Tally {
    let pool = global();
    let mut per_position = vec![[0u64; 16]; UUID_LEN];
    let mut hyphens = 0usize;
    let mut buf = [0u8; UUID_LEN];
    for _ in 0..SAMPLES {
        pool.fill(&mut buf);
        for (i, &b) in buf.iter().enumerate() {
            if b == b'-' {
                hyphens += 1;
            } else {
                per_position[i][hex_index(b)] += 1;
            }
        }
    }
    Tally {
        per_position,
        hyphens,
    }
}

#[test]
fn test_probability_distribution() {
    let tally = collect();
    assert_eq!(tally.hyphens, SAMPLES * HYPHEN_POSITIONS.len(), "bad dash count");

    let mut totals = [0u64; 16];
    let mut random_chars = 0u64;
    for (i, counts) in tally.per_position.iter().enumerate() {
        if !is_random_position(i) {
            continue;
        }
        for (total, &c) in totals.iter_mut().zip(counts) {
            *total += c;
            random_chars += c;
        }
    }

    let ssq: f64 = totals
        .iter()
        .map(|&c| {
            let p = c as f64 / random_chars as f64;
            p * p
        })
        .sum();
    let expected = 1.0 / 16.0;
    assert!(
        (ssq - expected).abs() < 1e-4,
        "non-uniform probability distribution: have {ssq}, want {expected}"
    );
}

#[test]
fn test_each_random_position_is_uniform() {
    let tally = collect();
    let expected = SAMPLES as f64 / 16.0;
    for (i, counts) in tally.per_position.iter().enumerate() {
        if !is_random_position(i) {
            continue;
        }
        let chi2 = chi_square(counts, expected);
        assert!(chi2 < CHI2_LIMIT_15_DOF, "position {i}: chi2 {chi2}");
    }
}

#[test]
fn test_fixed_positions() {
    let tally = collect();

    let version = &tally.per_position[VERSION_POSITION];
    assert_eq!(version[4], SAMPLES as u64);

    let variant = &tally.per_position[VARIANT_POSITION];
    let outside: u64 = variant[..8].iter().chain(&variant[12..]).sum();
    assert_eq!(outside, 0, "variant outside 8..=b");
    let chi2 = chi_square(&variant[8..12], SAMPLES as f64 / 4.0);
    assert!(chi2 < CHI2_LIMIT_3_DOF, "variant chi2 {chi2}");
}
