use rand::{rngs::OsRng, Rng};
use std::ops::RangeInclusive;

pub const DEFAULT_LENGTH: usize = 6;
pub const ALLOWED_LENGTHS: RangeInclusive<usize> = 4..=10;

/// Numeric one-time passcode, each digit drawn uniformly from the OS CSPRNG.
pub fn generate(length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + OsRng.gen_range(0..10)))
        .collect()
}
