//! Constant-time comparison for secret-dependent data.

/// Compares two byte slices without short-circuiting on the first
/// differing byte.
///
/// Length is not secret: slices of different length return `false`
/// immediately.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    std::hint::black_box(diff) == 0
}
