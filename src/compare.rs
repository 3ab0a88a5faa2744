//! Fixed-time byte comparison.

/// Compares two byte slices without short-circuiting on the first differing
/// byte: every position is visited and XOR differences are OR-ed into an
/// accumulator. Unequal lengths report `false` up front; key lengths are not
/// secret, only key contents are.
pub(crate) fn fixed_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
