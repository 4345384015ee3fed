//! Modular arithmetic over machine words.
//!
//! Operands are `u64`; products go through a `u128` intermediate so the full
//! product never overflows before reduction.

/// Returns `(a * b) mod m`.
///
/// # Args
/// * `a`, `b` - Factors. They do not need to be reduced modulo `m`.
/// * `m` - The modulus, must be non-zero.
///
/// # Returns
/// A value in `[0, m)`.
#[inline]
pub fn mulmod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Returns the multiplicative inverse of `x` modulo `y`.
///
/// `x` and `y` must be coprime and `0 < x < y`. Callers in this crate strip every
/// factor of the modulus' prime before inverting, so a violation is a bug and is
/// only checked in debug builds.
///
/// # Returns
/// A value in `[0, y)` such that `x * r ≡ 1 (mod y)`.
pub fn invmod(x: u64, y: u64) -> u64 {
    debug_assert!(x > 0 && x < y, "invmod: {x} is not in (0, {y})");

    let (mut u, mut v) = (x as i128, y as i128);
    let (mut a, mut c) = (0_i128, 1_i128);

    while u != 0 {
        let q = v / u;
        (c, a) = (a - q * c, c);
        (u, v) = (v - q * u, u);
    }

    debug_assert_eq!(v, 1, "invmod: {x} and {y} are not coprime");
    a.rem_euclid(y as i128) as u64
}

/// Returns `a^b mod m` by right-to-left binary exponentiation.
pub fn powmod(a: u64, mut b: u64, m: u64) -> u64 {
    let mut r = 1 % m;
    let mut base = a % m;

    while b > 0 {
        if b & 1 == 1 {
            r = mulmod(r, base, m);
        }
        b >>= 1;
        base = mulmod(base, base, m);
    }

    r
}
