//! Direct extraction of nine decimal digits of π at an arbitrary offset.
//!
//! This is Plouffe's decimal digit-extraction formula with Fabrice Bellard's
//! O(n²) refinement: for every odd prime `a` up to `2N`, the series terms are
//! accumulated modulo a power of `a`, scaled by `10^(n-1)` and folded into a
//! floating point fraction. The leading nine digits of that fraction are the
//! digits of π starting at position `n`.
//!
//! Accuracy is bounded by the `f64` accumulator. Digits are reliable for the
//! indices a practical run reaches; far beyond the low millions the trailing
//! digits of a block may drift.

use std::f64::consts::{LN_10, LN_2};

use crate::{
    arith::{invmod, mulmod, powmod},
    primes::OddPrimes,
};

/// Number of decimal digits produced by one extraction.
pub const BLOCK_DIGITS: usize = 9;

const BLOCK_SCALE: f64 = 1e9;

/// Returns the truncation bound `N = floor((n + 20) · ln 10 / ln 2)` of the series
/// for digit index `n`.
pub fn series_terms(n: u64) -> u64 {
    ((n + 20) as f64 * LN_10 / LN_2) as u64
}

/// Computes the 9 decimal digits of π that start at the 1-based index `n`.
///
/// Index `1` is the first digit after the decimal point. The result lies in
/// `[0, 10^9)` and must be read as exactly nine digits, zero padded on the left.
pub fn nth_digit_block(n: u64) -> u32 {
    debug_assert!(n >= 1, "digit indices are 1-based");

    let terms = series_terms(n);
    let bound = 2 * terms;
    let mut sum = 0.0_f64;

    for a in OddPrimes::up_to(bound) {
        let Some((vmax, av)) = prime_modulus(a, bound) else {
            continue;
        };

        let s = prime_sum(a, vmax, av, terms);
        let shift = powmod(10, n - 1, av);
        sum = (sum + mulmod(s, shift, av) as f64 / av as f64).fract();
    }

    (sum * BLOCK_SCALE) as u32
}

/// Returns `(vmax, a^vmax)` with `vmax = floor(ln bound / ln a)`, the largest
/// power of `a` not above `bound`.
///
/// Returns `None` when `vmax` is 0: the modulus would be 1 and the prime
/// contributes nothing. Primes `a <= bound` only get here through rounding of
/// the logarithms; the guard keeps the inversion below from running modulo 1.
fn prime_modulus(a: u64, bound: u64) -> Option<(u32, u64)> {
    let vmax = ((bound as f64).ln() / (a as f64).ln()) as u32;
    if vmax == 0 {
        return None;
    }
    Some((vmax, a.pow(vmax)))
}

/// Sums the contribution of prime `a` to the series modulo `av = a^vmax`.
///
/// The numerator walks `k!` and the denominator walks the odd double factorial
/// `(2k-1)!!`, both with every factor of `a` divided out. `v` is the resulting
/// `a`-adic valuation of `(2k-1)!! / k!`; only terms with `v > 0` survive the
/// reduction and are scaled back by `a^(vmax - v)`.
fn prime_sum(a: u64, vmax: u32, av: u64, terms: u64) -> u64 {
    let vmax = i64::from(vmax);

    let mut s = 0;
    let mut num = 1;
    let mut den = 1;
    let mut v = 0_i64;

    // Distance to the next multiple of `a` in `k` and in `2k - 1`.
    let mut kq = 1;
    let mut kq2 = 1;

    for k in 1..=terms {
        let mut t = k;
        if kq >= a {
            loop {
                t /= a;
                v -= 1;
                if t % a != 0 {
                    break;
                }
            }
            kq = 0;
        }
        kq += 1;
        num = mulmod(num, t, av);

        let mut t = 2 * k - 1;
        if kq2 >= a {
            if kq2 == a {
                loop {
                    t /= a;
                    v += 1;
                    if t % a != 0 {
                        break;
                    }
                }
            }
            kq2 -= a;
        }
        den = mulmod(den, t, av);
        kq2 += 2;

        if v > 0 {
            let mut term = mulmod(invmod(den, av), num, av);
            term = mulmod(term, k, av);
            for _ in v..vmax {
                term = mulmod(term, a, av);
            }

            s += term;
            if s >= av {
                s -= av;
            }
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_bound() {
        assert_eq!(series_terms(1), 69);
        assert_eq!(series_terms(10), 99);
        assert_eq!(series_terms(1_000_000), 3_321_994);
    }

    #[test]
    fn modulus_is_largest_power_below_bound() {
        assert_eq!(prime_modulus(3, 138), Some((4, 81)));
        assert_eq!(prime_modulus(3, 244), Some((5, 243)));
        assert_eq!(prime_modulus(137, 138), Some((1, 137)));
    }

    #[test]
    fn prime_above_bound_has_no_modulus() {
        assert_eq!(prime_modulus(7, 5), None);
        assert_eq!(prime_modulus(139, 138), None);
    }

    #[test]
    fn first_blocks() {
        assert_eq!(nth_digit_block(1), 141_592_653);
        assert_eq!(nth_digit_block(10), 589_793_238);
        assert_eq!(nth_digit_block(19), 462_643_383);
    }

    #[test]
    fn unaligned_offsets() {
        // 3.14159265358979...
        assert_eq!(nth_digit_block(2), 415_926_535);
        assert_eq!(nth_digit_block(5), 926_535_897);
    }

    #[test]
    fn block_with_leading_zero() {
        // Digits 32..=40 of π are "028841971".
        assert_eq!(nth_digit_block(32), 28_841_971);
        assert_eq!(format!("{:09}", nth_digit_block(32)), "028841971");
    }

    #[test]
    fn block_is_deterministic() {
        assert_eq!(nth_digit_block(500), nth_digit_block(500));
    }
}
