use std::{error::Error, fmt};

use log::debug;

use crate::{
    extractor::{nth_digit_block, BLOCK_DIGITS},
    progress::Progress,
};

/// The whole-number part of π, which the extractor never computes.
pub const PREFIX: &str = "3.";

/// Upfront capacity cap; larger outputs grow as blocks arrive.
const PREALLOC_DIGITS: u64 = 1 << 20;

/// Terminal outcome of a run whose reporter asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "computation cancelled")
    }
}

impl Error for Cancelled {}

/// Computes `"3."` followed by the first `total_digits` decimals of π.
///
/// Blocks of nine digits are extracted at offsets `1, 10, 19, ...`; the last
/// block is cut to what is left. `progress` is told the cumulative digit count
/// after every block and may stop the run, in which case the partial output is
/// dropped.
///
/// # Args
/// * `total_digits` - Number of decimals to produce. `0` yields just the prefix.
/// * `progress` - Per-block reporter; see [`Progress`].
///
/// # Errors
/// Returns [`Cancelled`] if `progress` returned `false`.
pub fn compute<P: Progress>(total_digits: u64, mut progress: P) -> Result<String, Cancelled> {
    let hint = total_digits.min(PREALLOC_DIGITS) as usize;
    let mut pi = String::with_capacity(PREFIX.len() + hint);
    pi.push_str(PREFIX);

    let mut produced = 0;
    while produced < total_digits {
        let block = nth_digit_block(produced + 1);
        let count = (total_digits - produced).min(BLOCK_DIGITS as u64);

        let digits = format!("{block:0width$}", width = BLOCK_DIGITS);
        pi.push_str(&digits[..count as usize]);
        produced += count;

        debug!("block at offset {} done: produced={produced}/{total_digits}", produced - count + 1);

        if !progress.report(produced) {
            debug!("stopping after {produced} digits");
            return Err(Cancelled);
        }
    }

    Ok(pi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::observe;

    const PI_100: &str = "3.\
        1415926535897932384626433832795028841971693993751058209749445923\
        078164062862089986280348253421170679";

    fn always(_: u64) -> bool {
        true
    }

    #[test]
    fn first_hundred_digits() {
        assert_eq!(compute(100, always).unwrap(), PI_100);
    }

    #[test]
    fn length_and_charset() {
        for d in [1, 8, 9, 10, 17, 18, 19, 31] {
            let pi = compute(d, always).unwrap();
            assert_eq!(pi.len(), 2 + d as usize);
            assert!(pi.starts_with(PREFIX));
            assert!(pi[2..].bytes().all(|b| b.is_ascii_digit()), "{pi}");
            assert_eq!(pi, PI_100[..2 + d as usize]);
        }
    }

    #[test]
    fn zero_digits_is_just_the_prefix() {
        let mut calls = 0;
        let pi = compute(0, observe(|_| calls += 1)).unwrap();
        assert_eq!(pi, "3.");
        assert_eq!(calls, 0);
    }

    #[test]
    fn repeated_runs_agree() {
        assert_eq!(compute(40, always), compute(40, always));
    }

    #[test]
    fn single_block_reports_once() {
        for d in 1..=9 {
            let mut seen = Vec::new();
            compute(d, observe(|n| seen.push(n))).unwrap();
            assert_eq!(seen, vec![d]);
        }
    }

    #[test]
    fn ten_digits_report_twice() {
        let mut seen = Vec::new();
        compute(10, observe(|n| seen.push(n))).unwrap();
        assert_eq!(seen, vec![9, 10]);
    }

    #[test]
    fn progress_is_strictly_increasing() {
        let mut seen = Vec::new();
        compute(50, observe(|n| seen.push(n))).unwrap();

        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen, vec![9, 18, 27, 36, 45, 50]);
    }

    #[test]
    fn cancel_on_first_report() {
        let mut calls = 0;
        let res = compute(100, |_: u64| {
            calls += 1;
            false
        });

        assert_eq!(res, Err(Cancelled));
        assert_eq!(calls, 1);
    }

    #[test]
    fn cancel_midway() {
        let mut seen = Vec::new();
        let res = compute(100, |n: u64| {
            seen.push(n);
            n < 27
        });

        assert_eq!(res, Err(Cancelled));
        assert_eq!(seen, vec![9, 18, 27]);
    }

    #[test]
    fn huge_request_cancelled_after_first_block() {
        let mut calls = 0;
        let res = compute(u64::MAX, |produced: u64| {
            calls += 1;
            assert_eq!(produced, 9);
            false
        });

        assert_eq!(res, Err(Cancelled));
        assert_eq!(calls, 1);
    }

    #[test]
    fn cancelling_on_the_last_block_still_cancels() {
        assert_eq!(compute(9, |_: u64| false), Err(Cancelled));
    }
}
