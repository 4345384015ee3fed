//! Odd primes by trial division.

/// Returns `true` if `n` is not prime.
///
/// Even numbers are always reported composite, `2` included: the digit extractor
/// only ever walks odd primes starting at `3`.
pub fn is_composite(n: u64) -> bool {
    if n & 1 == 0 {
        return true;
    }

    let root = (n as f64).sqrt() as u64;
    (3..=root).step_by(2).any(|d| n % d == 0)
}

/// Returns the smallest odd prime strictly greater than `n`, for `n >= 2`.
pub fn next_prime(mut n: u64) -> u64 {
    loop {
        n += 1;
        if !is_composite(n) {
            return n;
        }
    }
}

/// Ascending odd primes `3, 5, 7, ...` up to an inclusive limit.
#[derive(Debug, Clone)]
pub struct OddPrimes {
    next: u64,
    limit: u64,
}

impl OddPrimes {
    /// Creates an iterator over the odd primes `p <= limit`.
    pub fn up_to(limit: u64) -> Self {
        Self { next: 3, limit }
    }
}

impl Iterator for OddPrimes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next > self.limit {
            return None;
        }

        let p = self.next;
        self.next = next_prime(p);
        Some(p)
    }
}

impl std::iter::FusedIterator for OddPrimes {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_small_numbers() {
        let primes = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
        for n in 3..50 {
            assert_eq!(is_composite(n), !primes.contains(&n), "n={n}");
        }
        assert!(is_composite(2));
        assert!(is_composite(4));
    }

    #[test]
    fn squares_of_primes_are_composite() {
        for p in [3, 5, 7, 101, 7919] {
            assert!(is_composite(p * p), "p={p}");
        }
    }

    #[test]
    fn next_prime_skips_composites() {
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(3), 5);
        assert_eq!(next_prime(23), 29);
        assert_eq!(next_prime(7907), 7919);
    }

    #[test]
    fn iterator_limit_is_inclusive() {
        let primes: Vec<_> = OddPrimes::up_to(29).collect();
        assert_eq!(primes, vec![3, 5, 7, 11, 13, 17, 19, 23, 29]);

        let primes: Vec<_> = OddPrimes::up_to(28).collect();
        assert_eq!(primes.last(), Some(&23));
    }

    #[test]
    fn iterator_below_three_is_empty() {
        assert_eq!(OddPrimes::up_to(2).count(), 0);
        assert_eq!(OddPrimes::up_to(0).count(), 0);
    }

    #[test]
    fn counts_primes_below_a_thousand() {
        // pi(1000) = 168, minus the even prime.
        assert_eq!(OddPrimes::up_to(1000).count(), 167);
    }
}
