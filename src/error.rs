use std::{error::Error, fmt, io};

use crate::driver::Cancelled;

/// The crate's result type.
pub type Result<T> = std::result::Result<T, PiErr>;

/// Failures and terminal outcomes of a digit computation request.
#[derive(Debug)]
pub enum PiErr {
    /// The consumer cancelled the run before it completed.
    Cancelled,
    /// A computation is already in flight on this calculator.
    Busy,
    DigitsOutOfRange {
        got: u64,
        max: u64,
    },
    /// Invalid configuration, caught before any work starts.
    Config(String),
    Io(io::Error),
    /// The background worker panicked or was aborted.
    Join(String),
}

impl fmt::Display for PiErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PiErr::Cancelled => write!(f, "computation cancelled"),
            PiErr::Busy => write!(f, "a computation is already running"),
            PiErr::DigitsOutOfRange { got, max } => {
                write!(f, "digit count out of range: got {got}, expected 1..={max}")
            }
            PiErr::Config(msg) => write!(f, "invalid config: {msg}"),
            PiErr::Io(e) => write!(f, "io error: {e}"),
            PiErr::Join(msg) => write!(f, "worker failed: {msg}"),
        }
    }
}

impl Error for PiErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PiErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PiErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<Cancelled> for PiErr {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = PiErr::DigitsOutOfRange { got: 0, max: 9 };
        assert_eq!(err.to_string(), "digit count out of range: got 0, expected 1..=9");
        assert_eq!(PiErr::from(Cancelled).to_string(), "computation cancelled");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = PiErr::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert!(PiErr::Busy.source().is_none());
    }
}
