use std::error;
use std::fmt;

/// Errors raised by the driver, generic over the transport error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error<E> {
    /// The transport failed; the driver does not retry.
    Bus(E),
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Bus(ref err) => write!(f, "bus error: {}", err),
        }
    }
}

impl<E: error::Error + 'static> error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Bus(ref err) => Some(err),
        }
    }
}
