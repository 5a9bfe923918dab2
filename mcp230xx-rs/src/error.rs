//! Error types for the expander driver.

use core::fmt;

/// Errors that can occur when communicating with the expander.
#[derive(Debug)]
pub enum ExpanderError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Pin index out of valid range (must be 0-15).
    InvalidPin,

    /// IOCON option not available on this chip variant.
    Unsupported,
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for ExpanderError<E> {
    fn from(error: E) -> Self {
        ExpanderError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ExpanderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpanderError::I2c(e) => write!(f, "I2C error: {:?}", e),
            ExpanderError::InvalidPin => write!(f, "Invalid pin index (must be 0-15)"),
            ExpanderError::Unsupported => write!(f, "Option not supported by this chip variant"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ExpanderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ExpanderError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            ExpanderError::InvalidPin => defmt::write!(f, "Invalid pin index"),
            ExpanderError::Unsupported => defmt::write!(f, "Unsupported option"),
        }
    }
}
