//! Error types for the rotary encoder.

use core::fmt;

/// Errors surfaced by [`RotaryEncoder`](crate::RotaryEncoder).
///
/// Decoding itself never fails; these only come from the collaborators.
#[derive(Debug)]
pub enum RotaryError<P, L> {
    /// Expander register access failed.
    Port(P),

    /// Waiting on the interrupt line failed.
    Line(L),

    /// An interrupt was awaited while the encoder is stopped.
    NotStarted,
}

impl<P: fmt::Debug, L: fmt::Debug> fmt::Display for RotaryError<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RotaryError::Port(e) => write!(f, "Port error: {:?}", e),
            RotaryError::Line(e) => write!(f, "Interrupt line error: {:?}", e),
            RotaryError::NotStarted => write!(f, "Encoder not started"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<P: defmt::Format, L: defmt::Format> defmt::Format for RotaryError<P, L> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RotaryError::Port(e) => defmt::write!(f, "Port error: {}", e),
            RotaryError::Line(e) => defmt::write!(f, "Interrupt line error: {}", e),
            RotaryError::NotStarted => defmt::write!(f, "Encoder not started"),
        }
    }
}
