//! Change notification sink.

/// Receives `(value, button_state)` after every accepted step or button
/// report.
///
/// Runs inline in the interrupt dispatch path, so implementations must
/// return quickly and must not call back into the encoder.
///
/// Implemented for `()` (no notification) and for any `FnMut(i32, bool)`.
pub trait OnChange {
    /// Called with the current counter value and button level.
    fn on_change(&mut self, value: i32, button_state: bool);
}

impl OnChange for () {
    fn on_change(&mut self, _value: i32, _button_state: bool) {}
}

impl<F> OnChange for F
where
    F: FnMut(i32, bool),
{
    fn on_change(&mut self, value: i32, button_state: bool) {
        self(value, button_state)
    }
}
