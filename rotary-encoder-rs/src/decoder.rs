//! Quadrature decoding, bounded counter and button tracking.
//!
//! The [`Decoder`] is pure state: it never touches hardware. It is fed the
//! interrupt flag and captured port masks read from the expander and turns
//! them into at most one [`Event`] per interrupt.
//!
//! # Quadrature state machine
//!
//! Every rotation interrupt shifts the current `(clk, dt)` sample into an
//! 8-bit history register:
//!
//! ```text
//! S' = ((S & 0x3F) << 2) | (clk << 1) | dt
//! ```
//!
//! so `S` always holds the last four samples, oldest in the top two bits.
//! With pull-ups and inverted polarity the lines rest at `(0, 0)`, and one
//! detent produces exactly one of two complete windows:
//!
//! ```text
//! (1,0) (1,1) (0,1) (0,0)  ->  0b10_11_01_00 = 180  ->  decrement
//! (0,1) (1,1) (1,0) (0,0)  ->  0b01_11_10_00 = 120  ->  increment
//! ```
//!
//! Every other window is contact bounce or a half-turn and is absorbed
//! into the history without a step.

use crate::config::EncoderConfig;
use crate::config::PinAssignment;
use crate::notify::OnChange;

/// History window ending in a full counter-clockwise detent.
pub const DECREMENT_STATE: u8 = 0b1011_0100;

/// History window ending in a full clockwise detent.
pub const INCREMENT_STATE: u8 = 0b0111_1000;

/// Samples kept from the previous history before shifting.
const HISTORY_MASK: u8 = 0x3F;

/// Direction of a single detent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Counter moves up by one.
    Increment,
    /// Counter moves down by one.
    Decrement,
}

impl Direction {
    /// `+1` or `-1`.
    pub fn delta(self) -> i32 {
        match self {
            Direction::Increment => 1,
            Direction::Decrement => -1,
        }
    }
}

/// Logical event produced by one interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A full detent was recognised and the counter stepped (or saturated).
    Step(Direction),
    /// The switch line reported the given level.
    Button(bool),
}

/// Decoder state for one physical encoder.
///
/// Invariant: `min_value() <= value() <= max_value()` at all times.
pub struct Decoder<C = ()> {
    pins: PinAssignment,
    value: i32,
    min_value: i32,
    max_value: i32,
    quad_state: u8,
    button_state: bool,
    on_change: C,
}

impl<C> Decoder<C>
where
    C: OnChange,
{
    /// Create a decoder with an empty history and the button released.
    ///
    /// # Panics
    /// If the pin bits overlap or exceed the port width, if
    /// `min_value > max_value`, or if the initial value is out of range.
    pub fn new(config: EncoderConfig, on_change: C) -> Self {
        config.validate();

        Self {
            pins: config.pins,
            value: config.initial_value,
            min_value: config.min_value,
            max_value: config.max_value,
            quad_state: 0,
            button_state: false,
            on_change,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    pub fn button_state(&self) -> bool {
        self.button_state
    }

    /// Raw history register (last four samples).
    pub fn quad_state(&self) -> u8 {
        self.quad_state
    }

    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    /// The notification sink.
    pub fn handler(&self) -> &C {
        &self.on_change
    }

    pub fn handler_mut(&mut self) -> &mut C {
        &mut self.on_change
    }

    /// Consume the decoder, keeping only the notification sink.
    pub fn into_handler(self) -> C {
        self.on_change
    }

    // ── Interrupt dispatch ───────────────────────────────────────────

    /// Route one expander interrupt.
    ///
    /// - Exactly the switch bit flagged: button report with the captured
    ///   switch level.
    /// - Otherwise, any rotation bit flagged: rotation sample with the
    ///   captured clk/dt levels, even if the switch is flagged as well.
    /// - Anything else is dropped.
    pub fn handle_interrupt(&mut self, flagged: u16, captured: u16) -> Option<Event> {
        if let Some(sw) = self.pins.sw {
            if flagged == 1 << sw {
                let level = (captured >> sw) & 1 != 0;
                self.on_button(level);
                return Some(Event::Button(level));
            }
        }

        if flagged & self.pins.rotation_mask() != 0 {
            let clk = (captured >> self.pins.clk) & 1 != 0;
            let dt = (captured >> self.pins.dt) & 1 != 0;
            return self.on_rotation(clk, dt).map(Event::Step);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("dropping interrupt flags {=u16:#x}", flagged);

        None
    }

    // ── Rotation ─────────────────────────────────────────────────────

    /// Shift one `(clk, dt)` sample into the history and step on a complete
    /// detent window.
    pub fn on_rotation(&mut self, clk: bool, dt: bool) -> Option<Direction> {
        self.quad_state =
            ((self.quad_state & HISTORY_MASK) << 2) | (u8::from(clk) << 1) | u8::from(dt);

        let direction = match self.quad_state {
            DECREMENT_STATE => Direction::Decrement,
            INCREMENT_STATE => Direction::Increment,
            _ => return None,
        };

        self.step(direction);
        Some(direction)
    }

    /// Move the counter one step, saturating at the range limits.
    ///
    /// The change sink is notified even when the counter is already at the
    /// limit and the value does not change.
    pub fn step(&mut self, direction: Direction) {
        self.value = self
            .value
            .saturating_add(direction.delta())
            .clamp(self.min_value, self.max_value);

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: value={}", direction, self.value);

        self.notify();
    }

    // ── Button ───────────────────────────────────────────────────────

    /// Record the switch level and notify, whether or not it changed.
    pub fn on_button(&mut self, level: bool) {
        self.button_state = level;

        #[cfg(feature = "defmt")]
        defmt::debug!("button={}", level);

        self.notify();
    }

    fn notify(&mut self) {
        self.on_change.on_change(self.value, self.button_state);
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::Recorder;
    use proptest::prelude::*;

    const CLK: u8 = 0;
    const DT: u8 = 1;
    const SW: u8 = 2;

    const DECREMENT_WINDOW: [(bool, bool); 4] =
        [(true, false), (true, true), (false, true), (false, false)];
    const INCREMENT_WINDOW: [(bool, bool); 4] =
        [(false, true), (true, true), (true, false), (false, false)];

    fn decoder(initial: i32) -> Decoder<Recorder> {
        let config = EncoderConfig::new(PinAssignment::new(CLK, DT).with_switch(SW))
            .with_initial_value(initial);
        Decoder::new(config, Recorder::default())
    }

    fn feed(decoder: &mut Decoder<Recorder>, samples: &[(bool, bool)]) -> Vec<Direction> {
        samples
            .iter()
            .filter_map(|&(clk, dt)| decoder.on_rotation(clk, dt))
            .collect()
    }

    fn captured(clk: bool, dt: bool) -> u16 {
        (u16::from(clk) << CLK) | (u16::from(dt) << DT)
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn starts_with_empty_history() {
        let d = decoder(3);
        assert_eq!(d.value(), 3);
        assert_eq!(d.quad_state(), 0);
        assert!(!d.button_state());
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    #[should_panic]
    fn overlapping_pins_panic() {
        let config = EncoderConfig::new(PinAssignment::new(CLK, DT).with_switch(CLK));
        let _ = Decoder::new(config, ());
    }

    // ── State machine ────────────────────────────────────────────────

    #[test]
    fn history_register_follows_shift_formula() {
        let mut d = decoder(5);
        let states: Vec<u8> = DECREMENT_WINDOW
            .iter()
            .map(|&(clk, dt)| {
                d.on_rotation(clk, dt);
                d.quad_state()
            })
            .collect();
        assert_eq!(states, vec![0b10, 0b10_11, 0b10_11_01, DECREMENT_STATE]);
    }

    #[test]
    fn decrement_window_steps_down_once() {
        let mut d = decoder(5);
        assert_eq!(feed(&mut d, &DECREMENT_WINDOW), vec![Direction::Decrement]);
        assert_eq!(d.value(), 4);
        assert_eq!(d.handler().calls, vec![(4, false)]);
    }

    #[test]
    fn increment_window_steps_up_once() {
        let mut d = decoder(5);
        assert_eq!(feed(&mut d, &INCREMENT_WINDOW), vec![Direction::Increment]);
        assert_eq!(d.value(), 6);
        assert_eq!(d.quad_state(), INCREMENT_STATE);
    }

    #[test]
    fn increment_then_decrement_returns_to_start() {
        let mut d = decoder(5);
        feed(&mut d, &INCREMENT_WINDOW);
        feed(&mut d, &DECREMENT_WINDOW);
        assert_eq!(d.value(), 5);
        assert_eq!(d.handler().calls, vec![(6, false), (5, false)]);
    }

    #[test]
    fn consecutive_detents_each_step() {
        let mut d = decoder(0);
        for _ in 0..3 {
            feed(&mut d, &INCREMENT_WINDOW);
        }
        assert_eq!(d.value(), 3);
    }

    #[test]
    fn no_other_four_sample_window_steps() {
        let sample = |bits: u8| ((bits >> 1) & 1 != 0, bits & 1 != 0);

        for window in 0u8..=255 {
            if window == DECREMENT_STATE || window == INCREMENT_STATE {
                continue;
            }
            let mut d = decoder(5);
            let steps = feed(
                &mut d,
                &[
                    sample(window >> 6),
                    sample(window >> 4),
                    sample(window >> 2),
                    sample(window),
                ],
            );
            assert!(steps.is_empty(), "window {:#010b} stepped", window);
            assert_eq!(d.value(), 5);
        }
    }

    #[test]
    fn bounce_is_absorbed_and_decoder_resynchronises() {
        let mut d = decoder(5);
        // Bouncing CLK contact, then a clean detent.
        feed(&mut d, &[(true, false), (false, false), (true, false), (false, false)]);
        assert_eq!(d.value(), 5);
        assert!(d.handler().calls.is_empty());

        feed(&mut d, &INCREMENT_WINDOW);
        assert_eq!(d.value(), 6);
    }

    // ── Counter ──────────────────────────────────────────────────────

    #[test]
    fn saturates_at_min_and_still_notifies() {
        let mut d = decoder(0);
        assert_eq!(feed(&mut d, &DECREMENT_WINDOW), vec![Direction::Decrement]);
        assert_eq!(d.value(), 0);
        assert_eq!(d.handler().calls, vec![(0, false)]);
    }

    #[test]
    fn saturates_at_max() {
        let mut d = decoder(10);
        d.step(Direction::Increment);
        d.step(Direction::Increment);
        assert_eq!(d.value(), 10);
        assert_eq!(d.handler().calls.len(), 2);
    }

    #[test]
    fn step_at_i32_limit_does_not_overflow() {
        let config = EncoderConfig::new(PinAssignment::new(CLK, DT))
            .with_range(i32::MAX - 1, i32::MAX)
            .with_initial_value(i32::MAX);
        let mut d = Decoder::new(config, ());
        d.step(Direction::Increment);
        assert_eq!(d.value(), i32::MAX);
    }

    // ── Button ───────────────────────────────────────────────────────

    #[test]
    fn button_report_is_level_driven() {
        let mut d = decoder(7);
        d.on_button(true);
        d.on_button(true);
        d.on_button(false);
        assert_eq!(d.handler().calls, vec![(7, true), (7, true), (7, false)]);
    }

    // ── Interrupt dispatch ───────────────────────────────────────────

    #[test]
    fn switch_only_interrupt_reports_button() {
        let mut d = decoder(4);
        let event = d.handle_interrupt(1 << SW, 1 << SW);
        assert_eq!(event, Some(Event::Button(true)));
        assert!(d.button_state());
        assert_eq!(d.value(), 4);
        assert_eq!(d.handler().calls, vec![(4, true)]);
    }

    #[test]
    fn switch_and_rotation_flags_take_rotation_path() {
        let mut d = decoder(4);
        let flagged = (1 << CLK) | (1 << SW);
        assert_eq!(d.handle_interrupt(flagged, (1 << SW) | captured(true, false)), None);

        assert!(!d.button_state());
        assert_eq!(d.quad_state(), 0b10);
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn rotation_interrupts_produce_step_event() {
        let mut d = decoder(4);
        let events: Vec<Option<Event>> = INCREMENT_WINDOW
            .iter()
            .map(|&(clk, dt)| d.handle_interrupt(1 << CLK, captured(clk, dt)))
            .collect();
        assert_eq!(
            events,
            vec![None, None, None, Some(Event::Step(Direction::Increment))]
        );
        assert_eq!(d.value(), 5);
    }

    #[test]
    fn unrelated_flags_are_dropped() {
        let mut d = decoder(4);
        assert_eq!(d.handle_interrupt(1 << 9, 0xFFFF), None);
        assert_eq!(d.handle_interrupt(0, 0xFFFF), None);
        assert_eq!(d.quad_state(), 0);
        assert!(d.handler().calls.is_empty());
    }

    #[test]
    fn switch_flag_without_configured_switch_is_dropped() {
        let config = EncoderConfig::new(PinAssignment::new(CLK, DT)).with_initial_value(4);
        let mut d = Decoder::new(config, Recorder::default());
        assert_eq!(d.handle_interrupt(1 << SW, 1 << SW), None);
        assert!(!d.button_state());
    }

    #[test]
    fn closure_handler_is_invoked() {
        let mut seen = None;
        {
            let config = EncoderConfig::new(PinAssignment::new(CLK, DT).with_switch(SW));
            let mut d = Decoder::new(config, |value: i32, button: bool| {
                seen = Some((value, button))
            });
            d.handle_interrupt(1 << SW, 0);
        }
        assert_eq!(seen, Some((0, false)));
    }

    // ── Properties ───────────────────────────────────────────────────

    proptest! {
        #[test]
        fn value_stays_within_bounds(
            min in -20i32..20,
            span in 0i32..20,
            samples in proptest::collection::vec(any::<(bool, bool)>(), 0..256),
        ) {
            let config = EncoderConfig::new(PinAssignment::new(CLK, DT))
                .with_range(min, min + span)
                .with_initial_value(min);
            let mut d = Decoder::new(config, ());

            for (clk, dt) in samples {
                d.on_rotation(clk, dt);
                prop_assert!(d.value() >= min && d.value() <= min + span);
            }
        }
    }
}
